//! Majority-count trend predictor

use super::Predictor;
use crate::ledger::{Digit, Direction, HistoryLedger};

/// Predicts whichever direction has been observed more often
///
/// Only rounds with a known outcome count. Ties (including an empty history)
/// resolve to SMALL: BIG needs a strict majority.
///
/// Outcomes live on graded rounds, so an observation that matched no pending
/// prediction (the very first one included) never reaches the count.
#[derive(Debug, Clone, Default)]
pub struct TrendPredictor {
    /// Newest observed rounds to consider (0 = whole ledger)
    lookback: usize,
}

impl TrendPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only count the `lookback` newest observed outcomes (0 = all)
    pub fn with_lookback(lookback: usize) -> Self {
        Self { lookback }
    }

    /// Majority direction of a sequence of outcomes
    pub fn majority(outcomes: impl IntoIterator<Item = Digit>) -> Direction {
        let (big, small) = outcomes
            .into_iter()
            .fold((0usize, 0usize), |(big, small), digit| match Direction::of(digit) {
                Direction::Big => (big + 1, small),
                Direction::Small => (big, small + 1),
            });

        if big > small {
            Direction::Big
        } else {
            Direction::Small
        }
    }
}

impl Predictor for TrendPredictor {
    fn name(&self) -> &str {
        "trend"
    }

    fn predict(&self, history: &HistoryLedger) -> Direction {
        let observed = history.iter().filter_map(|round| round.outcome);
        if self.lookback > 0 {
            Self::majority(observed.take(self.lookback))
        } else {
            Self::majority(observed)
        }
    }
}
