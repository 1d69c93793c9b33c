//! Win/loss statistics derived from the ledger

use crate::ledger::{GradingStatus, HistoryLedger};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Prediction accuracy summary
///
/// Never stored: recomputed from the ledger on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    /// Rounds graded WIN
    pub wins: usize,
    /// Rounds graded LOSS
    pub losses: usize,
    /// Rounds still waiting for an outcome
    pub pending: usize,
    /// Rounds the source skipped
    pub expired: usize,
    /// Win percentage over graded rounds, two decimal places (0 when none graded)
    pub accuracy: Decimal,
}

impl Stats {
    /// Graded rounds (wins + losses)
    pub fn graded(&self) -> usize {
        self.wins + self.losses
    }

    /// Single-line summary
    pub fn summary_line(&self) -> String {
        format!(
            "Wins: {}  Losses: {}  Accuracy: {:.2}%",
            self.wins, self.losses, self.accuracy
        )
    }
}

/// Compute statistics over every round in the ledger
pub fn compute_stats(history: &HistoryLedger) -> Stats {
    let mut stats = Stats::default();

    for round in history.iter() {
        match round.status {
            GradingStatus::Win => stats.wins += 1,
            GradingStatus::Loss => stats.losses += 1,
            GradingStatus::Pending => stats.pending += 1,
            GradingStatus::Expired => stats.expired += 1,
        }
    }

    stats.accuracy = accuracy(stats.wins, stats.losses);
    stats
}

/// `wins / (wins + losses) * 100`, rounded to two places; 0 with no graded rounds
pub fn accuracy(wins: usize, losses: usize) -> Decimal {
    let graded = wins + losses;
    if graded == 0 {
        return dec!(0);
    }

    (Decimal::from(wins) * dec!(100) / Decimal::from(graded)).round_dp(2)
}
