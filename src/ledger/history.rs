//! History ledger: newest-first record of predicted rounds

use super::types::{Digit, GradingStatus, LedgerError, Period, Round};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Ordered history of predicted rounds, newest first
///
/// Period values are unique. The head is the round most recently predicted.
/// With a non-zero capacity the oldest rounds are evicted from the tail.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    rounds: VecDeque<Round>,
    /// Maximum retained rounds (0 = unbounded)
    capacity: usize,
}

impl HistoryLedger {
    /// Create an unbounded ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that keeps at most `capacity` rounds (0 = unbounded)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rounds: VecDeque::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Configured capacity (0 = unbounded)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rounds, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter()
    }

    /// Most recently predicted round
    pub fn head(&self) -> Option<&Round> {
        self.rounds.front()
    }

    /// Look up a round by period
    pub fn get(&self, period: Period) -> Option<&Round> {
        self.rounds.iter().find(|r| r.period == period)
    }

    /// Rounds still waiting for an outcome
    pub fn pending(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(|r| r.status.is_pending())
    }

    /// Insert a new pending prediction at the head
    pub fn insert_pending(&mut self, round: Round) -> Result<(), LedgerError> {
        if self.get(round.period).is_some() {
            return Err(LedgerError::DuplicatePeriod(round.period));
        }

        self.rounds.push_front(round);

        if self.capacity > 0 {
            while self.rounds.len() > self.capacity {
                if let Some(evicted) = self.rounds.pop_back() {
                    tracing::debug!(period = %evicted.period, "Evicted oldest round from ledger");
                }
            }
        }

        Ok(())
    }

    /// Grade the pending round for `period` against its actual outcome
    ///
    /// Returns `None` when no pending round has that period.
    pub fn grade(
        &mut self,
        period: Period,
        outcome: Digit,
        at: DateTime<Utc>,
    ) -> Option<(Round, GradingStatus)> {
        let round = self
            .rounds
            .iter_mut()
            .find(|r| r.period == period && r.status.is_pending())?;

        let status = round.grade(outcome, at).ok()?;
        Some((round.clone(), status))
    }

    /// Expire every pending round older than `period`
    ///
    /// Once the source reports `period`, earlier rounds can no longer be
    /// matched. Returns the number of rounds expired.
    pub fn expire_before(&mut self, period: Period, at: DateTime<Utc>) -> usize {
        let mut expired = 0;
        for round in self
            .rounds
            .iter_mut()
            .filter(|r| r.period < period && r.status.is_pending())
        {
            if round.expire(at).is_ok() {
                tracing::info!(period = %round.period, "Expired unmatched round");
                expired += 1;
            }
        }
        expired
    }
}
