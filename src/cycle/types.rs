//! Cycle state and outcome types

use crate::ledger::{Direction, GradingStatus, HistoryLedger, LedgerError, Period};
use crate::source::{FetchError, ObservedRound};
use crate::stats::Stats;
use chrono::{DateTime, Utc};

/// Where the session is within a cycle
///
/// A cycle's outcome is reported by `CycleOutcome`; `Fetching` only outlives
/// `run_cycle` when its future is dropped mid-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    #[default]
    Idle,
    /// Waiting on the result source
    Fetching,
}

/// Last observation pulled from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncState {
    pub last_observed_period: Option<Period>,
    pub last_observed_at: Option<DateTime<Utc>>,
}

/// What an advancing cycle changed
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceReport {
    /// Round reported by the source
    pub observed: ObservedRound,
    /// Pending round graded by this observation, if any
    pub graded: Option<(Period, GradingStatus)>,
    /// Pending rounds expired because the source moved past them
    pub expired: usize,
    /// Period of the new prediction
    pub next_period: Period,
    /// New prediction
    pub prediction: Direction,
    /// Statistics after the cycle
    pub stats: Stats,
}

/// Result of one cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Source call failed; nothing changed
    FetchFailed(FetchError),
    /// Source reported the period already observed; nothing changed
    Duplicate(Period),
    /// Source reported a period older than the last observed one; nothing changed
    Stale { observed: Period, last: Period },
    /// New observation graded and a new prediction recorded
    Advanced(AdvanceReport),
    /// Ledger invariant broken; cycle aborted before mutation
    InvariantViolation(LedgerError),
}

impl CycleOutcome {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::FetchFailed(_) => "fetch_failed",
            CycleOutcome::Duplicate(_) => "duplicate",
            CycleOutcome::Stale { .. } => "stale",
            CycleOutcome::Advanced(_) => "advanced",
            CycleOutcome::InvariantViolation(_) => "invariant_violation",
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, CycleOutcome::Advanced(_))
    }
}

/// Read-only view handed to render sinks after a cycle
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot<'a> {
    /// Period currently being predicted
    pub next_period: Option<Period>,
    /// Prediction for `next_period`
    pub prediction: Option<Direction>,
    /// Last period reported by the source
    pub last_observed: Option<Period>,
    /// Full history, newest first
    pub history: &'a HistoryLedger,
    pub stats: Stats,
}
