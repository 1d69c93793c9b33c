//! Prediction session: the round cycle state machine

use super::types::{AdvanceReport, CycleOutcome, CycleState, SessionSnapshot, SyncState};
use crate::config::Config;
use crate::ledger::{HistoryLedger, LedgerError, Round};
use crate::predictor::{Predictor, TrendPredictor};
use crate::render::RenderSink;
use crate::source::{ObservedRound, ResultSource};
use crate::stats::{compute_stats, Stats};
use crate::telemetry;
use chrono::{DateTime, Utc};

/// Owns the ledger, sync state and collaborators for one prediction run
///
/// `run_cycle` takes `&mut self`, so two cycles can never run against the same
/// session at once.
pub struct PredictionSession<S> {
    source: S,
    predictor: Box<dyn Predictor>,
    ledger: HistoryLedger,
    sync: SyncState,
    state: CycleState,
    expire_skipped: bool,
    sinks: Vec<Box<dyn RenderSink>>,
}

impl<S: ResultSource> PredictionSession<S> {
    /// Create a session with the trend predictor and an unbounded ledger
    pub fn new(source: S) -> Self {
        Self {
            source,
            predictor: Box::new(TrendPredictor::new()),
            ledger: HistoryLedger::new(),
            sync: SyncState::default(),
            state: CycleState::Idle,
            expire_skipped: true,
            sinks: Vec::new(),
        }
    }

    /// Create a session configured from the ledger and predictor sections
    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(source)
            .with_predictor(TrendPredictor::with_lookback(config.predictor.lookback))
            .with_ledger_capacity(config.ledger.max_rounds)
            .with_expire_skipped(config.ledger.expire_skipped)
    }

    /// Replace the prediction strategy
    pub fn with_predictor(mut self, predictor: impl Predictor + 'static) -> Self {
        self.predictor = Box::new(predictor);
        self
    }

    /// Cap the ledger (0 = unbounded). Must be set before the first cycle.
    pub fn with_ledger_capacity(mut self, capacity: usize) -> Self {
        self.ledger = HistoryLedger::with_capacity(capacity);
        self
    }

    /// Expire pending rounds the source skipped over
    pub fn with_expire_skipped(mut self, enabled: bool) -> Self {
        self.expire_skipped = enabled;
        self
    }

    /// Register a sink that receives a snapshot after every advancing cycle
    pub fn add_sink(&mut self, sink: impl RenderSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.ledger)
    }

    /// Current state for presentation
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        let head = self.ledger.head();
        SessionSnapshot {
            next_period: head.map(|r| r.period),
            prediction: head.map(|r| r.predicted),
            last_observed: self.sync.last_observed_period,
            history: &self.ledger,
            stats: self.stats(),
        }
    }

    /// Run one fetch -> grade -> predict -> record step
    ///
    /// Fetch errors are absorbed here: they are logged and the ledger is left
    /// untouched. The ledger only changes after a fully decoded observation.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = CycleState::Fetching;

        let outcome = match self.source.fetch_latest_round().await {
            Ok(observed) => self.apply(observed, Utc::now()),
            Err(error) => {
                tracing::warn!(error = %error, "Fetch failed, cycle aborted");
                CycleOutcome::FetchFailed(error)
            }
        };

        self.state = CycleState::Idle;
        telemetry::record_cycle(outcome.label());

        if outcome.is_advanced() {
            self.publish();
        }

        outcome
    }

    /// Reset after a cycle future was dropped mid-fetch
    pub(crate) fn abandon_cycle(&mut self) {
        if self.state == CycleState::Fetching {
            tracing::info!("In-flight cycle abandoned");
        }
        self.state = CycleState::Idle;
    }

    fn apply(&mut self, observed: ObservedRound, now: DateTime<Utc>) -> CycleOutcome {
        match self.sync.last_observed_period {
            Some(last) if observed.period == last => {
                tracing::debug!(period = %observed.period, "Source has not advanced");
                return CycleOutcome::Duplicate(observed.period);
            }
            Some(last) if observed.period < last => {
                tracing::warn!(
                    observed = %observed.period,
                    last = %last,
                    "Source reported an older period, ignoring"
                );
                return CycleOutcome::Stale {
                    observed: observed.period,
                    last,
                };
            }
            _ => {}
        }

        // Everything that can fail is checked before the first mutation
        let next_period = match observed.period.next() {
            Ok(period) => period,
            Err(e) => return self.invariant_violation(e),
        };
        if self.ledger.get(next_period).is_some() {
            return self.invariant_violation(LedgerError::DuplicatePeriod(next_period));
        }

        self.sync = SyncState {
            last_observed_period: Some(observed.period),
            last_observed_at: Some(now),
        };

        // Grade before predicting so the new round is never graded against itself
        let graded = self
            .ledger
            .grade(observed.period, observed.outcome, now)
            .map(|(round, status)| {
                tracing::info!(
                    period = %round.period,
                    predicted = %round.predicted,
                    outcome = %observed.outcome,
                    status = %status,
                    "Round graded"
                );
                telemetry::record_grade(status);
                (round.period, status)
            });

        let expired = if self.expire_skipped {
            self.ledger.expire_before(observed.period, now)
        } else {
            0
        };

        let prediction = self.predictor.predict(&self.ledger);

        if let Err(e) = self
            .ledger
            .insert_pending(Round::pending(next_period, prediction, now))
        {
            return self.invariant_violation(e);
        }

        let stats = compute_stats(&self.ledger);
        telemetry::set_stats(&stats, self.ledger.len());

        tracing::info!(
            observed = %observed.period,
            outcome = %observed.outcome,
            next_period = %next_period,
            prediction = %prediction,
            predictor = self.predictor.name(),
            wins = stats.wins,
            losses = stats.losses,
            accuracy = %stats.accuracy,
            "Cycle advanced"
        );

        CycleOutcome::Advanced(AdvanceReport {
            observed,
            graded,
            expired,
            next_period,
            prediction,
            stats,
        })
    }

    fn invariant_violation(&mut self, error: LedgerError) -> CycleOutcome {
        tracing::error!(error = %error, "Ledger invariant violated");
        if cfg!(debug_assertions) {
            panic!("ledger invariant violated: {error}");
        }
        CycleOutcome::InvariantViolation(error)
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        for sink in &self.sinks {
            sink.render(&snapshot);
        }
    }
}
