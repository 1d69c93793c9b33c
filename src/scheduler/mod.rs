//! Cycle scheduler
//!
//! Drives `PredictionSession::run_cycle` on a fixed cadence. Cycles run inline
//! in the scheduler task, so a slow cycle delays or skips later triggers but
//! never overlaps them.
//!
//! Two policies, both phase-locked:
//! - `WallClock` fires on UTC multiples of the interval.
//! - `Countdown` fires every interval counted from scheduler start, using a
//!   tokio interval with `MissedTickBehavior::Skip`.
//!
//! Under both, triggers that pass while a cycle is in flight collapse into at
//! most one late trigger; the rest are counted as skipped.

mod clock;

pub use clock::{boundaries_between, next_boundary, seconds_until_boundary};

use crate::config::{ScheduleConfig, ScheduleMode};
use crate::cycle::{CycleOutcome, PredictionSession};
use crate::source::ResultSource;
use crate::telemetry;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// When cycles fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Aligned to UTC multiples of the interval
    WallClock { interval_secs: u64 },
    /// Every interval counted from scheduler start
    Countdown { interval_secs: u64 },
}

impl SchedulePolicy {
    pub fn from_config(config: &ScheduleConfig) -> Self {
        match config.mode {
            ScheduleMode::WallClock => SchedulePolicy::WallClock {
                interval_secs: config.interval_secs,
            },
            ScheduleMode::Countdown => SchedulePolicy::Countdown {
                interval_secs: config.interval_secs,
            },
        }
    }

    pub fn interval_secs(&self) -> u64 {
        match self {
            SchedulePolicy::WallClock { interval_secs } => *interval_secs,
            SchedulePolicy::Countdown { interval_secs } => *interval_secs,
        }
    }
}

/// Counters for one scheduler run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub advanced: u64,
    pub duplicates: u64,
    pub failures: u64,
    /// Triggers that passed while a cycle was still running
    pub skipped_triggers: u64,
}

impl RunSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Advanced(_) => self.advanced += 1,
            CycleOutcome::Duplicate(_) | CycleOutcome::Stale { .. } => self.duplicates += 1,
            CycleOutcome::FetchFailed(_) | CycleOutcome::InvariantViolation(_) => {
                self.failures += 1
            }
        }
    }
}

/// Periodic driver for a prediction session
#[derive(Debug, Clone)]
pub struct Scheduler {
    policy: SchedulePolicy,
    run_on_start: bool,
    max_cycles: Option<u64>,
}

impl Scheduler {
    pub fn new(policy: SchedulePolicy) -> Self {
        Self {
            policy,
            run_on_start: true,
            max_cycles: None,
        }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(SchedulePolicy::from_config(config)).run_on_start(config.run_on_start)
    }

    /// Run one cycle immediately instead of waiting for the first trigger
    pub fn run_on_start(mut self, enabled: bool) -> Self {
        self.run_on_start = enabled;
        self
    }

    /// Stop after this many cycles
    pub fn max_cycles(mut self, limit: Option<u64>) -> Self {
        self.max_cycles = limit;
        self
    }

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    /// Drive the session until `shutdown` resolves or the cycle limit is hit
    ///
    /// A shutdown during a fetch drops the in-flight request; the ledger is
    /// only mutated after a complete response, so nothing is half-applied.
    pub async fn run<S, F>(&self, session: &mut PredictionSession<S>, shutdown: F) -> RunSummary
    where
        S: ResultSource,
        F: Future<Output = ()>,
    {
        self.run_from(session, shutdown, Utc::now()).await
    }

    async fn run_from<S, F>(
        &self,
        session: &mut PredictionSession<S>,
        shutdown: F,
        started_at: DateTime<Utc>,
    ) -> RunSummary
    where
        S: ResultSource,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let timeline = Timeline::new(started_at);
        let mut cadence = Cadence::new(self.policy, timeline.origin);
        let mut summary = RunSummary::default();
        let mut first = self.run_on_start;

        tracing::info!(
            policy = ?self.policy,
            run_on_start = self.run_on_start,
            max_cycles = ?self.max_cycles,
            "Scheduler started"
        );

        loop {
            if self.max_cycles.is_some_and(|limit| summary.cycles >= limit) {
                tracing::info!(cycles = summary.cycles, "Cycle limit reached");
                break;
            }

            if first {
                first = false;
                cadence.fired_at(timeline.now());
            } else {
                let skipped = tokio::select! {
                    _ = &mut shutdown => {
                        tracing::info!("Shutdown requested");
                        break;
                    }
                    skipped = cadence.wait(&timeline) => skipped,
                };

                summary.skipped_triggers += skipped;
                telemetry::record_skipped_triggers(skipped);
                if skipped > 0 {
                    tracing::warn!(skipped, "Triggers passed while a cycle was running");
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    session.abandon_cycle();
                    tracing::info!("Shutdown requested during cycle");
                    break;
                }
                outcome = session.run_cycle() => summary.record(&outcome),
            }
        }

        tracing::info!(
            cycles = summary.cycles,
            advanced = summary.advanced,
            failures = summary.failures,
            skipped = summary.skipped_triggers,
            "Scheduler stopped"
        );
        summary
    }
}

/// UTC time advanced by the tokio clock from a fixed start
struct Timeline {
    started_at: DateTime<Utc>,
    origin: Instant,
}

impl Timeline {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            origin: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.origin);
        self.started_at + chrono::Duration::from_std(elapsed).unwrap_or(chrono::Duration::zero())
    }
}

/// Trigger source for one policy
enum Cadence {
    Aligned {
        interval_secs: u64,
        last_fired: Option<DateTime<Utc>>,
    },
    Ticker {
        ticker: Interval,
        period: Duration,
        origin: Instant,
        /// Index of the last tick that fired, counted from `origin`
        last_index: u64,
    },
}

impl Cadence {
    fn new(policy: SchedulePolicy, origin: Instant) -> Self {
        match policy {
            SchedulePolicy::WallClock { interval_secs } => Cadence::Aligned {
                interval_secs,
                last_fired: None,
            },
            SchedulePolicy::Countdown { interval_secs } => {
                let period = Duration::from_secs(interval_secs.max(1));
                let mut ticker = tokio::time::interval_at(origin + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                Cadence::Ticker {
                    ticker,
                    period,
                    origin,
                    last_index: 0,
                }
            }
        }
    }

    /// Record a cycle started outside the cadence
    fn fired_at(&mut self, now: DateTime<Utc>) {
        if let Cadence::Aligned { last_fired, .. } = self {
            *last_fired = Some(now);
        }
    }

    /// Wait for the next trigger, returning how many were skipped before it
    async fn wait(&mut self, timeline: &Timeline) -> u64 {
        match self {
            Cadence::Aligned {
                interval_secs,
                last_fired,
            } => {
                let now = timeline.now();
                let trigger = Trigger::aligned(*interval_secs, now, *last_fired);
                tracing::debug!(
                    seconds_remaining = seconds_until_boundary(now, *interval_secs),
                    "Waiting for next boundary"
                );
                tokio::time::sleep(trigger.delay).await;
                *last_fired = Some(trigger.at);
                trigger.skipped
            }
            Cadence::Ticker {
                ticker,
                period,
                origin,
                last_index,
            } => {
                ticker.tick().await;
                // A late tick fires at once; ticks between it and the last one are gone
                let elapsed = Instant::now().saturating_duration_since(*origin);
                let index =
                    u64::try_from(elapsed.as_nanos() / period.as_nanos()).unwrap_or(u64::MAX);
                let skipped = index.saturating_sub(last_index.saturating_add(1));
                *last_index = index;
                skipped
            }
        }
    }
}

/// When and after how long the next aligned cycle fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Trigger {
    delay: Duration,
    /// Boundaries missed since the previous trigger
    skipped: u64,
    at: DateTime<Utc>,
}

impl Trigger {
    /// Next boundary after `now`, given when the previous trigger fired
    fn aligned(interval_secs: u64, now: DateTime<Utc>, last_fired: Option<DateTime<Utc>>) -> Self {
        // Waking a little early must not fire the same boundary twice
        let reference = last_fired.map_or(now, |fired| fired.max(now));
        let at = next_boundary(reference, interval_secs);
        let skipped = last_fired
            .map(|fired| boundaries_between(fired, now, interval_secs))
            .unwrap_or(0);
        Trigger {
            delay: (at - now).to_std().unwrap_or(Duration::ZERO),
            skipped,
            at,
        }
    }
}
