//! Prometheus metrics
//!
//! Without an installed recorder these calls are no-ops.

use crate::ledger::GradingStatus;
use crate::stats::Stats;
use rust_decimal::prelude::ToPrimitive;
use std::time::Duration;

/// Count a finished cycle by outcome label
pub fn record_cycle(outcome: &'static str) {
    ::metrics::counter!("round_predictor_cycles_total", "outcome" => outcome).increment(1);
}

/// Record result API round-trip time
pub fn record_fetch_latency(duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    ::metrics::histogram!("round_predictor_fetch_latency_ms").record(ms);
    tracing::trace!(value_ms = ms, "Fetch latency");
}

/// Count a graded round
pub fn record_grade(status: GradingStatus) {
    let status = match status {
        GradingStatus::Pending => "pending",
        GradingStatus::Win => "win",
        GradingStatus::Loss => "loss",
        GradingStatus::Expired => "expired",
    };
    ::metrics::counter!("round_predictor_grades_total", "status" => status).increment(1);
}

/// Count triggers skipped because a cycle was still running
pub fn record_skipped_triggers(count: u64) {
    if count > 0 {
        ::metrics::counter!("round_predictor_skipped_triggers_total").increment(count);
    }
}

/// Publish current statistics
pub fn set_stats(stats: &Stats, ledger_len: usize) {
    ::metrics::gauge!("round_predictor_wins").set(stats.wins as f64);
    ::metrics::gauge!("round_predictor_losses").set(stats.losses as f64);
    ::metrics::gauge!("round_predictor_accuracy_pct").set(stats.accuracy.to_f64().unwrap_or(0.0));
    ::metrics::gauge!("round_predictor_ledger_rounds").set(ledger_len as f64);
}
