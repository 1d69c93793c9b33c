//! Prediction module
//!
//! Maps ledger history to a BIG/SMALL call for the next round.

mod trend;

pub use trend::TrendPredictor;

use crate::ledger::{Direction, HistoryLedger};

/// Trait for prediction strategies
///
/// Implementations must be pure: the same ledger snapshot always yields the
/// same direction.
pub trait Predictor: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &str;

    /// Predict the direction of the next round
    fn predict(&self, history: &HistoryLedger) -> Direction;
}
