//! History ledger module
//!
//! Owns every predicted round for the life of the process. It is the single
//! source of truth for prediction input, statistics and display.

mod history;
mod types;

pub use history::HistoryLedger;
pub use types::{Digit, Direction, GradingStatus, LedgerError, Period, Round};
