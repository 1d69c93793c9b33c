//! Round cycle module
//!
//! One fetch -> grade -> predict -> record step, deduplicated by period.
//! The session owns the ledger and sync state; nothing else mutates them.

mod session;
mod types;

pub use session::PredictionSession;
pub use types::{AdvanceReport, CycleOutcome, CycleState, SessionSnapshot, SyncState};
