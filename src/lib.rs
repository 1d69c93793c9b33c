//! round-predictor: BIG/SMALL round prediction with running accuracy
//!
//! This library provides the core components for:
//! - Fetching the latest closed round from the game result API
//! - Recording predictions in a newest-first history ledger
//! - Majority-count trend prediction
//! - Grading predictions against actual outcomes
//! - Win/loss/accuracy statistics
//! - Wall-clock or countdown scheduling of prediction cycles
//! - Console rendering, structured logging and metrics

pub mod cli;
pub mod config;
pub mod cycle;
pub mod ledger;
pub mod predictor;
pub mod render;
pub mod scheduler;
pub mod source;
pub mod stats;
pub mod telemetry;
