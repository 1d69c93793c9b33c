//! Result source module
//!
//! Fetches the latest closed round from the game result API

mod client;
mod types;

pub use client::{GameApiClient, DEFAULT_BASE_URL, DEFAULT_ENDPOINT};
pub use types::{FetchError, ObservedRound, RoundListRequest};

use async_trait::async_trait;

/// Trait for round result sources
///
/// One call issues one request. Retrying is left to the caller.
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Fetch the most recently closed round
    async fn fetch_latest_round(&self) -> Result<ObservedRound, FetchError>;
}
