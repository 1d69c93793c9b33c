//! Game result API client
//!
//! Posts a round list query to the result API and reads the newest closed
//! round from the first list entry.

use super::types::{parse_latest_round, FetchError, ObservedRound, RoundListRequest};
use super::ResultSource;
use crate::config::SourceConfig;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.bdg88zf.com";

/// Round list endpoint path
pub const DEFAULT_ENDPOINT: &str = "/api/webapi/GetNoaverageEmerdList";

/// Client for the game result API
pub struct GameApiClient {
    config: SourceConfig,
    client: Client,
}

impl GameApiClient {
    /// Create a client with the given configuration
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.random.is_empty() || config.signature.is_empty() {
            tracing::warn!("Source credentials (random/signature) are empty; the API will likely reject requests");
        }

        Ok(Self { config, client })
    }

    /// Full request URL
    pub fn url(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.endpoint
        )
    }

    /// Build the request body for the given unix timestamp
    pub fn build_request(&self, timestamp: i64) -> RoundListRequest {
        RoundListRequest {
            page_size: self.config.page_size,
            page_no: self.config.page_no,
            type_id: self.config.type_id,
            language: self.config.language,
            random: self.config.random.clone(),
            signature: self.config.signature.clone(),
            timestamp,
        }
    }
}

#[async_trait]
impl ResultSource for GameApiClient {
    async fn fetch_latest_round(&self) -> Result<ObservedRound, FetchError> {
        let url = self.url();
        let request = self.build_request(Utc::now().timestamp());

        tracing::debug!(url = %url, page_size = request.page_size, "Fetching latest round");

        let started = Instant::now();
        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::debug!(status = %status, "Result API returned error status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        crate::telemetry::record_fetch_latency(started.elapsed());

        let round = parse_latest_round(&body)?;
        tracing::debug!(period = %round.period, outcome = %round.outcome, "Fetched latest round");
        Ok(round)
    }
}
