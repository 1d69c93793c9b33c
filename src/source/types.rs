//! Result source wire types and errors

use crate::ledger::{Digit, Period};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A closed round as reported by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRound {
    /// Period of the closed round
    pub period: Period,
    /// Outcome digit
    pub outcome: Digit,
}

/// Result source errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// Body decoded but the expected round record is missing or invalid
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// Round list request body
///
/// `random` and `signature` are opaque credentials passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundListRequest {
    pub page_size: u32,
    pub page_no: u32,
    pub type_id: u32,
    pub language: u32,
    pub random: String,
    pub signature: String,
    /// Unix seconds
    pub timestamp: i64,
}

/// Round list response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct RoundListResponse {
    /// API status code (0 on success)
    #[serde(default)]
    pub code: Option<i64>,
    /// API status message
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<RoundListData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoundListData {
    /// Newest first; entries are decoded lazily
    #[serde(default)]
    pub list: Vec<serde_json::Value>,
}

/// One entry of the round list; only the first is consulted
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRound {
    pub issue_number: Period,
    pub number: Digit,
}

/// Extract the latest closed round from a response body
pub(crate) fn parse_latest_round(body: &str) -> Result<ObservedRound, FetchError> {
    let response: RoundListResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedPayload(format!("undecodable body: {e}")))?;

    let first = response
        .data
        .and_then(|data| data.list.into_iter().next())
        .ok_or_else(|| {
            FetchError::MalformedPayload(format!(
                "no round in data.list (code={:?}, msg={:?})",
                response.code, response.msg
            ))
        })?;

    let latest: RawRound = serde_json::from_value(first)
        .map_err(|e| FetchError::MalformedPayload(format!("invalid latest round: {e}")))?;

    Ok(ObservedRound {
        period: latest.issue_number,
        outcome: latest.number,
    })
}
