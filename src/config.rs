//! Configuration types for round-predictor

use crate::source::{DEFAULT_BASE_URL, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Result API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Round list endpoint path
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Rounds per page (only the first is used)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_page_no")]
    pub page_no: u32,

    /// Game type identifier
    #[serde(default = "default_type_id")]
    pub type_id: u32,

    #[serde(default)]
    pub language: u32,

    /// Opaque request token, passed through
    #[serde(default)]
    pub random: String,

    /// Opaque request signature, passed through
    #[serde(default)]
    pub signature: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_page_size() -> u32 {
    10
}
fn default_page_no() -> u32 {
    1
}
fn default_type_id() -> u32 {
    1
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            page_size: 10,
            page_no: 1,
            type_id: 1,
            language: 0,
            random: String::new(),
            signature: String::new(),
            timeout_secs: 10,
        }
    }
}

/// How cycles are triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Fire on UTC multiples of the interval (e.g. every full minute)
    #[default]
    WallClock,
    /// Fire every interval counted from process start, skipping missed ticks
    Countdown,
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub mode: ScheduleMode,

    /// Seconds between cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Run one cycle immediately at startup
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

fn default_interval_secs() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            mode: ScheduleMode::WallClock,
            interval_secs: 60,
            run_on_start: true,
        }
    }
}

/// History ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Maximum retained rounds (0 = unbounded)
    #[serde(default)]
    pub max_rounds: usize,

    /// Expire pending rounds the source skipped over
    #[serde(default = "default_true")]
    pub expire_skipped: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_rounds: 0,
            expire_skipped: true,
        }
    }
}

/// Predictor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PredictorConfig {
    /// Newest observed rounds counted (0 = whole ledger)
    #[serde(default)]
    pub lookback: usize,
}

/// Console display configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Render the state table after every cycle
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// History rows shown
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    20
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_limit: 20,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port (0 = disabled)
    #[serde(default)]
    pub metrics_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: 0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.schedule.interval_secs == 0 {
            anyhow::bail!("schedule.interval_secs must be greater than zero");
        }
        if self.source.timeout_secs == 0 {
            anyhow::bail!("source.timeout_secs must be greater than zero");
        }
        if self.source.page_size == 0 {
            anyhow::bail!("source.page_size must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [source]
            base_url = "https://api.example.com"
            page_size = 10
            type_id = 1
            random = "4a0522c6ecd8410496260e686be2a57c"
            signature = "334B5E70A0C9B8918B0B15E517E2069C"
            timeout_secs = 5

            [schedule]
            mode = "countdown"
            interval_secs = 30
            run_on_start = false

            [ledger]
            max_rounds = 500
            expire_skipped = false

            [predictor]
            lookback = 50

            [display]
            history_limit = 10

            [telemetry]
            log_level = "debug"
            log_format = "json"
            metrics_port = 9090
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.source.base_url, "https://api.example.com");
        assert_eq!(config.source.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.source.random, "4a0522c6ecd8410496260e686be2a57c");
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.schedule.mode, ScheduleMode::Countdown);
        assert_eq!(config.schedule.interval_secs, 30);
        assert!(!config.schedule.run_on_start);
        assert_eq!(config.ledger.max_rounds, 500);
        assert!(!config.ledger.expire_skipped);
        assert_eq!(config.predictor.lookback, 50);
        assert_eq!(config.display.history_limit, 10);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.telemetry.metrics_port, 9090);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.source, SourceConfig::default());
        assert_eq!(config.schedule.mode, ScheduleMode::WallClock);
        assert_eq!(config.schedule.interval_secs, 60);
        assert!(config.schedule.run_on_start);
        assert_eq!(config.ledger.max_rounds, 0);
        assert!(config.ledger.expire_skipped);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.metrics_port, 0);
    }

    #[test]
    fn test_partial_section_defaults() {
        let toml = r#"
            [source]
            random = "abc"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.source.random, "abc");
        assert_eq!(config.source.page_size, 10);
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_schedule_mode() {
        let toml = r#"
            [schedule]
            mode = "hourly"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[schedule]\ninterval_secs = 15\n\n[source]\nsignature = \"sig\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.schedule.interval_secs, 15);
        assert_eq!(config.source.signature, "sig");
    }

    #[test]
    fn test_config_load_rejects_zero_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[schedule]\ninterval_secs = 0").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.source.endpoint, DEFAULT_ENDPOINT);
    }
}
