//! End-to-end integration tests

use round_predictor::config::{Config, ScheduleMode};
use round_predictor::cycle::PredictionSession;
use round_predictor::render::ConsoleRenderer;
use round_predictor::scheduler::{SchedulePolicy, Scheduler};
use round_predictor::source::GameApiClient;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_config_example_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(include_str!("../../config.toml.example").as_bytes())
        .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.schedule.mode, ScheduleMode::WallClock);
    assert_eq!(config.schedule.interval_secs, 60);
    assert_eq!(config.source.page_size, 10);
}

#[tokio::test]
async fn test_unreachable_api_never_mutates_ledger() {
    let mut config = Config::default();
    config.source.base_url = "http://127.0.0.1:9".to_string();
    config.source.timeout_secs = 1;
    config.source.random = "r".to_string();
    config.source.signature = "s".to_string();

    let client = GameApiClient::new(config.source.clone()).unwrap();
    let mut session = PredictionSession::from_config(client, &config);
    session.add_sink(ConsoleRenderer::new(5));

    let summary = Scheduler::new(SchedulePolicy::Countdown { interval_secs: 1 })
        .max_cycles(Some(2))
        .run(&mut session, tokio::time::sleep(Duration::from_secs(3600)))
        .await;

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.failures, 2);
    assert!(session.ledger().is_empty());
}
