//! CLI interface for round-predictor
//!
//! Provides subcommands for:
//! - `run`: Poll on schedule, predict and grade until stopped
//! - `poll`: Run a single cycle and print the result
//! - `config`: Show the effective configuration

mod poll;
mod run;

pub use poll::PollArgs;
pub use run::RunArgs;

use crate::config::Config;
use crate::cycle::PredictionSession;
use crate::render::ConsoleRenderer;
use crate::source::GameApiClient;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "round-predictor")]
#[command(about = "Predicts BIG/SMALL game rounds from outcome history and tracks accuracy")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll on schedule, predict and grade until stopped
    Run(RunArgs),
    /// Run a single cycle and print the result
    Poll(PollArgs),
    /// Show the effective configuration
    Config,
}

/// Build a session against the live API with console rendering per config
fn build_session(config: &Config) -> anyhow::Result<PredictionSession<GameApiClient>> {
    let client = GameApiClient::new(config.source.clone())?;
    let mut session = PredictionSession::from_config(client, config);
    if config.display.enabled {
        session.add_sink(ConsoleRenderer::new(config.display.history_limit));
    }
    Ok(session)
}
