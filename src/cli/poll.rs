//! Poll command implementation

use super::build_session;
use crate::config::Config;
use crate::cycle::CycleOutcome;
use clap::Args;

#[derive(Args, Debug)]
pub struct PollArgs {
    /// Print the cycle outcome as JSON instead of the table
    #[arg(long)]
    pub json: bool,
}

impl PollArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        config.display.enabled = !self.json;
        let mut session = build_session(&config)?;

        match session.run_cycle().await {
            CycleOutcome::Advanced(report) => {
                if self.json {
                    let json = serde_json::json!({
                        "observed": report.observed,
                        "graded": report.graded,
                        "next_period": report.next_period,
                        "prediction": report.prediction,
                        "stats": report.stats,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                Ok(())
            }
            CycleOutcome::FetchFailed(e) => Err(anyhow::anyhow!("Fetch failed: {}", e)),
            other => Err(anyhow::anyhow!("Cycle did not advance: {}", other.label())),
        }
    }
}
