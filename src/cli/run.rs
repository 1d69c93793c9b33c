//! Run command implementation

use super::build_session;
use crate::config::Config;
use crate::scheduler::Scheduler;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stop after this many cycles
    #[arg(long)]
    pub max_cycles: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut session = build_session(config)?;
        let scheduler = Scheduler::from_config(&config.schedule).max_cycles(self.max_cycles);

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        let summary = scheduler.run(&mut session, shutdown).await;
        println!("{}", session.stats().summary_line());
        tracing::info!(?summary, "Run finished");
        Ok(())
    }
}
