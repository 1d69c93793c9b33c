//! Console table renderer

use super::RenderSink;
use crate::cycle::SessionSnapshot;
use crate::ledger::Round;
use std::fmt::Display;

/// Prints the current prediction, history and stats to stdout
#[derive(Debug, Clone)]
pub struct ConsoleRenderer {
    /// History rows shown (0 = all)
    history_limit: usize,
}

impl ConsoleRenderer {
    pub fn new(history_limit: usize) -> Self {
        Self { history_limit }
    }

    /// Format the snapshot as a table
    pub fn format_table(&self, snapshot: &SessionSnapshot<'_>) -> String {
        let limit = if self.history_limit == 0 {
            usize::MAX
        } else {
            self.history_limit
        };

        let mut history: Vec<String> =
            snapshot.history.iter().take(limit).map(format_row).collect();
        if snapshot.history.len() > limit {
            history.push(format!("... {} older rounds", snapshot.history.len() - limit));
        }

        let stats = &snapshot.stats;
        format!(
            r#"
══════════════════════════════════════════════════════
               ROUND PREDICTOR
══════════════════════════════════════════════════════
Period:           {}
Prediction:       {}
Last observed:    {}

HISTORY
───────────────────────────────────────────────────────
{}

STATS
───────────────────────────────────────────────────────
Wins:             {}
Losses:           {}
Accuracy:         {:.2}%
══════════════════════════════════════════════════════"#,
            or_dash(snapshot.next_period),
            or_dash(snapshot.prediction),
            or_dash(snapshot.last_observed),
            history.join("\n"),
            stats.wins,
            stats.losses,
            stats.accuracy,
        )
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new(20)
    }
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// `period  prediction -> outcome (status)`
fn format_row(round: &Round) -> String {
    format!(
        "{}  {:<5} -> {} ({})",
        round.period,
        round.predicted,
        or_dash(round.outcome),
        round.status
    )
}

impl RenderSink for ConsoleRenderer {
    fn render(&self, snapshot: &SessionSnapshot<'_>) {
        println!("{}", self.format_table(snapshot));
    }
}
