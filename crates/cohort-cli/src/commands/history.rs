// crates/cohort-cli/src/commands/history.rs
//
// `cohort history` — list archived baseline versions.

use clap::Args;

use cohort_drift::BaselineLifecycle;

use super::Context;
use crate::output::{render_history, OutputFormat};

/// Baseline history command.
#[derive(Debug, Args)]
pub struct HistoryCmd {
    /// Baseline key (defaults to the configured baseline).
    #[arg(long)]
    pub baseline: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Run the history command.
pub async fn run(cmd: &HistoryCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let location = ctx.baseline_key(cmd.baseline.as_deref());
    let registry = BaselineLifecycle::new(&*ctx.store).history(location);
    println!("{}", render_history(location, &registry, cmd.format));
    Ok(())
}
