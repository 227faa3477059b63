// crates/cohort-cli/src/commands/restore.rs
//
// `cohort restore --version <n>` — make an archived baseline version the
// active baseline again.

use clap::Args;

use cohort_drift::BaselineLifecycle;

use super::Context;

/// Baseline restore command.
#[derive(Debug, Args)]
pub struct RestoreCmd {
    /// Version number to restore (see `cohort history`).
    #[arg(long)]
    pub version: u32,

    /// Baseline key (defaults to the configured baseline).
    #[arg(long)]
    pub baseline: Option<String>,
}

/// Run the restore command.
pub async fn run(cmd: &RestoreCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let location = ctx.baseline_key(cmd.baseline.as_deref());
    let restored = BaselineLifecycle::new(&*ctx.store).restore(location, cmd.version)?;
    println!(
        "Restored baseline version {} ({}) to {}",
        restored.version,
        restored.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        location
    );
    Ok(())
}
