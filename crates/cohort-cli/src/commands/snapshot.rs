// crates/cohort-cli/src/commands/snapshot.rs
//
// `cohort snapshot --data <file>` — replace the active baseline with the
// statistics of a dataset, optionally archiving it as a new version.

use std::path::PathBuf;

use clap::Args;

use cohort_drift::BaselineLifecycle;

use super::Context;
use crate::loader::load_frame;

/// Baseline snapshot command.
#[derive(Debug, Args)]
pub struct SnapshotCmd {
    /// Dataset to snapshot (.csv or .json).
    #[arg(long)]
    pub data: PathBuf,

    /// Baseline key (defaults to the configured baseline).
    #[arg(long)]
    pub baseline: Option<String>,

    /// Archive the snapshot as a new version and record it in the history.
    #[arg(long)]
    pub versioned: bool,
}

/// Run the snapshot command.
pub async fn run(cmd: &SnapshotCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let frame = load_frame(&cmd.data)?;
    let location = ctx.baseline_key(cmd.baseline.as_deref());
    let lifecycle = BaselineLifecycle::new(&*ctx.store);

    if cmd.versioned {
        let version = lifecycle.snapshot_versioned(&frame, location)?;
        println!(
            "Saved baseline version {} to {} ({} features, {} values)",
            version.version, location, version.num_features, version.num_values
        );
        println!("  Archive: {}", version.archive_key);
        println!("  SHA-256: {}", version.sha256);
    } else {
        let snapshot = lifecycle.snapshot(&frame, location)?;
        println!(
            "Saved baseline to {} ({} features, {} values)",
            location,
            snapshot.len(),
            snapshot.total_values()
        );
    }
    Ok(())
}
