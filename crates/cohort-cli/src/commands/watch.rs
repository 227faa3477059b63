// crates/cohort-cli/src/commands/watch.rs
//
// `cohort watch --data <file>` — re-run the drift check on an interval.
//
// The dataset is reloaded only when its modification time changes; the
// baseline is re-read on every tick so a concurrent `cohort snapshot` is
// picked up. The check itself is synchronous and runs on the blocking pool.
// Stops on Ctrl-C or after `--iterations` checks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use cohort_drift::DriftDetector;

use super::Context;
use crate::cache::FrameCache;
use crate::output::{render_check, OutputFormat};

/// Periodic drift check command.
#[derive(Debug, Args)]
pub struct WatchCmd {
    /// Dataset to watch (.csv or .json).
    #[arg(long)]
    pub data: PathBuf,

    /// Baseline key (defaults to the configured baseline).
    #[arg(long)]
    pub baseline: Option<String>,

    /// Seconds between checks (defaults to the configured interval).
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Stop after this many checks.
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Run the watch command.
pub async fn run(cmd: &WatchCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let interval_secs = cmd
        .interval_secs
        .unwrap_or(ctx.config.watch_interval_secs)
        .max(1);
    let location = ctx.baseline_key(cmd.baseline.as_deref()).to_string();
    let detector = Arc::new(DriftDetector::with_config(ctx.config.drift.clone()));
    let mut cache = FrameCache::new();
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    let mut runs = 0u64;

    tracing::info!(
        "Watching {} against {} every {}s",
        cmd.data.display(),
        location,
        interval_secs
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping watch");
                break;
            }
        }

        let had_frame = cache.is_cached();
        match cache.get_or_load(&cmd.data) {
            Ok((frame, reloaded)) => {
                if reloaded && had_frame {
                    tracing::info!("Dataset {} changed, reloaded", cmd.data.display());
                }
                let detector = Arc::clone(&detector);
                let store = Arc::clone(&ctx.store);
                let key = location.clone();
                let result = tokio::task::spawn_blocking(move || {
                    detector.check_drift(&frame, &*store, &key)
                })
                .await?;
                println!("{}", render_check(&result, cmd.format));
            }
            Err(e) => {
                cache.invalidate();
                tracing::warn!("Skipping check: {}", e);
            }
        }

        runs += 1;
        if cmd.iterations.is_some_and(|limit| runs >= limit) {
            break;
        }
    }
    Ok(())
}
