// crates/cohort-cli/src/main.rs
//
// CLI entrypoint for Cohort Lens drift monitoring.
//
// Provides subcommands for checking a dataset against the active baseline,
// snapshotting a dataset as the new baseline, watching a dataset file, and
// listing or restoring archived baseline versions.

mod cache;
mod commands;
mod config;
mod loader;
mod output;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use commands::check::CheckCmd;
use commands::history::HistoryCmd;
use commands::restore::RestoreCmd;
use commands::snapshot::SnapshotCmd;
use commands::watch::WatchCmd;
use commands::Context;
use config::{expand_tilde, CohortConfig};

/// Cohort Lens CLI — feature drift monitoring for tabular data.
#[derive(Parser, Debug)]
#[command(
    name = "cohort",
    version = "0.1.0",
    about = "Cohort Lens CLI: PSI/KS drift checks against a stored baseline"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.cohort/config.toml")]
    config: String,

    /// Directory baseline keys are resolved against (overrides config and env).
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a dataset against the active baseline.
    Check(CheckCmd),

    /// Save a dataset as the new baseline.
    Snapshot(SnapshotCmd),

    /// Periodically re-check a dataset file.
    Watch(WatchCmd),

    /// List archived baseline versions.
    History(HistoryCmd),

    /// Restore an archived baseline version.
    Restore(RestoreCmd),
}

/// Resolve configuration: file (or defaults), then env, then flags.
fn resolve_config(cli: &Cli) -> Result<CohortConfig, Box<dyn std::error::Error>> {
    let path = expand_tilde(&cli.config);
    let mut config = CohortConfig::load_or_default(&path)
        .map_err(|e| format!("Could not load config from {}: {}", path, e))?;
    config.apply_env_overrides()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    config.drift.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    // Logs go to stderr so `--format json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Using data dir {} ({:?} store)",
        config.resolved_data_dir(),
        config.store_backend
    );

    let store = Arc::from(config.open_store()?);
    let ctx = Context { config, store };

    match &cli.command {
        Commands::Check(cmd) => commands::check::run(cmd, &ctx).await?,
        Commands::Snapshot(cmd) => commands::snapshot::run(cmd, &ctx).await?,
        Commands::Watch(cmd) => commands::watch::run(cmd, &ctx).await?,
        Commands::History(cmd) => commands::history::run(cmd, &ctx).await?,
        Commands::Restore(cmd) => commands::restore::run(cmd, &ctx).await?,
    }

    Ok(())
}
