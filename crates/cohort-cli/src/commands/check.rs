// crates/cohort-cli/src/commands/check.rs
//
// `cohort check --data <file>` — compare a dataset against the active
// baseline and print the drift report.

use std::path::PathBuf;

use clap::Args;

use cohort_drift::{DriftConfig, DriftDetector};

use super::Context;
use crate::loader::load_frame;
use crate::output::{render_check, OutputFormat};

/// Drift check command.
#[derive(Debug, Args)]
pub struct CheckCmd {
    /// Dataset to check (.csv or .json).
    #[arg(long)]
    pub data: PathBuf,

    /// Baseline key (defaults to the configured baseline).
    #[arg(long)]
    pub baseline: Option<String>,

    /// PSI threshold for this check.
    #[arg(long)]
    pub psi_threshold: Option<f64>,

    /// KS significance level for this check.
    #[arg(long)]
    pub ks_alpha: Option<f64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Apply per-command threshold flags on top of the configured thresholds.
pub fn effective_config(
    base: &DriftConfig,
    psi_threshold: Option<f64>,
    ks_alpha: Option<f64>,
) -> Result<DriftConfig, Box<dyn std::error::Error>> {
    let mut config = base.clone();
    if let Some(threshold) = psi_threshold {
        config = config.with_psi_threshold(threshold);
    }
    if let Some(alpha) = ks_alpha {
        config = config.with_ks_alpha(alpha);
    }
    config.validate()?;
    Ok(config)
}

/// Run the check command.
pub async fn run(cmd: &CheckCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let drift_config = effective_config(&ctx.config.drift, cmd.psi_threshold, cmd.ks_alpha)?;
    let frame = load_frame(&cmd.data)?;
    let location = ctx.baseline_key(cmd.baseline.as_deref());

    let result = DriftDetector::with_config(drift_config).check_drift(&frame, &*ctx.store, location);
    println!("{}", render_check(&result, cmd.format));
    Ok(())
}
