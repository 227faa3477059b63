// crates/cohort-cli/src/output.rs
//
// Output formatting utilities for the cohort CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use cohort_drift::report::{DriftCheckResult, FeatureDriftReport};
use cohort_drift::VersionRegistry;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    #[default]
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// A row in the drift report table.
#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "PSI")]
    psi: String,
    #[tabled(rename = "KS stat")]
    ks_statistic: String,
    #[tabled(rename = "KS p-value")]
    ks_p_value: String,
    #[tabled(rename = "Mean shift")]
    mean_shift: String,
    #[tabled(rename = "Drift")]
    drift: String,
}

/// A row in the current-statistics table (no baseline).
#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Std")]
    std: String,
}

/// A row in the baseline history table.
#[derive(Tabled)]
struct VersionRow {
    #[tabled(rename = "Version")]
    version: u32,
    #[tabled(rename = "Created (UTC)")]
    created_at: String,
    #[tabled(rename = "Features")]
    num_features: usize,
    #[tabled(rename = "Values")]
    num_values: usize,
    #[tabled(rename = "Archive")]
    archive_key: String,
    #[tabled(rename = "SHA-256")]
    sha256: String,
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{:.4}", v))
}

/// Render a drift check result.
pub fn render_check(result: &DriftCheckResult, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format_json(result);
    }

    match result {
        DriftCheckResult::NoBaseline(report) => {
            let rows: Vec<StatsRow> = report
                .feature_stats
                .iter()
                .map(|(name, stats)| StatsRow {
                    feature: name.clone(),
                    mean: opt(stats.mean),
                    std: opt(stats.std),
                })
                .collect();
            format!("{}\n\n{}", report.message, format_table(&rows))
        }
        DriftCheckResult::Compared(report) => {
            let rows: Vec<FeatureRow> = report
                .features
                .iter()
                .map(|(name, entry)| match entry {
                    FeatureDriftReport::Evaluated(stats) => FeatureRow {
                        feature: name.clone(),
                        psi: format!("{:.4}", stats.psi),
                        ks_statistic: format!("{:.4}", stats.ks_statistic),
                        ks_p_value: format!("{:.4}", stats.ks_p_value),
                        mean_shift: format!("{:+.4}", stats.mean_shift),
                        drift: if stats.drift_detected { "YES" } else { "no" }.to_string(),
                    },
                    FeatureDriftReport::InsufficientData(_) => FeatureRow {
                        feature: name.clone(),
                        psi: "--".to_string(),
                        ks_statistic: "--".to_string(),
                        ks_p_value: "--".to_string(),
                        mean_shift: "--".to_string(),
                        drift: "insufficient data".to_string(),
                    },
                })
                .collect();

            let mut out = format!(
                "Drift detected: {}  |  Features checked: {}  |  Drifted: {}  |  PSI threshold: {}  |  KS alpha: {}\n\n",
                if report.drift_detected { "YES" } else { "no" },
                report.num_features_checked,
                report.num_features_drifted,
                report.psi_threshold,
                report.ks_alpha,
            );
            out.push_str(&format_table(&rows));
            for alert in &report.alerts {
                out.push_str("\n  ");
                out.push_str(alert);
            }
            out
        }
    }
}

/// Render a baseline version history.
pub fn render_history(location: &str, registry: &VersionRegistry, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format_json(registry);
    }
    if registry.is_empty() {
        return format!("No versioned baselines recorded for {}", location);
    }

    let rows: Vec<VersionRow> = registry
        .list()
        .into_iter()
        .map(|v| VersionRow {
            version: v.version,
            created_at: v.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            num_features: v.num_features,
            num_values: v.num_values,
            archive_key: v.archive_key.clone(),
            sha256: v.sha256.chars().take(12).collect(),
        })
        .collect();
    format!("Baseline history for {}\n\n{}", location, format_table(&rows))
}
