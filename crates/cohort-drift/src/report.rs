// crates/cohort-drift/src/report.rs
//
// Drift report shapes.
//
// Field names are part of the external contract: callers serialize these
// structs directly into API responses and audit records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full comparison result for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDriftStats {
    /// Population Stability Index, rounded to 6 decimals.
    pub psi: f64,
    /// KS statistic, rounded to 6 decimals.
    pub ks_statistic: f64,
    /// KS p-value, rounded to 6 decimals.
    pub ks_p_value: f64,
    /// `psi >= psi_threshold || ks_p_value < ks_alpha`.
    pub drift_detected: bool,
    /// Mean of the current sample, rounded to 4 decimals.
    pub current_mean: f64,
    /// Mean recorded in the baseline, rounded to 4 decimals.
    pub baseline_mean: f64,
    /// `current_mean - baseline_mean`, rounded to 4 decimals.
    pub mean_shift: f64,
}

/// Serializes as `{}`: no KS result exists for an insufficient sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyKs {}

/// Placeholder entry for a feature with fewer than two values on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsufficientData {
    /// Always 0.0.
    pub psi: f64,
    /// Always `{}`.
    pub ks: EmptyKs,
    /// Always false.
    pub drift: bool,
}

/// Per-feature entry of a drift report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureDriftReport {
    /// Both samples were large enough to compare.
    Evaluated(FeatureDriftStats),
    /// Too few values to compute meaningful statistics.
    InsufficientData(InsufficientData),
}

impl FeatureDriftReport {
    /// The trivial `{psi: 0.0, ks: {}, drift: false}` entry.
    pub fn insufficient() -> Self {
        FeatureDriftReport::InsufficientData(InsufficientData {
            psi: 0.0,
            ks: EmptyKs {},
            drift: false,
        })
    }

    /// Whether this feature drifted.
    pub fn drift_detected(&self) -> bool {
        match self {
            FeatureDriftReport::Evaluated(stats) => stats.drift_detected,
            FeatureDriftReport::InsufficientData(_) => false,
        }
    }

    /// The (rounded) PSI for this feature.
    pub fn psi(&self) -> f64 {
        match self {
            FeatureDriftReport::Evaluated(stats) => stats.psi,
            FeatureDriftReport::InsufficientData(entry) => entry.psi,
        }
    }

    /// The full statistics, if the feature was evaluated.
    pub fn stats(&self) -> Option<&FeatureDriftStats> {
        match self {
            FeatureDriftReport::Evaluated(stats) => Some(stats),
            FeatureDriftReport::InsufficientData(_) => None,
        }
    }
}

/// Report produced when a baseline was available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// True if any feature drifted.
    pub drift_detected: bool,
    /// PSI threshold used for this check.
    pub psi_threshold: f64,
    /// KS significance level used for this check.
    pub ks_alpha: f64,
    /// Per-feature results, keyed by feature name.
    pub features: BTreeMap<String, FeatureDriftReport>,
    /// One human-readable line per drifted feature, in column order.
    pub alerts: Vec<String>,
    /// Number of entries in `features`.
    pub num_features_checked: usize,
    /// Number of entries in `features` with drift detected.
    pub num_features_drifted: usize,
}

impl DriftReport {
    /// Names of drifted features, in name order.
    pub fn drifted_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|(_, report)| report.drift_detected())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Mean and sample standard deviation of a current feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// `None` when the column has no values.
    pub mean: Option<f64>,
    /// `None` when the column has fewer than two values.
    pub std: Option<f64>,
}

/// Report produced when no baseline exists: current statistics only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoBaselineReport {
    /// Current mean/std per numeric feature.
    pub feature_stats: BTreeMap<String, FeatureStats>,
    /// Always false.
    pub drift_detected: bool,
    /// Why no comparison was made.
    pub message: String,
}

/// Result of a drift check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriftCheckResult {
    /// A baseline was loaded and compared against.
    Compared(DriftReport),
    /// No usable baseline; no comparison was possible.
    NoBaseline(NoBaselineReport),
}

impl DriftCheckResult {
    /// Overall drift flag.
    pub fn drift_detected(&self) -> bool {
        match self {
            DriftCheckResult::Compared(report) => report.drift_detected,
            DriftCheckResult::NoBaseline(_) => false,
        }
    }

    /// The comparison report, if a baseline was available.
    pub fn report(&self) -> Option<&DriftReport> {
        match self {
            DriftCheckResult::Compared(report) => Some(report),
            DriftCheckResult::NoBaseline(_) => None,
        }
    }

    /// Whether this is the "no baseline" shape.
    pub fn is_no_baseline(&self) -> bool {
        matches!(self, DriftCheckResult::NoBaseline(_))
    }

    /// Alerts raised by the check (empty without a baseline).
    pub fn alerts(&self) -> &[String] {
        match self {
            DriftCheckResult::Compared(report) => &report.alerts,
            DriftCheckResult::NoBaseline(_) => &[],
        }
    }
}
