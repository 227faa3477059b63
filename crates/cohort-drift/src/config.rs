// crates/cohort-drift/src/config.rs
//
// Drift detection configuration.
//
// Resolved once by the caller (from a TOML file, environment, or code) and
// handed to the detector; nothing here is re-read per check.

use serde::{Deserialize, Serialize};

use cohort_core::CohortError;

/// Default PSI threshold: PSI >= 0.2 indicates significant drift.
pub const PSI_THRESHOLD: f64 = 0.2;

/// Default significance level for the KS test.
pub const KS_ALPHA: f64 = 0.05;

/// Default number of equal-width PSI buckets.
pub const DEFAULT_PSI_BINS: usize = 10;

/// Amount the PSI bucket range is widened on each end so boundary values
/// are never clipped out of range.
pub const PSI_EDGE_MARGIN: f64 = 1e-4;

/// Floor applied to every bucket proportion before taking logs.
pub const PSI_PROPORTION_FLOOR: f64 = 1e-4;

/// Minimum number of values on each side for a feature to be compared.
pub const MIN_SAMPLES: usize = 2;

/// How the KS test is computed.
///
/// `Disabled` is the "test unavailable" strategy: every KS result fails open
/// (statistic 0, p-value 1, no drift) and only PSI can flag drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KsMethod {
    /// Exact distribution for small samples, asymptotic Kolmogorov
    /// distribution otherwise.
    #[default]
    #[serde(alias = "asymptotic")]
    Auto,
    /// KS test switched off.
    Disabled,
}

/// Thresholds and binning policy for a drift check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// PSI at or above this value flags a feature as drifted.
    #[serde(default = "default_psi_threshold")]
    pub psi_threshold: f64,

    /// KS p-values below this value flag a feature as drifted.
    #[serde(default = "default_ks_alpha")]
    pub ks_alpha: f64,

    /// Number of equal-width PSI buckets.
    #[serde(default = "default_psi_bins")]
    pub psi_bins: usize,

    /// Widening applied to both ends of the PSI bucket range.
    #[serde(default = "default_psi_edge_margin")]
    pub psi_edge_margin: f64,

    /// Floor for PSI bucket proportions.
    #[serde(default = "default_psi_proportion_floor")]
    pub psi_proportion_floor: f64,

    /// KS computation strategy.
    #[serde(default)]
    pub ks_method: KsMethod,
}

fn default_psi_threshold() -> f64 {
    PSI_THRESHOLD
}

fn default_ks_alpha() -> f64 {
    KS_ALPHA
}

fn default_psi_bins() -> usize {
    DEFAULT_PSI_BINS
}

fn default_psi_edge_margin() -> f64 {
    PSI_EDGE_MARGIN
}

fn default_psi_proportion_floor() -> f64 {
    PSI_PROPORTION_FLOOR
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            psi_threshold: default_psi_threshold(),
            ks_alpha: default_ks_alpha(),
            psi_bins: default_psi_bins(),
            psi_edge_margin: default_psi_edge_margin(),
            psi_proportion_floor: default_psi_proportion_floor(),
            ks_method: KsMethod::default(),
        }
    }
}

impl DriftConfig {
    /// Override the PSI threshold.
    pub fn with_psi_threshold(mut self, psi_threshold: f64) -> Self {
        self.psi_threshold = psi_threshold;
        self
    }

    /// Override the KS significance level.
    pub fn with_ks_alpha(mut self, ks_alpha: f64) -> Self {
        self.ks_alpha = ks_alpha;
        self
    }

    /// Override the KS strategy.
    pub fn with_ks_method(mut self, ks_method: KsMethod) -> Self {
        self.ks_method = ks_method;
        self
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), CohortError> {
        if !self.psi_threshold.is_finite() || self.psi_threshold < 0.0 {
            return Err(CohortError::Config(format!(
                "psi_threshold must be a non-negative number, got {}",
                self.psi_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.ks_alpha) {
            return Err(CohortError::Config(format!(
                "ks_alpha must lie in [0, 1], got {}",
                self.ks_alpha
            )));
        }
        if self.psi_bins == 0 {
            return Err(CohortError::Config("psi_bins must be at least 1".to_string()));
        }
        if !self.psi_edge_margin.is_finite() || self.psi_edge_margin < 0.0 {
            return Err(CohortError::Config(format!(
                "psi_edge_margin must be a non-negative number, got {}",
                self.psi_edge_margin
            )));
        }
        if !(self.psi_proportion_floor > 0.0 && self.psi_proportion_floor < 1.0) {
            return Err(CohortError::Config(format!(
                "psi_proportion_floor must lie in (0, 1), got {}",
                self.psi_proportion_floor
            )));
        }
        Ok(())
    }
}
