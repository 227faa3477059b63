// crates/cohort-drift/src/lib.rs
//
// cohort-drift: Drift detection, baseline persistence, and baseline
// versioning for Cohort Lens.
//
// This crate compares the numeric features of a current dataset against a
// stored baseline using the Population Stability Index and a two-sample
// Kolmogorov-Smirnov test, aggregates the per-feature results into a drift
// report, and manages the lifecycle of the baseline itself: saving,
// loading, snapshotting current data, and archiving/restoring versions.

pub mod baseline;
pub mod config;
pub mod detection;
pub mod ks;
pub mod lifecycle;
pub mod metrics;
pub mod report;
pub mod versioning;

#[cfg(test)]
mod testing;

pub use baseline::{load_baseline, save_baseline};
pub use config::{DriftConfig, KsMethod, KS_ALPHA, PSI_THRESHOLD};
pub use detection::DriftDetector;
pub use ks::{compute_ks, KsResult};
pub use lifecycle::{snapshot_as_baseline, BaselineLifecycle};
pub use metrics::{compute_psi, PsiBand};
pub use report::{DriftCheckResult, DriftReport, FeatureDriftReport, NoBaselineReport};
pub use versioning::{BaselineVersion, VersionRegistry};

/// Check `current` against the baseline at `location` with default
/// thresholds (PSI 0.2, KS alpha 0.05).
pub fn check_drift(
    current: &cohort_core::FeatureFrame,
    store: &dyn cohort_core::BaselineStore,
    location: &str,
) -> DriftCheckResult {
    DriftDetector::new().check_drift(current, store, location)
}
