// crates/cohort-drift/src/detection.rs
//
// Feature drift detection against a stored baseline.
//
// For every numeric feature present in both the current frame and the
// baseline, the detector computes PSI and a two-sample KS test and flags
// the feature when either crosses its threshold. Features present on only
// one side are skipped. A missing or unreadable baseline yields the
// "no baseline" result shape instead of an error.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use cohort_core::summary::{self, round_to};
use cohort_core::{non_missing, BaselineSnapshot, BaselineStore, FeatureBaseline, FeatureFrame};

use crate::baseline::load_baseline;
use crate::config::{DriftConfig, MIN_SAMPLES};
use crate::ks::{compute_ks_with, KsResult};
use crate::metrics::compute_psi_with;
use crate::report::{
    DriftCheckResult, DriftReport, FeatureDriftReport, FeatureDriftStats, FeatureStats,
    NoBaselineReport,
};

/// Message carried by the "no baseline" result.
pub const NO_BASELINE_MESSAGE: &str =
    "No baseline available. Save a baseline first with save_baseline().";

/// Detects distribution drift between current data and a stored baseline.
#[derive(Debug, Clone, Default)]
pub struct DriftDetector {
    /// Thresholds and binning policy.
    pub config: DriftConfig,
}

impl DriftDetector {
    /// Create a detector with default thresholds (PSI 0.2, KS alpha 0.05).
    pub fn new() -> Self {
        Self {
            config: DriftConfig::default(),
        }
    }

    /// Create a detector with explicit configuration.
    pub fn with_config(config: DriftConfig) -> Self {
        Self { config }
    }

    /// Check `current` against the baseline stored at `location`.
    ///
    /// Never fails: a missing or corrupt baseline produces
    /// [`DriftCheckResult::NoBaseline`] with current feature statistics.
    pub fn check_drift(
        &self,
        current: &FeatureFrame,
        store: &dyn BaselineStore,
        location: &str,
    ) -> DriftCheckResult {
        let feature_stats = current_feature_stats(current);

        match load_baseline(store, location) {
            Some(baseline) => DriftCheckResult::Compared(self.compare(current, &baseline)),
            None => {
                info!(
                    "No baseline found at {}. Returning current stats only.",
                    location
                );
                DriftCheckResult::NoBaseline(NoBaselineReport {
                    feature_stats,
                    drift_detected: false,
                    message: NO_BASELINE_MESSAGE.to_string(),
                })
            }
        }
    }

    /// Compare `current` against an in-memory baseline snapshot.
    pub fn compare(&self, current: &FeatureFrame, baseline: &BaselineSnapshot) -> DriftReport {
        let mut features = BTreeMap::new();
        let mut alerts = Vec::new();

        for (name, cells) in current.numeric_columns() {
            let Some(feature_baseline) = baseline.get(name) else {
                continue;
            };

            let current_values = non_missing(cells);
            let (report, raw) = self.evaluate(feature_baseline, &current_values);

            if let FeatureDriftReport::Evaluated(stats) = &report {
                debug!(
                    "Feature '{}': psi={} ks_statistic={} ks_p_value={}",
                    name, stats.psi, stats.ks_statistic, stats.ks_p_value
                );
            }
            if let (true, Some((psi, ks))) = (report.drift_detected(), raw) {
                alerts.push(format_alert(name, psi, self.config.psi_threshold, ks.p_value));
            }
            features.insert(name.to_string(), report);
        }

        let num_features_drifted = features.values().filter(|r| r.drift_detected()).count();
        let report = DriftReport {
            drift_detected: num_features_drifted > 0,
            psi_threshold: self.config.psi_threshold,
            ks_alpha: self.config.ks_alpha,
            num_features_checked: features.len(),
            num_features_drifted,
            features,
            alerts,
        };

        if report.drift_detected {
            warn!(
                "Data drift detected! {} features drifted.",
                report.num_features_drifted
            );
        } else {
            info!(
                "No significant drift detected across {} features.",
                report.num_features_checked
            );
        }
        report
    }

    /// Compare one feature's current values against its baseline.
    ///
    /// Returns the trivial insufficient-data entry when either side has
    /// fewer than two values.
    pub fn compare_feature(
        &self,
        baseline: &FeatureBaseline,
        current_values: &[f64],
    ) -> FeatureDriftReport {
        self.evaluate(baseline, current_values).0
    }

    /// The rounded report entry together with the unrounded PSI and KS
    /// result it was built from (`None` for insufficient samples). Alerts
    /// are formatted from the unrounded pair.
    fn evaluate(
        &self,
        baseline: &FeatureBaseline,
        current_values: &[f64],
    ) -> (FeatureDriftReport, Option<(f64, KsResult)>) {
        if baseline.raw_values.len() < MIN_SAMPLES || current_values.len() < MIN_SAMPLES {
            return (FeatureDriftReport::insufficient(), None);
        }
        let psi = compute_psi_with(
            &baseline.raw_values,
            current_values,
            self.config.psi_bins,
            self.config.psi_edge_margin,
            self.config.psi_proportion_floor,
        );
        let ks = compute_ks_with(
            &baseline.raw_values,
            current_values,
            self.config.ks_alpha,
            self.config.ks_method,
        );

        let drift_detected = psi >= self.config.psi_threshold || ks.drift_detected;
        let current_mean = summary::mean(current_values).unwrap_or(0.0);

        let report = FeatureDriftReport::Evaluated(FeatureDriftStats {
            psi: round_to(psi, 6),
            ks_statistic: round_to(ks.statistic, 6),
            ks_p_value: round_to(ks.p_value, 6),
            drift_detected,
            current_mean: round_to(current_mean, 4),
            baseline_mean: round_to(baseline.mean, 4),
            mean_shift: round_to(current_mean - baseline.mean, 4),
        });
        (report, Some((psi, ks)))
    }
}

/// Human-readable alert line for a drifted feature.
pub fn format_alert(feature: &str, psi: f64, psi_threshold: f64, ks_p_value: f64) -> String {
    format!(
        "Feature '{}': PSI={:.4} (threshold={:?}), KS p-value={:.4}",
        feature, psi, psi_threshold, ks_p_value
    )
}

/// Mean and sample standard deviation of every numeric column.
pub fn current_feature_stats(frame: &FeatureFrame) -> BTreeMap<String, FeatureStats> {
    frame
        .numeric_columns()
        .map(|(name, cells)| {
            let values = non_missing(cells);
            (
                name.to_string(),
                FeatureStats {
                    mean: summary::mean(&values),
                    std: summary::std_dev(&values, 1),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::save_baseline;
    use crate::config::{KsMethod, DEFAULT_PSI_BINS};
    use crate::ks::compute_ks;
    use crate::metrics::compute_psi;
    use crate::testing::{normal_sample, stratified_normal};
    use cohort_core::{Column, ColumnValues};
    use cohort_store::InMemoryBaselineStore;

    fn alternating_pair() -> (Vec<f64>, Vec<f64>) {
        let expected: Vec<f64> = (0..10)
            .flat_map(|i| std::iter::repeat(i as f64 + 0.5).take(10))
            .collect();
        let actual: Vec<f64> = (0..10)
            .flat_map(|i| std::iter::repeat(i as f64 + 0.5).take(if i % 2 == 0 { 14 } else { 6 }))
            .collect();
        (expected, actual)
    }

    #[test]
    fn no_baseline_returns_stats() {
        let store = InMemoryBaselineStore::new();
        let df = FeatureFrame::new()
            .with_numeric("Age", vec![25.0, 30.0, 35.0, 40.0, 45.0])
            .with_numeric("Annual Income ($)", vec![40000.0, 50000.0, 60000.0, 70000.0, 80000.0])
            .with_numeric("Spending Score (1-100)", vec![30.0, 50.0, 60.0, 70.0, 80.0]);

        let result = DriftDetector::new().check_drift(&df, &store, "/nonexistent/path.json");
        assert!(!result.drift_detected());
        match result {
            DriftCheckResult::NoBaseline(report) => {
                assert_eq!(report.feature_stats.len(), 3);
                let age = report.feature_stats["Age"];
                assert_eq!(age.mean, Some(35.0));
                assert!((age.std.unwrap() - 62.5f64.sqrt()).abs() < 1e-12);
                assert_eq!(report.message, NO_BASELINE_MESSAGE);
            }
            other => panic!("expected NoBaseline, got {:?}", other),
        }
    }

    #[test]
    fn same_data_as_baseline_has_no_drift() {
        let store = InMemoryBaselineStore::new();
        let df = FeatureFrame::new()
            .with_numeric("Age", normal_sample(35.0, 10.0, 100, 42))
            .with_numeric("Annual Income ($)", normal_sample(60000.0, 15000.0, 100, 43));
        save_baseline(&df, &store, "baseline.json").unwrap();

        let result = DriftDetector::new().check_drift(&df, &store, "baseline.json");
        let report = result.report().expect("baseline should load");
        assert!(!report.drift_detected);
        assert_eq!(report.num_features_checked, 2);
        assert_eq!(report.num_features_drifted, 0);
        assert!(report.alerts.is_empty());
        for entry in report.features.values() {
            let stats = entry.stats().unwrap();
            assert_eq!(stats.psi, 0.0);
            assert_eq!(stats.ks_p_value, 1.0);
            assert_eq!(stats.mean_shift, 0.0);
        }
    }

    #[test]
    fn shifted_data_is_flagged_with_alerts() {
        let store = InMemoryBaselineStore::new();
        let baseline = FeatureFrame::new().with_numeric("Age", stratified_normal(35.0, 10.0, 500, 1));
        save_baseline(&baseline, &store, "baseline.json").unwrap();

        let current = FeatureFrame::new().with_numeric("Age", stratified_normal(55.0, 10.0, 500, 2));
        let result = DriftDetector::new().check_drift(&current, &store, "baseline.json");
        let report = result.report().unwrap();

        assert!(report.drift_detected);
        assert_eq!(report.num_features_drifted, 1);
        assert_eq!(report.alerts.len(), 1);
        assert!(
            report.alerts[0].starts_with("Feature 'Age': PSI="),
            "alert: {}",
            report.alerts[0]
        );
        assert!(report.alerts[0].contains("(threshold=0.2), KS p-value=0.0000"));

        let stats = report.features["Age"].stats().unwrap();
        assert!((stats.mean_shift - 20.0).abs() < 0.5, "shift {}", stats.mean_shift);
        assert!((stats.current_mean - stats.baseline_mean - stats.mean_shift).abs() < 1e-3);
    }

    #[test]
    fn psi_threshold_sensitivity() {
        let (expected, actual) = alternating_pair();
        let store = InMemoryBaselineStore::new();
        save_baseline(&FeatureFrame::new().with_numeric("x", expected), &store, "b.json").unwrap();
        let current = FeatureFrame::new().with_numeric("x", actual);

        let low = DriftDetector::with_config(DriftConfig::default().with_psi_threshold(0.1))
            .check_drift(&current, &store, "b.json");
        let high = DriftDetector::with_config(DriftConfig::default().with_psi_threshold(0.2))
            .check_drift(&current, &store, "b.json");

        assert!(low.drift_detected(), "PSI ~0.17 should flag at 0.1");
        assert!(!high.drift_detected(), "PSI ~0.17 should not flag at 0.2");

        let stats = high.report().unwrap().features["x"].stats().unwrap().clone();
        assert!(stats.psi > 0.1 && stats.psi < 0.2, "psi {}", stats.psi);
        assert!(stats.ks_p_value > 0.05, "KS should not flag: {}", stats.ks_p_value);
        assert_eq!(high.report().unwrap().psi_threshold, 0.2);
        assert_eq!(low.alerts().len(), 1);
        assert!(low.alerts()[0].contains("(threshold=0.1)"));
    }

    #[test]
    fn insufficient_current_values_give_trivial_entry() {
        let store = InMemoryBaselineStore::new();
        let baseline = FeatureFrame::new().with_numeric("Age", normal_sample(35.0, 10.0, 500, 7));
        save_baseline(&baseline, &store, "b.json").unwrap();

        let mut current = FeatureFrame::new();
        current
            .push_column(Column {
                name: "Age".to_string(),
                values: ColumnValues::Numeric(vec![Some(41.0), None, None]),
            })
            .unwrap();

        let result = DriftDetector::new().check_drift(&current, &store, "b.json");
        let report = result.report().unwrap();
        assert_eq!(report.features["Age"], FeatureDriftReport::insufficient());
        assert_eq!(report.num_features_checked, 1);
        assert_eq!(report.num_features_drifted, 0);
        assert!(!report.drift_detected);
    }

    #[test]
    fn one_sided_columns_are_skipped() {
        let store = InMemoryBaselineStore::new();
        let baseline = FeatureFrame::new()
            .with_numeric("Age", vec![1.0, 2.0, 3.0])
            .with_numeric("Retired", vec![0.0, 1.0, 0.0]);
        save_baseline(&baseline, &store, "b.json").unwrap();

        let current = FeatureFrame::new()
            .with_numeric("Age", vec![1.0, 2.0, 3.0])
            .with_numeric("Family Size", vec![100.0, 200.0, 300.0])
            .with_categorical("Profession", vec!["a", "b", "c"]);

        let report = DriftDetector::new()
            .check_drift(&current, &store, "b.json")
            .report()
            .cloned()
            .unwrap();
        assert_eq!(report.features.keys().collect::<Vec<_>>(), vec!["Age"]);
        assert_eq!(report.num_features_checked, 1);
    }

    #[test]
    fn frame_without_numeric_columns_yields_empty_report() {
        let store = InMemoryBaselineStore::new();
        save_baseline(
            &FeatureFrame::new().with_numeric("Age", vec![1.0, 2.0]),
            &store,
            "b.json",
        )
        .unwrap();

        let current = FeatureFrame::new().with_categorical("Gender", vec!["Male"]);
        let result = DriftDetector::new().check_drift(&current, &store, "b.json");
        let report = result.report().unwrap();
        assert!(report.features.is_empty());
        assert!(!report.drift_detected);
        assert_eq!(report.num_features_checked, 0);

        let empty = DriftDetector::new().check_drift(&FeatureFrame::new(), &store, "b.json");
        assert!(!empty.drift_detected());
    }

    #[test]
    fn disabled_ks_leaves_psi_in_charge() {
        let store = InMemoryBaselineStore::new();
        let baseline = FeatureFrame::new().with_numeric("Age", stratified_normal(35.0, 10.0, 500, 1));
        save_baseline(&baseline, &store, "b.json").unwrap();
        let current = FeatureFrame::new().with_numeric("Age", stratified_normal(55.0, 10.0, 500, 2));

        let detector =
            DriftDetector::with_config(DriftConfig::default().with_ks_method(KsMethod::Disabled));
        let report = detector.check_drift(&current, &store, "b.json").report().cloned().unwrap();
        let stats = report.features["Age"].stats().unwrap();

        assert_eq!(stats.ks_p_value, 1.0);
        assert_eq!(stats.ks_statistic, 0.0);
        assert!(stats.drift_detected, "PSI alone should flag a 2 sigma shift");
    }

    #[test]
    fn alerts_carry_the_metrics_behind_the_report() {
        let (expected, actual) = alternating_pair();
        let mut baseline = BaselineSnapshot::new();
        baseline.insert("x", FeatureBaseline::from_values(expected.clone()).unwrap());
        let current = FeatureFrame::new().with_numeric("x", actual.clone());

        let detector = DriftDetector::with_config(DriftConfig::default().with_psi_threshold(0.1));
        let report = detector.compare(&current, &baseline);

        let psi = compute_psi(&expected, &actual, DEFAULT_PSI_BINS);
        let ks = compute_ks(&expected, &actual);
        assert_eq!(report.alerts, vec![format_alert("x", psi, 0.1, ks.p_value)]);

        let stats = report.features["x"].stats().unwrap();
        assert_eq!(stats.psi, round_to(psi, 6));
        assert_eq!(stats.ks_p_value, round_to(ks.p_value, 6));
    }

    #[test]
    fn format_alert_layout() {
        assert_eq!(
            format_alert("Age", 0.123456, 0.2, 0.00001),
            "Feature 'Age': PSI=0.1235 (threshold=0.2), KS p-value=0.0000"
        );
    }

    #[test]
    fn whole_number_thresholds_keep_their_decimal_point() {
        assert_eq!(
            format_alert("Age", 1.5, 1.0, 0.5),
            "Feature 'Age': PSI=1.5000 (threshold=1.0), KS p-value=0.5000"
        );
        assert!(format_alert("Age", 0.3, 0.25, 0.5).contains("(threshold=0.25)"));
    }
}
