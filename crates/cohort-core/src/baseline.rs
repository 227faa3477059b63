// crates/cohort-core/src/baseline.rs
//
// Baseline snapshot types.
//
// A snapshot records, for every numeric feature, summary statistics and the
// full non-missing sample at snapshot time. The sample is what later drift
// checks compare against; the summary fields are for humans and reports.
//
// Persisted form (JSON), keyed by feature name:
//   { "Age": { "mean": .., "std": .., "min": .., "max": .., "median": .., "values": [..] } }

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::frame::{non_missing, FeatureFrame};
use crate::summary;

/// Statistics for one numeric feature at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBaseline {
    /// Mean of `values`.
    #[serde(default)]
    pub mean: f64,
    /// Population standard deviation of `values`.
    #[serde(default)]
    pub std: f64,
    /// Smallest value.
    #[serde(default)]
    pub min: f64,
    /// Largest value.
    #[serde(default)]
    pub max: f64,
    /// Median of `values`.
    #[serde(default)]
    pub median: f64,
    /// The full non-missing sample, in column order.
    #[serde(default, rename = "values")]
    pub raw_values: Vec<f64>,
}

impl FeatureBaseline {
    /// Summarize a sample. Returns `None` for an empty sample, since a
    /// baseline entry must always carry at least one value.
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        let mean = summary::mean(&values)?;
        let std = summary::std_dev(&values, 0)?;
        let median = summary::median(&values)?;
        let (min, max) = summary::min_max(&values)?;
        Some(Self {
            mean,
            std,
            min,
            max,
            median,
            raw_values: values,
        })
    }

    /// Number of stored sample values.
    pub fn sample_size(&self) -> usize {
        self.raw_values.len()
    }
}

/// Feature name -> baseline, persisted as one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineSnapshot {
    features: BTreeMap<String, FeatureBaseline>,
}

impl BaselineSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self {
            features: BTreeMap::new(),
        }
    }

    /// Snapshot every numeric column of `frame`.
    ///
    /// Columns without a single non-missing value are left out.
    pub fn from_frame(frame: &FeatureFrame) -> Self {
        let mut snapshot = Self::new();
        for (name, cells) in frame.numeric_columns() {
            if let Some(baseline) = FeatureBaseline::from_values(non_missing(cells)) {
                snapshot.insert(name, baseline);
            }
        }
        snapshot
    }

    /// Insert or replace a feature's baseline.
    pub fn insert(&mut self, feature_name: &str, baseline: FeatureBaseline) {
        self.features.insert(feature_name.to_string(), baseline);
    }

    /// Look up a feature's baseline.
    pub fn get(&self, feature_name: &str) -> Option<&FeatureBaseline> {
        self.features.get(feature_name)
    }

    /// Iterate over `(feature_name, baseline)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureBaseline)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Feature names in name order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.keys().map(String::as_str).collect()
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the snapshot has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Total number of stored sample values across all features.
    pub fn total_values(&self) -> usize {
        self.features.values().map(FeatureBaseline::sample_size).sum()
    }
}
