// crates/cohort-cli/src/config.rs
//
// Runtime configuration for the cohort CLI.
// Loaded from a TOML file or populated with defaults, then overridden by
// COHORT_* environment variables and command-line flags.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use cohort_core::{BaselineStore, CohortError};
use cohort_drift::DriftConfig;
use cohort_store::{FsBaselineStore, InMemoryBaselineStore};

/// Environment variable overriding `data_dir`.
pub const ENV_DATA_DIR: &str = "COHORT_DATA_DIR";
/// Environment variable overriding `baseline`.
pub const ENV_BASELINE: &str = "COHORT_BASELINE";
/// Environment variable overriding `drift.psi_threshold`.
pub const ENV_PSI_THRESHOLD: &str = "COHORT_PSI_THRESHOLD";
/// Environment variable overriding `drift.ks_alpha`.
pub const ENV_KS_ALPHA: &str = "COHORT_KS_ALPHA";

/// Where baselines are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON files under `data_dir`.
    #[default]
    Fs,
    /// Process memory; nothing survives the command.
    Memory,
    /// RocksDB database under `data_dir` (needs the `rocksdb` feature).
    Rocks,
}

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CohortConfig {
    /// Directory baseline keys are resolved against.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Key of the active baseline inside the store.
    #[serde(default = "default_baseline")]
    pub baseline: String,

    /// Storage backend for baselines.
    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between checks in `cohort watch`.
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,

    /// Drift thresholds and binning.
    #[serde(default)]
    pub drift: DriftConfig,
}

fn default_data_dir() -> String {
    "data/processed".to_string()
}

fn default_baseline() -> String {
    "baseline.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_watch_interval_secs() -> u64 {
    60
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            baseline: default_baseline(),
            store_backend: StoreBackend::default(),
            log_level: default_log_level(),
            watch_interval_secs: default_watch_interval_secs(),
            drift: DriftConfig::default(),
        }
    }
}

impl CohortConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: CohortConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply COHORT_* overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), CohortError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), CohortError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = dir;
        }
        if let Some(baseline) = lookup(ENV_BASELINE) {
            self.baseline = baseline;
        }
        if let Some(raw) = lookup(ENV_PSI_THRESHOLD) {
            self.drift.psi_threshold = parse_number(ENV_PSI_THRESHOLD, &raw)?;
        }
        if let Some(raw) = lookup(ENV_KS_ALPHA) {
            self.drift.ks_alpha = parse_number(ENV_KS_ALPHA, &raw)?;
        }
        Ok(())
    }

    /// `data_dir` with a leading `~` expanded.
    pub fn resolved_data_dir(&self) -> String {
        expand_tilde(&self.data_dir)
    }

    /// Open the configured baseline store.
    pub fn open_store(&self) -> Result<Box<dyn BaselineStore>, CohortError> {
        let data_dir = self.resolved_data_dir();
        match self.store_backend {
            StoreBackend::Fs => Ok(Box::new(FsBaselineStore::new(data_dir))),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory baseline store; baselines will not persist");
                Ok(Box::new(InMemoryBaselineStore::new()))
            }
            StoreBackend::Rocks => open_rocks(&data_dir),
        }
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocks(data_dir: &str) -> Result<Box<dyn BaselineStore>, CohortError> {
    let path = Path::new(data_dir).join("baselines.rocksdb");
    let store = cohort_store::RocksBaselineStore::open(&path.to_string_lossy())?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocks(data_dir: &str) -> Result<Box<dyn BaselineStore>, CohortError> {
    tracing::warn!(
        "store_backend = \"rocks\" but this build lacks the rocksdb feature; using files in {}",
        data_dir
    );
    Ok(Box::new(FsBaselineStore::new(data_dir)))
}

fn parse_number(key: &str, raw: &str) -> Result<f64, CohortError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| CohortError::Config(format!("{}={:?} is not a number: {}", key, raw, e)))
}

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}
