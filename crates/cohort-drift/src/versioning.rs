// crates/cohort-drift/src/versioning.rs
//
// Baseline version registry.
//
// Tracks which baseline snapshots have been archived for a location, when
// they were taken, and the digest of each archived document. The registry
// itself is persisted next to the active baseline as a JSON history document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One archived baseline snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineVersion {
    /// The active baseline location this version belongs to.
    pub location: String,
    /// Sequential version number, starting at 1.
    pub version: u32,
    /// Store key of the archived snapshot document.
    pub archive_key: String,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// Number of features in the snapshot.
    pub num_features: usize,
    /// Total number of sample values across all features.
    pub num_values: usize,
    /// Hex-encoded SHA-256 of the archived document bytes.
    pub sha256: String,
}

/// Registry of archived baseline versions for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionRegistry {
    /// All registered versions, ordered by registration time.
    pub versions: Vec<BaselineVersion>,
}

impl VersionRegistry {
    /// Create a new empty VersionRegistry.
    pub fn new() -> Self {
        Self {
            versions: Vec::new(),
        }
    }

    /// Register a new version.
    pub fn register(&mut self, version: BaselineVersion) {
        self.versions.push(version);
    }

    /// The latest version (highest version number).
    pub fn current(&self) -> Option<&BaselineVersion> {
        self.versions.iter().max_by_key(|v| v.version)
    }

    /// Look up a specific version number.
    pub fn get(&self, version: u32) -> Option<&BaselineVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// All versions, ordered by version number.
    pub fn list(&self) -> Vec<&BaselineVersion> {
        let mut versions: Vec<&BaselineVersion> = self.versions.iter().collect();
        versions.sort_by_key(|v| v.version);
        versions
    }

    /// The number the next registered version should carry.
    pub fn next_version(&self) -> u32 {
        self.current().map_or(1, |v| v.version + 1)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
