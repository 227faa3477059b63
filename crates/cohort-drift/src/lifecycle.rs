// crates/cohort-drift/src/lifecycle.rs
//
// Baseline lifecycle: replacing the active baseline with current data.
//
// `snapshot_as_baseline` is the plain overwrite. `BaselineLifecycle` adds
// versioned snapshots: each one is archived under its own key, recorded in
// a history document next to the active baseline, and can be restored later
// after its digest is verified.
//
// Storage layout for location `baseline.json`:
//   baseline.json          active snapshot (what `check_drift` reads)
//   baseline.v{n}.json     archived snapshot n
//   baseline.json.history  JSON-encoded `VersionRegistry`

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use cohort_core::{BaselineSnapshot, BaselineStore, CohortError, FeatureFrame};

use crate::baseline::{encode_snapshot, save_baseline};
use crate::versioning::{BaselineVersion, VersionRegistry};

/// Replace the baseline at `location` with statistics of `current`.
///
/// This is the only way a baseline changes; drift checks never write.
pub fn snapshot_as_baseline(
    current: &FeatureFrame,
    store: &dyn BaselineStore,
    location: &str,
) -> Result<BaselineSnapshot, CohortError> {
    save_baseline(current, store, location)
}

/// Archive key for version `version` of `location`.
///
/// The version is inserted before the file extension of the last path
/// segment: `data/baseline.json` becomes `data/baseline.v3.json`.
pub fn archive_key(location: &str, version: u32) -> String {
    let segment_start = location.rfind('/').map_or(0, |i| i + 1);
    match location[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let split = segment_start + dot;
            format!("{}.v{}{}", &location[..split], version, &location[split..])
        }
        _ => format!("{}.v{}", location, version),
    }
}

/// Key of the history document for `location`.
pub fn history_key(location: &str) -> String {
    format!("{}.history", location)
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Versioned baseline operations over a store.
pub struct BaselineLifecycle<'a> {
    store: &'a dyn BaselineStore,
}

impl<'a> BaselineLifecycle<'a> {
    pub fn new(store: &'a dyn BaselineStore) -> Self {
        Self { store }
    }

    /// Unversioned overwrite; see [`snapshot_as_baseline`].
    pub fn snapshot(
        &self,
        current: &FeatureFrame,
        location: &str,
    ) -> Result<BaselineSnapshot, CohortError> {
        snapshot_as_baseline(current, self.store, location)
    }

    /// Snapshot `current`, archive it as the next version, and make it the
    /// active baseline.
    ///
    /// Fails without writing anything if the existing history document
    /// cannot be decoded, so a corrupt history is never silently replaced.
    pub fn snapshot_versioned(
        &self,
        current: &FeatureFrame,
        location: &str,
    ) -> Result<BaselineVersion, CohortError> {
        let mut registry = self.load_history_strict(location)?;
        let snapshot = BaselineSnapshot::from_frame(current);
        let bytes = encode_snapshot(&snapshot)?;

        let number = registry.next_version();
        let version = BaselineVersion {
            location: location.to_string(),
            version: number,
            archive_key: archive_key(location, number),
            created_at: Utc::now(),
            num_features: snapshot.len(),
            num_values: snapshot.total_values(),
            sha256: digest_hex(&bytes),
        };

        self.store.put_blob(&version.archive_key, &bytes)?;
        self.store.put_blob(location, &bytes)?;
        registry.register(version.clone());
        self.store
            .put_blob(&history_key(location), &serde_json::to_vec_pretty(&registry)?)?;

        info!(
            "Baseline version {} saved to {} ({} features, archived as {})",
            version.version, location, version.num_features, version.archive_key
        );
        Ok(version)
    }

    /// Version history of `location`.
    ///
    /// A missing, unreadable, or corrupt history yields an empty registry.
    pub fn history(&self, location: &str) -> VersionRegistry {
        match self.load_history_strict(location) {
            Ok(registry) => registry,
            Err(e) => {
                warn!("Failed to load baseline history for {}: {}", location, e);
                VersionRegistry::new()
            }
        }
    }

    /// Copy archived version `version` back over the active baseline.
    pub fn restore(&self, location: &str, version: u32) -> Result<BaselineVersion, CohortError> {
        let registry = self.history(location);
        let entry = registry.get(version).cloned().ok_or_else(|| {
            CohortError::NotFound(format!("Baseline version {} of {}", version, location))
        })?;

        let bytes = self.store.get_blob(&entry.archive_key)?.ok_or_else(|| {
            CohortError::NotFound(format!("Archived baseline {}", entry.archive_key))
        })?;

        let actual = digest_hex(&bytes);
        if actual != entry.sha256 {
            return Err(CohortError::Integrity(format!(
                "{}: expected sha256 {}, found {}",
                entry.archive_key, entry.sha256, actual
            )));
        }

        self.store.put_blob(location, &bytes)?;
        info!("Restored baseline version {} to {}", version, location);
        Ok(entry)
    }

    fn load_history_strict(&self, location: &str) -> Result<VersionRegistry, CohortError> {
        match self.store.get_blob(&history_key(location))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(VersionRegistry::new()),
        }
    }
}
