// crates/cohort-drift/src/baseline.rs
//
// Baseline persistence on top of a `BaselineStore`.
//
// Writes favour correctness: any storage or encoding failure is returned
// to the caller. Reads favour availability: a missing, unreadable, or
// corrupt baseline is reported as "no baseline" and logged.

use tracing::{debug, info, warn};

use cohort_core::{BaselineSnapshot, BaselineStore, CohortError, FeatureFrame};

/// Encode a snapshot as a pretty-printed JSON document.
pub fn encode_snapshot(snapshot: &BaselineSnapshot) -> Result<Vec<u8>, CohortError> {
    Ok(serde_json::to_vec_pretty(snapshot)?)
}

/// Decode a snapshot from its JSON document.
pub fn decode_snapshot(bytes: &[u8]) -> Result<BaselineSnapshot, CohortError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Snapshot every numeric column of `data` and write it to `location`,
/// replacing any existing baseline there.
pub fn save_baseline(
    data: &FeatureFrame,
    store: &dyn BaselineStore,
    location: &str,
) -> Result<BaselineSnapshot, CohortError> {
    let snapshot = BaselineSnapshot::from_frame(data);
    write_snapshot(store, location, &snapshot)?;
    info!("Baseline saved to {} ({} features)", location, snapshot.len());
    Ok(snapshot)
}

/// Write an already-built snapshot to `location`.
pub fn write_snapshot(
    store: &dyn BaselineStore,
    location: &str,
    snapshot: &BaselineSnapshot,
) -> Result<(), CohortError> {
    let bytes = encode_snapshot(snapshot)?;
    store.put_blob(location, &bytes)
}

/// Load the baseline at `location`.
///
/// Returns `None` if nothing is stored there, or if the stored document
/// cannot be read or decoded.
pub fn load_baseline(store: &dyn BaselineStore, location: &str) -> Option<BaselineSnapshot> {
    let bytes = match store.get_blob(location) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("No baseline stored at {}", location);
            return None;
        }
        Err(e) => {
            warn!("Failed to read baseline at {}: {}", location, e);
            return None;
        }
    };

    match decode_snapshot(&bytes) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Failed to load baseline at {}: {}", location, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_store::InMemoryBaselineStore;

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl BaselineStore for ReadOnlyStore {
        fn get_blob(&self, _key: &str) -> Result<Option<Vec<u8>>, CohortError> {
            Err(CohortError::Storage("device unavailable".to_string()))
        }

        fn put_blob(&self, _key: &str, _bytes: &[u8]) -> Result<(), CohortError> {
            Err(CohortError::Storage("read-only".to_string()))
        }
    }

    #[test]
    fn save_and_load() {
        let store = InMemoryBaselineStore::new();
        let df = FeatureFrame::new()
            .with_numeric("Age", vec![25.0, 30.0, 35.0])
            .with_numeric("Income", vec![40000.0, 50000.0, 60000.0]);

        save_baseline(&df, &store, "baseline.json").unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&store.get_blob("baseline.json").unwrap().unwrap()).unwrap();
        assert!(raw.get("Age").is_some());
        assert!(raw.get("Income").is_some());
        assert!(raw["Age"].get("mean").is_some());
        assert_eq!(raw["Age"]["values"].as_array().unwrap().len(), 3);

        let loaded = load_baseline(&store, "baseline.json").unwrap();
        assert_eq!(loaded.get("Age").unwrap().mean, 30.0);
        assert_eq!(loaded.get("Income").unwrap().raw_values, vec![40000.0, 50000.0, 60000.0]);
    }

    #[test]
    fn save_overwrites_rather_than_accumulates() {
        let store = InMemoryBaselineStore::new();
        let first = FeatureFrame::new().with_numeric("Age", vec![1.0, 2.0]);
        let second = FeatureFrame::new().with_numeric("Score", vec![3.0, 4.0, 5.0]);

        save_baseline(&first, &store, "b.json").unwrap();
        save_baseline(&second, &store, "b.json").unwrap();

        let loaded = load_baseline(&store, "b.json").unwrap();
        assert_eq!(loaded.feature_names(), vec!["Score"]);
    }

    #[test]
    fn missing_baseline_is_none() {
        let store = InMemoryBaselineStore::new();
        assert!(load_baseline(&store, "nope.json").is_none());
    }

    #[test]
    fn corrupt_baseline_is_none() {
        let store = InMemoryBaselineStore::new();
        store.put_blob("baseline.json", b"{not json").unwrap();
        assert!(load_baseline(&store, "baseline.json").is_none());

        store.put_blob("baseline.json", b"[1, 2, 3]").unwrap();
        assert!(load_baseline(&store, "baseline.json").is_none());
    }

    #[test]
    fn unreadable_baseline_is_none() {
        assert!(load_baseline(&ReadOnlyStore, "baseline.json").is_none());
    }

    #[test]
    fn write_failure_propagates() {
        let df = FeatureFrame::new().with_numeric("Age", vec![1.0, 2.0]);
        let err = save_baseline(&df, &ReadOnlyStore, "baseline.json").unwrap_err();
        assert!(matches!(err, CohortError::Storage(_)));
    }
}
