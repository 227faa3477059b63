// crates/cohort-store/src/memory.rs
//
// In-memory baseline store implementing the `BaselineStore` trait.
//
// Holds blobs in a HashMap behind an RwLock. Used by tests and by service
// layers that keep the active baseline in process; nothing survives a
// restart.

use std::collections::HashMap;
use std::sync::RwLock;

use cohort_core::error::CohortError;
use cohort_core::traits::BaselineStore;

/// In-memory key-value blob store.
#[derive(Debug)]
pub struct InMemoryBaselineStore {
    /// Map from key to stored bytes.
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBaselineStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Return the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("RwLock poisoned").len()
    }

    /// Return whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .blobs
            .read()
            .expect("RwLock poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, CohortError> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| CohortError::Storage(format!("RwLock poisoned: {}", e)))?;
        Ok(blobs.remove(key).is_some())
    }
}

impl Default for InMemoryBaselineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BaselineStore for InMemoryBaselineStore {
    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, CohortError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| CohortError::Storage(format!("RwLock poisoned: {}", e)))?;
        Ok(blobs.get(key).cloned())
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), CohortError> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| CohortError::Storage(format!("RwLock poisoned: {}", e)))?;
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
