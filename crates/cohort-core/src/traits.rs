// crates/cohort-core/src/traits.rs

use crate::error::CohortError;

/// Trait for key-value storage of baseline documents.
///
/// Keys are paths or identifiers chosen by the caller; values are opaque
/// bytes (JSON documents in practice). Implemented by cohort-store
/// (filesystem, in-memory, and RocksDB backends).
pub trait BaselineStore: Send + Sync {
    /// Fetch the blob stored under `key`. Returns `Ok(None)` if nothing is stored there.
    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, CohortError>;

    /// Store `bytes` under `key`, replacing any previous value.
    ///
    /// Backends create whatever parent structure the key implies.
    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), CohortError>;
}
