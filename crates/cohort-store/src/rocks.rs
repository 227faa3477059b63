// crates/cohort-store/src/rocks.rs
//
// RocksDB-backed baseline store (feature `rocksdb`).
//
// Key format:
//   - `baseline:{key}` -> raw blob bytes (JSON snapshot or history document)
//
// RocksDB writes are atomic per key, which gives the same overwrite
// guarantee as the filesystem store's write-then-rename.

use rocksdb::{DBWithThreadMode, MultiThreaded, Options};

use cohort_core::error::CohortError;
use cohort_core::traits::BaselineStore;

/// RocksDB wrapper implementing the `BaselineStore` trait.
#[derive(Debug)]
pub struct RocksBaselineStore {
    db: DBWithThreadMode<MultiThreaded>,
}

impl RocksBaselineStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, CohortError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path).map_err(|e| {
            CohortError::Storage(format!("Failed to open RocksDB at {}: {}", path, e))
        })?;

        Ok(Self { db })
    }

    /// Build the storage key for a baseline blob: `baseline:{key}`.
    fn blob_key(key: &str) -> Vec<u8> {
        format!("baseline:{}", key).into_bytes()
    }

    /// Delete a blob, mapping errors to CohortError::Storage.
    pub fn delete_blob(&self, key: &str) -> Result<(), CohortError> {
        self.db
            .delete(Self::blob_key(key))
            .map_err(|e| CohortError::Storage(format!("RocksDB delete failed: {}", e)))
    }
}

impl BaselineStore for RocksBaselineStore {
    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, CohortError> {
        self.db
            .get(Self::blob_key(key))
            .map_err(|e| CohortError::Storage(format!("RocksDB get failed: {}", e)))
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), CohortError> {
        self.db
            .put(Self::blob_key(key), bytes)
            .map_err(|e| CohortError::Storage(format!("RocksDB put failed: {}", e)))
    }
}
