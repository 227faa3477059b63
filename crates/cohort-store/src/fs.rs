// crates/cohort-store/src/fs.rs
//
// Filesystem-backed baseline store.
//
// Keys are paths relative to a root directory (absolute keys are used as
// given). Writes go to a uniquely named temporary file in the target
// directory and are then renamed over the destination, so a concurrent
// reader sees either the old document or the new one, never a torn write.
// Concurrent writers to the same key still race; the last rename wins.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use cohort_core::error::CohortError;
use cohort_core::traits::BaselineStore;

/// Baseline store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBaselineStore {
    root: PathBuf,
}

impl FsBaselineStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory keys are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a filesystem path.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let key_path = Path::new(key);
        if key_path.is_absolute() {
            key_path.to_path_buf()
        } else {
            self.root.join(key_path)
        }
    }
}

impl BaselineStore for FsBaselineStore {
    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, CohortError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CohortError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), CohortError> {
        let path = self.path_for(key);
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent).map_err(|e| {
            CohortError::Storage(format!("Failed to create {}: {}", parent.display(), e))
        })?;

        let file_name = path
            .file_name()
            .ok_or_else(|| CohortError::Storage(format!("Key '{}' has no file name", key)))?
            .to_string_lossy()
            .to_string();
        let tmp_path = parent.join(format!(".{}.tmp-{}", file_name, Uuid::new_v4()));

        let write_result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &path)
        })();

        if let Err(e) = write_result {
            // Best effort: do not leave a stray temporary file behind.
            let _ = fs::remove_file(&tmp_path);
            return Err(CohortError::Storage(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )));
        }

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
