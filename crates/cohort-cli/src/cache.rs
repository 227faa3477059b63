// crates/cohort-cli/src/cache.rs
//
// Dataset cache for repeated checks of the same file.
//
// Holds the last loaded frame together with the path and modification time
// it was read at. A later request for the same path reuses the frame until
// the file's modification time changes or `invalidate` is called.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::loader::{load_frame, LoadError};
use cohort_core::FeatureFrame;

struct CachedFrame {
    path: PathBuf,
    modified: SystemTime,
    frame: Arc<FeatureFrame>,
}

/// Single-entry cache of a loaded dataset.
#[derive(Default)]
pub struct FrameCache {
    entry: Option<CachedFrame>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Return the frame for `path`, loading it if the cache is empty, holds a
    /// different path, or the file changed since it was loaded.
    ///
    /// The flag is true when the file was (re)loaded by this call.
    pub fn get_or_load(&mut self, path: &Path) -> Result<(Arc<FeatureFrame>, bool), LoadError> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })?;

        if let Some(entry) = &self.entry {
            if entry.path.as_path() == path && entry.modified == modified {
                return Ok((Arc::clone(&entry.frame), false));
            }
        }

        let frame = Arc::new(load_frame(path)?);
        tracing::debug!("Loaded dataset {}", path.display());
        self.entry = Some(CachedFrame {
            path: path.to_path_buf(),
            modified,
            frame: Arc::clone(&frame),
        });
        Ok((frame, true))
    }

    /// Drop the cached frame so the next request reloads from disk.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}
