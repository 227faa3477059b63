use thiserror::Error;

/// Workspace-wide error types for Cohort Lens.
#[derive(Debug, Error)]
pub enum CohortError {
    /// Storage layer error (filesystem, RocksDB, in-memory store).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input data that cannot be interpreted (ragged rows, bad cells).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be read or resolved.
    #[error("Config error: {0}")]
    Config(String),

    /// Stored content does not match its recorded digest.
    #[error("Integrity error: {0}")]
    Integrity(String),
}

impl From<serde_json::Error> for CohortError {
    fn from(e: serde_json::Error) -> Self {
        CohortError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CohortError {
    fn from(e: std::io::Error) -> Self {
        CohortError::Storage(e.to_string())
    }
}
