// crates/cohort-store/src/lib.rs
//
// cohort-store: Storage backends for Cohort Lens baselines.
//
// Provides a filesystem store with write-then-rename overwrites, an
// in-memory store for tests and in-process service layers, and (behind the
// `rocksdb` feature) a RocksDB store for deployments that keep baselines in
// a local key-value database.

pub mod fs;
pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocks;

// Re-export key types for ergonomic access from downstream crates.
pub use fs::FsBaselineStore;
pub use memory::InMemoryBaselineStore;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksBaselineStore;
