// crates/cohort-core/src/lib.rs
//
// cohort-core: Core types, traits, and summary statistics for Cohort Lens.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the tabular feature frame the drift engine consumes, the
// baseline snapshot data model, the workspace error type, and the blob
// store trait that storage backends implement.

pub mod baseline;
pub mod error;
pub mod frame;
pub mod summary;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use cohort_core::FeatureFrame;`

// Data model
pub use baseline::{BaselineSnapshot, FeatureBaseline};
pub use frame::{non_missing, Column, ColumnValues, FeatureFrame};

// Error type
pub use error::CohortError;

// Traits
pub use traits::BaselineStore;
