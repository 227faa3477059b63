// crates/cohort-cli/src/commands/mod.rs
//
// Command module declarations for the cohort CLI, plus the context every
// command runs with.

pub mod check;
pub mod history;
pub mod restore;
pub mod snapshot;
pub mod watch;

use std::sync::Arc;

use cohort_core::BaselineStore;

use crate::config::CohortConfig;

/// Resolved configuration and the opened baseline store.
pub struct Context {
    pub config: CohortConfig,
    pub store: Arc<dyn BaselineStore>,
}

impl Context {
    /// The baseline key to use: the command's `--baseline` flag if given,
    /// otherwise the configured default.
    pub fn baseline_key<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.unwrap_or(&self.config.baseline)
    }
}
