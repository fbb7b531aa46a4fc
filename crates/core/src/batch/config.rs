//! Configuration for the batch module.

use serde::{Deserialize, Serialize};

/// Default number of conversions a batch runs at once.
pub const MAX_WORKERS: usize = 4;

/// Configuration for batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum parallel conversions.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_max_workers() -> usize {
    MAX_WORKERS
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
        }
    }
}

impl BatchConfig {
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Worker count actually used; never zero.
    pub fn worker_count(&self) -> usize {
        self.max_workers.max(1)
    }
}
