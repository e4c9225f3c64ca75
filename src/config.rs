//! Runtime configuration
//!
//! [`RuntimeConfig`] bundles the limits the runtime enforces. The binary
//! builds one from command-line flags; library users start from
//! [`RuntimeConfig::default`] and override fields as needed.

use crate::interpreter::constants::{
    DEFAULT_HEAP_LIMIT, DEFAULT_MAX_STEPS, DEFAULT_SNAPSHOT_LIMIT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Evaluation steps allowed across one `execute` call
    pub max_steps: usize,
    /// Live heap objects allowed
    pub heap_limit: usize,
    /// Estimated bytes of snapshot history allowed
    pub snapshot_limit: usize,
    /// Whether to capture snapshots at all
    pub record: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            max_steps: DEFAULT_MAX_STEPS,
            heap_limit: DEFAULT_HEAP_LIMIT,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
            record: true,
        }
    }
}

impl RuntimeConfig {
    /// Configuration without history recording, for batch runs and tests
    pub fn unrecorded() -> Self {
        RuntimeConfig {
            record: false,
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_heap_limit(mut self, heap_limit: usize) -> Self {
        self.heap_limit = heap_limit;
        self
    }

    pub fn with_snapshot_limit(mut self, snapshot_limit: usize) -> Self {
        self.snapshot_limit = snapshot_limit;
        self
    }
}
