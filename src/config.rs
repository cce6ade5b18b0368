//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ComponentError, Result};

/// Default number of nodes (or colors) handed to one unit of work.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Default upper bound on units submitted in a single batch.
pub const DEFAULT_MAX_BATCH_UNITS: usize = 1 << 16;

/// Tunables for the worker pool and batch decomposition.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use cc_engine::EngineConfig;
///
/// let cfg = EngineConfig::from_json(r#"{ "threads": 2 }"#).unwrap();
/// assert_eq!(cfg.threads, 2);
/// assert_eq!(cfg.batch_size, cc_engine::config::DEFAULT_BATCH_SIZE);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads in the pool. Fixed for the lifetime of an engine.
    pub threads: usize,
    /// Nodes (or colors) per unit of work.
    pub batch_size: usize,
    /// Maximum units a single batch may be split into.
    pub max_batch_units: usize,
    /// Prefix for worker thread names.
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            threads,
            batch_size: DEFAULT_BATCH_SIZE,
            max_batch_units: DEFAULT_MAX_BATCH_UNITS,
            thread_name: "cc-worker".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json(input: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| ComponentError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Sets the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the number of items per unit of work.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the maximum units per batch.
    pub fn with_max_batch_units(mut self, max_batch_units: usize) -> Self {
        self.max_batch_units = max_batch_units;
        self
    }

    /// Rejects zero-sized pools, batches and queues.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ComponentError::Config("threads must be > 0".into()));
        }
        if self.batch_size == 0 {
            return Err(ComponentError::Config("batch_size must be > 0".into()));
        }
        if self.max_batch_units == 0 {
            return Err(ComponentError::Config("max_batch_units must be > 0".into()));
        }
        Ok(())
    }
}
