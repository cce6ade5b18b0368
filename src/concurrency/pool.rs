//! Batch execution on a bounded worker pool.
//!
//! A batch is an array split into consecutive `[start, end)` ranges. Each range
//! is one transient unit of work; the call returns only once every unit has
//! finished (the completion barrier), handing back the per-unit results in
//! range order. Units never see each other's partial results: merging is left
//! to the caller, after the barrier.
//!
//! The pool itself is built once and reused for every batch of every run.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::{ComponentError, Phase, Result};

/// A half-open range `[start, end)` into a batch's item array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Batch {
    /// First index of the unit.
    pub start: usize,
    /// One past the last index of the unit.
    pub end: usize,
}

impl Batch {
    /// Number of items covered by the unit.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the unit covers no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits `len` items into ranges of at most `batch_size` items.
///
/// # Panics
/// Panics if `batch_size == 0`.
pub fn split_ranges(len: usize, batch_size: usize) -> Vec<Batch> {
    assert!(batch_size != 0, "batch_size must be > 0");
    (0..len)
        .step_by(batch_size)
        .map(|start| Batch {
            start,
            end: (start + batch_size).min(len),
        })
        .collect()
}

/// Fixed-size pool running batches of transient units.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    batch_size: usize,
    max_batch_units: usize,
}

impl WorkerPool {
    /// Builds the pool described by `config`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let prefix = config.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| ComponentError::PoolBuild(e.to_string()))?;
        tracing::debug!(threads = config.threads, "worker pool ready");
        Ok(Self {
            pool,
            batch_size: config.batch_size,
            max_batch_units: config.max_batch_units,
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Items handed to one unit of work.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Runs `unit` over every `batch_size` slice of `items` and waits for all of them.
    ///
    /// An empty `items` returns immediately without touching the pool. If any
    /// unit returns an error or panics, the whole batch fails and the results
    /// of the other units are dropped.
    pub fn run_batch<T, R, F>(&self, phase: Phase, items: &[T], unit: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&[T]) -> Result<R> + Sync,
    {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let ranges = split_ranges(items.len(), self.batch_size);
        if ranges.len() > self.max_batch_units {
            return Err(ComponentError::PoolExhaustion {
                units: ranges.len(),
                capacity: self.max_batch_units,
                phase,
            });
        }
        tracing::trace!(%phase, units = ranges.len(), items = items.len(), "submitting batch");

        let unit = &unit;
        self.pool.install(|| {
            ranges
                .par_iter()
                .map(|b| run_unit(phase, || unit(&items[b.start..b.end])))
                .collect::<Result<Vec<R>>>()
        })
    }

    /// Like [`run_batch`](Self::run_batch), concatenating the per-unit vectors.
    pub fn run_batch_flat<T, R, F>(&self, phase: Phase, items: &[T], unit: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&[T]) -> Result<Vec<R>> + Sync,
    {
        let parts = self.run_batch(phase, items, unit)?;
        let total = parts.iter().map(Vec::len).sum();
        let mut merged = Vec::with_capacity(total);
        for part in parts {
            merged.extend(part);
        }
        Ok(merged)
    }
}

fn run_unit<R>(phase: Phase, f: impl FnOnce() -> Result<R>) -> Result<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_owned());
            tracing::error!(%phase, %message, "unit of work panicked");
            Err(ComponentError::WorkerPanic { phase, message })
        }
    }
}
