//! Concurrency building blocks for the component engines.
//!
//! - `atomic`: lock-free per-key primitives backing the node-state registries.
//! - `pool`: the batch/barrier execution model every parallel phase goes through.

pub mod atomic;
pub mod pool;

pub use pool::{Batch, WorkerPool};
