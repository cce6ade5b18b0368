//! Error types shared by every algorithm in the crate.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::graph::NodeId;

/// Algorithm phase in which an error surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Bulk node enumeration that builds the per-run registries.
    Seeding,
    /// Removal of degree-zero nodes as singleton components.
    Trim,
    /// A level of the parallel breadth-first search.
    Bfs,
    /// Sequential depth-first SCC discovery.
    Tarjan,
    /// Weak-component sweep driven by repeated BFS.
    WeakSweep,
    /// Forward color propagation of the Multistep algorithm.
    ForwardColoring,
    /// Backward search per color class of the Multistep algorithm.
    BackwardStep,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Seeding => "seeding",
            Phase::Trim => "trim",
            Phase::Bfs => "bfs",
            Phase::Tarjan => "tarjan",
            Phase::WeakSweep => "weak-sweep",
            Phase::ForwardColoring => "forward-coloring",
            Phase::BackwardStep => "backward-step",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by a component run.
///
/// None of these are retried internally: traversal side effects (visited and
/// color writes) are not idempotent, so the only safe recovery is to restart
/// the whole run on an unmodified graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// A node id was referenced that the graph store does not know.
    #[error("node {node} is not present in the graph store ({phase})")]
    DataIntegrity {
        /// The dangling node id.
        node: NodeId,
        /// Phase in which the reference was followed.
        phase: Phase,
    },

    /// Two different component ids were written for the same node.
    #[error(
        "node {node} already belongs to component {existing}, refusing {attempted} ({phase})"
    )]
    ConcurrencyViolation {
        /// The node written twice.
        node: NodeId,
        /// The component id that won the first write.
        existing: u64,
        /// The conflicting component id.
        attempted: u64,
        /// Phase in which the conflict was detected.
        phase: Phase,
    },

    /// A batch needed more units of work than the pool queue accepts.
    #[error("batch of {units} units exceeds pool queue capacity {capacity} ({phase})")]
    PoolExhaustion {
        /// Units the batch would have been split into.
        units: usize,
        /// Configured maximum units per batch.
        capacity: usize,
        /// Phase that submitted the batch.
        phase: Phase,
    },

    /// A unit of work panicked; the batch was discarded.
    #[error("worker panicked during {phase}: {message}")]
    WorkerPanic {
        /// Phase that submitted the batch.
        phase: Phase,
        /// Panic payload, when it was a string.
        message: String,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(String),

    /// Invalid or unparsable configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl ComponentError {
    /// The algorithm phase the error is attributed to, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            ComponentError::DataIntegrity { phase, .. }
            | ComponentError::ConcurrencyViolation { phase, .. }
            | ComponentError::PoolExhaustion { phase, .. }
            | ComponentError::WorkerPanic { phase, .. } => Some(*phase),
            ComponentError::PoolBuild(_) | ComponentError::Config(_) => None,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, ComponentError>;
