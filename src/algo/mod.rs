//! Component discovery algorithms.
//!
//! - `bfs`: level-synchronous parallel BFS, reused by the others
//! - `trim`: singleton removal for degree-zero nodes
//! - `tarjan`: sequential SCC, plus the weak-component sweep
//! - `multistep`: parallel SCC by forward coloring and backward search

pub mod bfs;
pub mod multistep;
pub mod tarjan;
pub mod trim;

pub use bfs::{BfsOutcome, ColorClass, Filter, Membership, ParallelBfs};
pub use multistep::Multistep;
pub use tarjan::{weak_sweep, Tarjan, TarjanInfo};
pub use trim::{trim, TrimMode};

use serde::Serialize;

/// Counters collected during one run, for comparing algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Nodes finalized by the trim pass.
    pub trimmed: usize,
    /// BFS levels expanded (weak sweeps and backward steps).
    pub bfs_levels: usize,
    /// BFS runs started by the weak sweep.
    pub sweeps: usize,
    /// DFS roots started by Tarjan.
    pub dfs_roots: usize,
    /// Forward coloring rounds, summed over outer rounds.
    pub forward_rounds: usize,
    /// Forward + backward rounds of Multistep.
    pub outer_rounds: usize,
}

impl RunStats {
    /// Field-wise sum.
    pub fn merge(self, other: RunStats) -> RunStats {
        RunStats {
            trimmed: self.trimmed + other.trimmed,
            bfs_levels: self.bfs_levels + other.bfs_levels,
            sweeps: self.sweeps + other.sweeps,
            dfs_roots: self.dfs_roots + other.dfs_roots,
            forward_rounds: self.forward_rounds + other.forward_rounds,
            outer_rounds: self.outer_rounds + other.outer_rounds,
        }
    }
}
