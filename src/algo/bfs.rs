//! Level-synchronous parallel breadth-first search.
//!
//! Each level splits the frontier into batches on the [`WorkerPool`]. A unit
//! expands its slice of the frontier and keeps only neighbors that pass the
//! filter *and* that it wins the atomic visit for. Because the visit is a
//! single test-and-set, the concatenated unit results are already
//! deduplicated: a node reached along several paths in one level enters the
//! next frontier exactly once. The level barrier is the hand-off point.

use std::collections::HashSet;

use crate::concurrency::WorkerPool;
use crate::error::{ComponentError, Phase, Result};
use crate::graph::{Direction, GraphStore};
use crate::registry::{Color, ColorRegistry, NodeIndex, Slot, VisitedRegistry, WorkingSet};

/// A set of node slots a BFS can be restricted to (or away from).
pub trait Membership: Sync {
    /// Returns `true` if `slot` is a member.
    fn contains(&self, slot: Slot) -> bool;
}

impl Membership for WorkingSet {
    #[inline]
    fn contains(&self, slot: Slot) -> bool {
        WorkingSet::contains(self, slot)
    }
}

impl Membership for HashSet<Slot> {
    #[inline]
    fn contains(&self, slot: Slot) -> bool {
        HashSet::contains(self, &slot)
    }
}

/// Unfinalized nodes currently carrying one color.
pub struct ColorClass<'a> {
    /// Remaining nodes.
    pub working: &'a WorkingSet,
    /// Current colors.
    pub colors: &'a ColorRegistry,
    /// The class's color.
    pub color: Color,
}

impl Membership for ColorClass<'_> {
    #[inline]
    fn contains(&self, slot: Slot) -> bool {
        self.working.contains(slot) && self.colors.get(slot) == self.color
    }
}

/// Which neighbors an expansion keeps.
#[derive(Clone, Copy)]
pub enum Filter<'a> {
    /// Every neighbor.
    All,
    /// Only members of the set.
    Within(&'a dyn Membership),
    /// Only non-members of the set.
    Outside(&'a dyn Membership),
}

impl Filter<'_> {
    /// Returns `true` if `slot` passes the filter.
    #[inline(always)]
    pub fn admits(&self, slot: Slot) -> bool {
        match self {
            Filter::All => true,
            Filter::Within(set) => set.contains(slot),
            Filter::Outside(set) => !set.contains(slot),
        }
    }
}

/// Result of one BFS run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BfsOutcome {
    /// Every slot visited by this run, sources included, in discovery order.
    pub reached: Vec<Slot>,
    /// Number of expanded levels.
    pub levels: usize,
}

/// Parallel BFS over a [`GraphStore`], on slots of one run's [`NodeIndex`].
pub struct ParallelBfs<'a, G: ?Sized> {
    graph: &'a G,
    index: &'a NodeIndex,
    pool: &'a WorkerPool,
    phase: Phase,
}

impl<'a, G: GraphStore + ?Sized> ParallelBfs<'a, G> {
    /// Creates a BFS engine; errors are attributed to [`Phase::Bfs`].
    pub fn new(graph: &'a G, index: &'a NodeIndex, pool: &'a WorkerPool) -> Self {
        Self {
            graph,
            index,
            pool,
            phase: Phase::Bfs,
        }
    }

    /// Attributes errors to `phase` instead, for BFS runs nested in an algorithm.
    pub fn in_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Expands one slice of a frontier.
    ///
    /// Returns the neighbors that passed `filter` and were first visited by
    /// this call.
    pub fn expand(
        &self,
        frontier: &[Slot],
        direction: Direction,
        filter: Filter<'_>,
        visited: &VisitedRegistry,
    ) -> Result<Vec<Slot>> {
        let mut next = Vec::new();
        for &slot in frontier {
            let id = self.index.id(slot);
            let neighbors =
                self.graph
                    .neighbors(id, direction)
                    .ok_or(ComponentError::DataIntegrity {
                        node: id,
                        phase: self.phase,
                    })?;
            for neighbor in neighbors {
                let n = self.index.resolve(neighbor, self.phase)?;
                if filter.admits(n) && visited.try_visit(n) {
                    next.push(n);
                }
            }
        }
        Ok(next)
    }

    /// Runs the BFS against a caller-owned visited registry.
    ///
    /// Sources already marked in `visited` are skipped. Several runs may
    /// share one registry concurrently as long as their filters admit
    /// disjoint node sets.
    pub fn run_with(
        &self,
        sources: &[Slot],
        direction: Direction,
        filter: Filter<'_>,
        visited: &VisitedRegistry,
    ) -> Result<BfsOutcome> {
        let mut frontier: Vec<Slot> = sources
            .iter()
            .copied()
            .filter(|&s| visited.try_visit(s))
            .collect();
        let mut outcome = BfsOutcome {
            reached: frontier.clone(),
            levels: 0,
        };

        while !frontier.is_empty() {
            frontier = self.pool.run_batch_flat(self.phase, &frontier, |chunk| {
                self.expand(chunk, direction, filter, visited)
            })?;
            outcome.levels += 1;
            tracing::trace!(
                phase = %self.phase,
                level = outcome.levels,
                discovered = frontier.len(),
                "bfs level done"
            );
            outcome.reached.extend_from_slice(&frontier);
        }
        Ok(outcome)
    }

    /// Runs the BFS with a fresh visited registry.
    ///
    /// An empty `sources` returns an empty outcome without using the pool.
    pub fn run(&self, sources: &[Slot], direction: Direction, filter: Filter<'_>) -> Result<BfsOutcome> {
        if sources.is_empty() {
            return Ok(BfsOutcome::default());
        }
        let visited = VisitedRegistry::new(self.index.len());
        self.run_with(sources, direction, filter, &visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::graph::MemoryGraph;

    fn pool(threads: usize, batch: usize) -> WorkerPool {
        WorkerPool::new(
            &EngineConfig::default()
                .with_threads(threads)
                .with_batch_size(batch),
        )
        .unwrap()
    }

    fn ids(index: &NodeIndex, slots: &[Slot]) -> Vec<u64> {
        let mut v: Vec<u64> = slots.iter().map(|&s| index.id(s)).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn reaches_forward_and_backward() {
        // 0 -> 1 -> 2 ; 3 -> 2
        let g = MemoryGraph::from_adjacency(&[vec![1], vec![2], vec![], vec![2]]);
        let index = NodeIndex::from_ids(g.node_ids(), 4);
        let p = pool(2, 1);
        let bfs = ParallelBfs::new(&g, &index, &p);

        let out = bfs.run(&[0], Direction::Outgoing, Filter::All).unwrap();
        assert_eq!(ids(&index, &out.reached), vec![0, 1, 2]);
        assert_eq!(out.levels, 3);

        let back = bfs.run(&[2], Direction::Incoming, Filter::All).unwrap();
        assert_eq!(ids(&index, &back.reached), vec![0, 1, 2, 3]);

        let both = bfs.run(&[3], Direction::Both, Filter::All).unwrap();
        assert_eq!(both.reached.len(), 4);
    }

    #[test]
    fn diamond_is_deduplicated() {
        // 0 -> 1, 2 ; 1 -> 3 ; 2 -> 3
        let g = MemoryGraph::from_adjacency(&[vec![1, 2], vec![3], vec![3], vec![]]);
        let index = NodeIndex::from_ids(g.node_ids(), 4);
        let p = pool(4, 1);
        let out = ParallelBfs::new(&g, &index, &p)
            .run(&[0], Direction::Outgoing, Filter::All)
            .unwrap();
        assert_eq!(out.reached.len(), 4);
        assert_eq!(ids(&index, &out.reached), vec![0, 1, 2, 3]);
    }

    #[test]
    fn filters_restrict_expansion() {
        // 0 -> 1 -> 2 -> 3
        let g = MemoryGraph::from_adjacency(&[vec![1], vec![2], vec![3], vec![]]);
        let index = NodeIndex::from_ids(g.node_ids(), 4);
        let p = pool(2, 2);
        let bfs = ParallelBfs::new(&g, &index, &p);

        let keep: HashSet<Slot> = [0, 1, 3].into_iter().collect();
        let within = bfs
            .run(&[0], Direction::Outgoing, Filter::Within(&keep))
            .unwrap();
        assert_eq!(ids(&index, &within.reached), vec![0, 1]);

        let drop: HashSet<Slot> = [2].into_iter().collect();
        let outside = bfs
            .run(&[0], Direction::Outgoing, Filter::Outside(&drop))
            .unwrap();
        assert_eq!(ids(&index, &outside.reached), vec![0, 1]);
    }

    #[test]
    fn empty_sources_reach_nothing() {
        let g = MemoryGraph::from_adjacency(&[vec![0]]);
        let index = NodeIndex::from_ids(g.node_ids(), 1);
        let p = pool(1, 1);
        let out = ParallelBfs::new(&g, &index, &p)
            .run(&[], Direction::Both, Filter::All)
            .unwrap();
        assert_eq!(out, BfsOutcome::default());
    }

    #[test]
    fn premarked_sources_are_skipped() {
        let g = MemoryGraph::from_adjacency(&[vec![1], vec![]]);
        let index = NodeIndex::from_ids(g.node_ids(), 2);
        let p = pool(1, 1);
        let visited = VisitedRegistry::new(2);
        visited.try_visit(0);
        let out = ParallelBfs::new(&g, &index, &p)
            .run_with(&[0], Direction::Outgoing, Filter::All, &visited)
            .unwrap();
        assert!(out.reached.is_empty());
    }
}
