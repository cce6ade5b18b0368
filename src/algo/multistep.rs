//! Parallel strongly connected components by coloring (Multistep).
//!
//! Each outer round has two parallel phases:
//!
//! 1. **Forward coloring.** Every node starts with its own id as color. Units
//!    push their node's color along outgoing edges inside the working set with
//!    an atomic `fetch_max`; a node whose color grew this round is queued for
//!    the next one. Larger colors win. At the fixpoint, every node carries the
//!    largest id among the nodes that reach it.
//! 2. **Backward step.** For each distinct color `c`, a BFS along incoming
//!    edges from `c`'s origin (the node with id `c`), restricted to the nodes
//!    colored `c`, collects exactly the nodes that both reach and are reached
//!    by the origin: one SCC, finalized under a fresh id.
//!
//! Color classes are disjoint, so all backward searches of a step share one
//! visited registry without interfering.

use super::bfs::{ColorClass, Filter, Membership, ParallelBfs};
use super::RunStats;
use crate::concurrency::WorkerPool;
use crate::error::{ComponentError, Phase, Result};
use crate::graph::{Direction, GraphStore};
use crate::registry::{Color, ColorRegistry, RunState, Slot, VisitedRegistry};

/// Coloring SCC over the nodes left in a run's working set.
pub struct Multistep<'a, G: ?Sized> {
    graph: &'a G,
    state: &'a RunState,
    pool: &'a WorkerPool,
    colors: ColorRegistry,
    visited: VisitedRegistry,
}

impl<'a, G: GraphStore + ?Sized> Multistep<'a, G> {
    /// Colors every seeded node with its own id.
    pub fn new(graph: &'a G, state: &'a RunState, pool: &'a WorkerPool) -> Self {
        Self {
            graph,
            state,
            pool,
            colors: ColorRegistry::new(&state.index),
            visited: VisitedRegistry::new(state.index.len()),
        }
    }

    /// Runs forward and backward rounds until the working set is empty.
    pub fn run(self) -> Result<RunStats> {
        let mut stats = RunStats::default();
        while !self.state.working.is_empty() {
            stats.outer_rounds += 1;
            stats.forward_rounds += self.forward()?;
            let classes = self.color_classes();
            tracing::debug!(
                round = stats.outer_rounds,
                remaining = self.state.working.len(),
                classes = classes.len(),
                "forward coloring converged"
            );
            stats.bfs_levels += self.backward(&classes)?;
            self.reset_orphans();
        }
        Ok(stats)
    }

    /// Propagates colors to the fixpoint. Returns the number of rounds.
    fn forward(&self) -> Result<usize> {
        let mut changed = self.state.working.snapshot();
        let mut rounds = 0;
        while !changed.is_empty() {
            self.visited.clear();
            changed = self
                .pool
                .run_batch_flat(Phase::ForwardColoring, &changed, |chunk| self.color_unit(chunk))?;
            rounds += 1;
            tracing::trace!(round = rounds, changed = changed.len(), "coloring round");
        }
        Ok(rounds)
    }

    /// One unit of forward coloring over `chunk`.
    ///
    /// Returns the nodes this unit is responsible for revisiting next round:
    /// every neighbor it raised and won the visit for, plus the parent itself
    /// when it raised anything.
    fn color_unit(&self, chunk: &[Slot]) -> Result<Vec<Slot>> {
        let working = &self.state.working;
        let index = &self.state.index;
        let mut changed = Vec::new();

        for &parent in chunk {
            let id = index.id(parent);
            let color = self.colors.get(parent);
            let neighbors =
                self.graph
                    .neighbors(id, Direction::Outgoing)
                    .ok_or(ComponentError::DataIntegrity {
                        node: id,
                        phase: Phase::ForwardColoring,
                    })?;

            let mut raised_any = false;
            for neighbor in neighbors {
                let u = index.resolve(neighbor, Phase::ForwardColoring)?;
                if !working.contains(u) || !self.colors.raise(u, color) {
                    continue;
                }
                raised_any = true;
                if self.visited.try_visit(u) {
                    changed.push(u);
                }
            }
            if raised_any && self.visited.try_visit(parent) {
                changed.push(parent);
            }
        }
        Ok(changed)
    }

    /// Distinct colors among the remaining nodes, ascending.
    fn color_classes(&self) -> Vec<Color> {
        let mut classes: Vec<Color> = self
            .state
            .working
            .snapshot()
            .into_iter()
            .map(|slot| self.colors.get(slot))
            .collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Finalizes one SCC per color class. Returns the BFS levels expanded.
    fn backward(&self, classes: &[Color]) -> Result<usize> {
        self.visited.clear();
        let bfs = ParallelBfs::new(self.graph, &self.state.index, self.pool)
            .in_phase(Phase::BackwardStep);

        let levels = self.pool.run_batch(Phase::BackwardStep, classes, |chunk| {
            let mut levels = 0;
            for &color in chunk {
                let origin = self.state.index.resolve(color, Phase::BackwardStep)?;
                let class = ColorClass {
                    working: &self.state.working,
                    colors: &self.colors,
                    color,
                };
                debug_assert!(
                    class.contains(origin),
                    "origin of color {color} left its class"
                );
                let outcome =
                    bfs.run_with(&[origin], Direction::Incoming, Filter::Within(&class), &self.visited)?;
                let component = self.state.ids.fresh();
                self.state
                    .finalize(&outcome.reached, component, Phase::BackwardStep)?;
                levels += outcome.levels;
            }
            Ok(levels)
        })?;
        Ok(levels.into_iter().sum())
    }

    /// Gives nodes whose color origin was finalized their own id back.
    ///
    /// Such nodes are reachable from a finished SCC but cannot reach it; the
    /// color they carry no longer has an origin to search backward from.
    fn reset_orphans(&self) {
        let working = &self.state.working;
        let index = &self.state.index;
        let orphans: Vec<Slot> = working
            .snapshot()
            .into_iter()
            .filter(|&slot| {
                let color = self.colors.get(slot);
                !index
                    .slot(color)
                    .is_some_and(|o| working.contains(o) && self.colors.get(o) == color)
            })
            .collect();
        for &slot in &orphans {
            self.colors.reset(slot, index.id(slot));
        }
        tracing::trace!(reset = orphans.len(), "orphaned colors reset");
    }
}
