//! Sequential strongly connected components (Tarjan), and the weak sweep.
//!
//! The DFS is iterative: each open node is a [`Frame`] holding its resolved
//! out-neighbors and a cursor, so graph size never translates into call-stack
//! depth. `dfs_index` / `lowlink` follow the classic recursive formulation
//! exactly:
//!
//! - on first visit, `dfs_index = lowlink = counter++`, push on the SCC
//!   stack, leave the working set;
//! - a neighbor still in the working set is descended into, and on return
//!   `lowlink = min(lowlink, child.lowlink)`;
//! - a neighbor still on the SCC stack gives `lowlink = min(lowlink, neighbor.dfs_index)`;
//! - once all neighbors are done and `lowlink == dfs_index`, the stack is
//!   popped down to the node and the popped nodes form one component.

use super::bfs::{Filter, ParallelBfs};
use super::RunStats;
use crate::error::{ComponentError, Phase, Result};
use crate::graph::{Direction, GraphStore};
use crate::registry::{RunState, Slot, VisitedRegistry};

/// DFS bookkeeping of one node. Touched only by the traversal thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TarjanInfo {
    /// Visit order.
    pub dfs_index: usize,
    /// Smallest `dfs_index` reachable through the DFS subtree and one back edge.
    pub lowlink: usize,
    /// Whether the node sits on the SCC stack.
    pub on_stack: bool,
}

struct Frame {
    slot: Slot,
    neighbors: Vec<Slot>,
    next: usize,
}

/// Single-threaded Tarjan SCC over the nodes left in a run's working set.
pub struct Tarjan<'a, G: ?Sized> {
    graph: &'a G,
    state: &'a RunState,
    info: Vec<TarjanInfo>,
    stack: Vec<Slot>,
    counter: usize,
}

impl<'a, G: GraphStore + ?Sized> Tarjan<'a, G> {
    /// Prepares per-node metadata for every seeded node.
    pub fn new(graph: &'a G, state: &'a RunState) -> Self {
        Self {
            graph,
            state,
            info: vec![TarjanInfo::default(); state.index.len()],
            stack: Vec::new(),
            counter: 0,
        }
    }

    /// Finalizes every remaining node into its strongly connected component.
    pub fn run(mut self) -> Result<RunStats> {
        let mut stats = RunStats::default();
        let mut cursor = 0;
        while let Some(root) = self.state.working.next_from(cursor) {
            cursor = root;
            self.visit(root)?;
            stats.dfs_roots += 1;
        }
        tracing::debug!(roots = stats.dfs_roots, visited = self.counter, "tarjan done");
        Ok(stats)
    }

    fn open(&mut self, slot: Slot) -> Result<Frame> {
        let info = &mut self.info[slot];
        info.dfs_index = self.counter;
        info.lowlink = self.counter;
        info.on_stack = true;
        self.counter += 1;
        self.stack.push(slot);
        self.state.working.remove(slot);

        let id = self.state.index.id(slot);
        let neighbors = self
            .graph
            .neighbors(id, Direction::Outgoing)
            .ok_or(ComponentError::DataIntegrity {
                node: id,
                phase: Phase::Tarjan,
            })?
            .map(|n| self.state.index.resolve(n, Phase::Tarjan))
            .collect::<Result<Vec<Slot>>>()?;
        Ok(Frame {
            slot,
            neighbors,
            next: 0,
        })
    }

    fn visit(&mut self, root: Slot) -> Result<()> {
        let mut frames = vec![self.open(root)?];

        while let Some(frame) = frames.last_mut() {
            let v = frame.slot;
            if let Some(&w) = frame.neighbors.get(frame.next) {
                frame.next += 1;
                if self.state.working.contains(w) {
                    let child = self.open(w)?;
                    frames.push(child);
                } else if self.info[w].on_stack {
                    self.info[v].lowlink = self.info[v].lowlink.min(self.info[w].dfs_index);
                }
                continue;
            }

            frames.pop();
            if self.info[v].lowlink == self.info[v].dfs_index {
                self.emit(v)?;
            }
            if let Some(parent) = frames.last() {
                let p = parent.slot;
                self.info[p].lowlink = self.info[p].lowlink.min(self.info[v].lowlink);
            }
        }
        Ok(())
    }

    fn emit(&mut self, root: Slot) -> Result<()> {
        let mut members = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.info[w].on_stack = false;
            members.push(w);
            if w == root {
                break;
            }
        }
        let component = self.state.ids.fresh();
        self.state.finalize(&members, component, Phase::Tarjan)
    }
}

/// Finalizes weakly connected components by repeated BFS over `Both` directions.
///
/// Every sweep starts at the first remaining node and finalizes the whole
/// reachable set. One visited registry serves all sweeps: components are
/// disjoint, so a node is never reached by two of them.
pub fn weak_sweep<G: GraphStore + ?Sized>(bfs: &ParallelBfs<'_, G>, state: &RunState) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let visited = VisitedRegistry::new(state.index.len());
    let mut cursor = 0;
    while let Some(root) = state.working.next_from(cursor) {
        cursor = root;
        let outcome = bfs.run_with(
            &[root],
            Direction::Both,
            Filter::Within(&state.working),
            &visited,
        )?;
        let component = state.ids.fresh();
        state.finalize(&outcome.reached, component, Phase::WeakSweep)?;
        stats.bfs_levels += outcome.levels;
        stats.sweeps += 1;
    }
    tracing::debug!(sweeps = stats.sweeps, levels = stats.bfs_levels, "weak sweep done");
    Ok(stats)
}
