//! The caller-facing entry point: pick an algorithm, get a component map.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::algo::{trim, weak_sweep, Filter, Multistep, ParallelBfs, RunStats, Tarjan, TrimMode};
use crate::concurrency::WorkerPool;
use crate::config::EngineConfig;
use crate::error::{Phase, Result};
use crate::graph::{Direction, GraphStore, NodeId};
use crate::registry::{ComponentId, RunState, Slot};

/// Which components to compute, and how.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Weakly connected components by repeated parallel BFS.
    Weak,
    /// Strongly connected components by sequential Tarjan.
    StrongSequential,
    /// Strongly connected components by parallel coloring (Multistep).
    StrongParallelColoring,
}

impl Algorithm {
    /// All variants, in the order benchmarks report them.
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Weak,
        Algorithm::StrongSequential,
        Algorithm::StrongParallelColoring,
    ];
}

/// Result of one [`Engine::run`].
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// Algorithm that produced the map.
    pub algorithm: Algorithm,
    /// Component of every node.
    pub components: HashMap<NodeId, ComponentId>,
    /// Wall-clock duration of the run, seeding included.
    pub elapsed: Duration,
    /// Per-phase counters.
    pub stats: RunStats,
}

impl RunReport {
    /// Component of `node`, if the node was part of the run.
    pub fn component_of(&self, node: NodeId) -> Option<ComponentId> {
        self.components.get(&node).copied()
    }

    /// Number of distinct components.
    pub fn component_count(&self) -> usize {
        self.components.values().collect::<HashSet<_>>().len()
    }

    /// Members of every component, keyed by component id, members ascending.
    pub fn components_by_id(&self) -> BTreeMap<ComponentId, Vec<NodeId>> {
        let mut by_id: BTreeMap<ComponentId, Vec<NodeId>> = BTreeMap::new();
        for (&node, &component) in &self.components {
            by_id.entry(component).or_default().push(node);
        }
        for members in by_id.values_mut() {
            members.sort_unstable();
        }
        by_id
    }

    /// The partition as sorted node sets, independent of component id values.
    ///
    /// Two runs found the same components iff their partitions are equal.
    pub fn partition(&self) -> Vec<Vec<NodeId>> {
        let mut sets: Vec<Vec<NodeId>> = self.components_by_id().into_values().collect();
        sets.sort_unstable();
        sets
    }

    /// Serializes the report as JSON for benchmark tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Runs component algorithms against one graph store on a reusable worker pool.
///
/// ```
/// use cc_engine::{Algorithm, Engine, EngineConfig, MemoryGraph};
///
/// // 1 -> 2 -> 3 -> 1, plus an isolated 4
/// let graph = MemoryGraph::from_edges([4], [(1, 2), (2, 3), (3, 1)]);
/// let engine = Engine::new(graph, EngineConfig::default().with_threads(2)).unwrap();
///
/// let report = engine.run(Algorithm::StrongParallelColoring).unwrap();
/// assert_eq!(report.partition(), vec![vec![1, 2, 3], vec![4]]);
/// ```
pub struct Engine<G> {
    graph: G,
    pool: WorkerPool,
    config: EngineConfig,
}

impl<G: GraphStore> Engine<G> {
    /// Validates `config` and builds the worker pool.
    pub fn new(graph: G, config: EngineConfig) -> Result<Self> {
        let pool = WorkerPool::new(&config)?;
        Ok(Self {
            graph,
            pool,
            config,
        })
    }

    /// The graph store.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes the components selected by `algorithm`.
    ///
    /// Registries are created fresh for the call and dropped before it
    /// returns; the graph is only read.
    pub fn run(&self, algorithm: Algorithm) -> Result<RunReport> {
        let span = tracing::info_span!("components", ?algorithm, threads = self.pool.threads());
        let _guard = span.enter();
        let started = Instant::now();

        let state = RunState::seed(&self.graph);
        let nodes = state.index.len();
        tracing::debug!(nodes, "registries seeded");

        let stats = match algorithm {
            Algorithm::Weak => {
                let trimmed = trim(&self.graph, &state, TrimMode::Weak)?;
                let bfs = ParallelBfs::new(&self.graph, &state.index, &self.pool)
                    .in_phase(Phase::WeakSweep);
                weak_sweep(&bfs, &state)?.merge(RunStats {
                    trimmed,
                    ..RunStats::default()
                })
            }
            Algorithm::StrongSequential => {
                let trimmed = trim(&self.graph, &state, TrimMode::Strong)?;
                Tarjan::new(&self.graph, &state).run()?.merge(RunStats {
                    trimmed,
                    ..RunStats::default()
                })
            }
            Algorithm::StrongParallelColoring => {
                let trimmed = trim(&self.graph, &state, TrimMode::Strong)?;
                Multistep::new(&self.graph, &state, &self.pool)
                    .run()?
                    .merge(RunStats {
                        trimmed,
                        ..RunStats::default()
                    })
            }
        };
        debug_assert!(state.working.is_empty(), "run ended with unfinalized nodes");

        let count = state.component_count();
        let components = state.into_components();
        let elapsed = started.elapsed();
        tracing::info!(nodes, components = count, ?elapsed, "run complete");

        Ok(RunReport {
            algorithm,
            components,
            elapsed,
            stats,
        })
    }

    /// Every node reachable from `sources` along `direction`, sources included.
    ///
    /// An unknown source id is a data-integrity error.
    pub fn reachable(&self, sources: &[NodeId], direction: Direction) -> Result<HashSet<NodeId>> {
        let state = RunState::seed(&self.graph);
        let slots = sources
            .iter()
            .map(|&id| state.index.resolve(id, Phase::Bfs))
            .collect::<Result<Vec<Slot>>>()?;
        let outcome = ParallelBfs::new(&self.graph, &state.index, &self.pool).run(
            &slots,
            direction,
            Filter::All,
        )?;
        tracing::debug!(
            sources = sources.len(),
            reached = outcome.reached.len(),
            levels = outcome.levels,
            "reachability done"
        );
        Ok(outcome
            .reached
            .into_iter()
            .map(|slot| state.index.id(slot))
            .collect())
    }
}
