use cc_engine::{
    Algorithm, ComponentError, Direction, Engine, EngineConfig, GraphStore, MemoryGraph, NodeId,
    Phase,
};

/// Wraps a [`MemoryGraph`], hiding one node from enumeration and lookups
/// while edges still point at it.
struct Hidden {
    graph: MemoryGraph,
    hidden: NodeId,
}

impl GraphStore for Hidden {
    type Neighbors<'a> = <MemoryGraph as GraphStore>::Neighbors<'a>;
    type NodeIds<'a> = Box<dyn Iterator<Item = NodeId> + 'a>;

    fn neighbors(&self, node: NodeId, direction: Direction) -> Option<Self::Neighbors<'_>> {
        if node == self.hidden {
            return None;
        }
        self.graph.neighbors(node, direction)
    }

    fn degree(&self, node: NodeId, direction: Direction) -> Option<usize> {
        if node == self.hidden {
            return None;
        }
        self.graph.degree(node, direction)
    }

    fn node_ids(&self) -> Self::NodeIds<'_> {
        let hidden = self.hidden;
        Box::new(self.graph.node_ids().filter(move |&id| id != hidden))
    }
}

/// Panics whenever the neighbors of `poison` are requested.
struct Poisoned {
    graph: MemoryGraph,
    poison: NodeId,
}

impl GraphStore for Poisoned {
    type Neighbors<'a> = <MemoryGraph as GraphStore>::Neighbors<'a>;
    type NodeIds<'a> = <MemoryGraph as GraphStore>::NodeIds<'a>;

    fn neighbors(&self, node: NodeId, direction: Direction) -> Option<Self::Neighbors<'_>> {
        if node == self.poison {
            panic!("poisoned node {node}");
        }
        self.graph.neighbors(node, direction)
    }

    fn degree(&self, node: NodeId, direction: Direction) -> Option<usize> {
        self.graph.degree(node, direction)
    }

    fn node_ids(&self) -> Self::NodeIds<'_> {
        self.graph.node_ids()
    }
}

fn dangling() -> Hidden {
    // 1 <-> 2, 2 -> 99 where 99 is not stored
    Hidden {
        graph: MemoryGraph::from_edges([], [(1, 2), (2, 1), (2, 99)]),
        hidden: 99,
    }
}

#[test]
fn dangling_neighbor_is_a_data_integrity_error() {
    let engine = Engine::new(dangling(), EngineConfig::default().with_threads(2)).unwrap();
    let cases = [
        (Algorithm::Weak, Phase::WeakSweep),
        (Algorithm::StrongSequential, Phase::Tarjan),
        (Algorithm::StrongParallelColoring, Phase::ForwardColoring),
    ];
    for (algorithm, phase) in cases {
        let err = engine.run(algorithm).unwrap_err();
        assert_eq!(err, ComponentError::DataIntegrity { node: 99, phase }, "{algorithm:?}");
        assert_eq!(err.phase(), Some(phase));
    }
}

#[test]
fn unknown_reachability_source_is_rejected() {
    let engine = Engine::new(dangling(), EngineConfig::default().with_threads(1)).unwrap();
    let err = engine.reachable(&[1, 404], Direction::Outgoing).unwrap_err();
    assert_eq!(
        err,
        ComponentError::DataIntegrity {
            node: 404,
            phase: Phase::Bfs
        }
    );
}

#[test]
fn oversized_batch_is_refused() {
    let config = EngineConfig::default()
        .with_threads(2)
        .with_batch_size(1)
        .with_max_batch_units(1);

    // star 0 -> {1, 2, 3}: the second BFS level needs three units
    let star = MemoryGraph::from_edges([], [(0, 1), (0, 2), (0, 3)]);
    let engine = Engine::new(star, config.clone()).unwrap();
    let err = engine.run(Algorithm::Weak).unwrap_err();
    assert!(
        matches!(
            err,
            ComponentError::PoolExhaustion {
                units: 3,
                capacity: 1,
                phase: Phase::WeakSweep
            }
        ),
        "{err:?}"
    );

    // the first forward round covers both cycle nodes
    let cycle = MemoryGraph::from_edges([], [(0, 1), (1, 0)]);
    let engine = Engine::new(cycle, config).unwrap();
    let err = engine.run(Algorithm::StrongParallelColoring).unwrap_err();
    assert_eq!(err.phase(), Some(Phase::ForwardColoring));
    assert!(matches!(err, ComponentError::PoolExhaustion { units: 2, .. }));

    // Tarjan never submits batches
    assert!(engine.run(Algorithm::StrongSequential).is_ok());
}

#[test]
fn worker_panic_fails_the_run_and_leaves_the_pool_usable() {
    let graph = Poisoned {
        graph: MemoryGraph::from_edges([], [(1, 2), (2, 1)]),
        poison: 2,
    };
    let engine = Engine::new(graph, EngineConfig::default().with_threads(2)).unwrap();

    for _ in 0..2 {
        match engine.run(Algorithm::Weak).unwrap_err() {
            ComponentError::WorkerPanic { phase, message } => {
                assert_eq!(phase, Phase::WeakSweep);
                assert!(message.contains("poisoned node 2"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    let err = engine.run(Algorithm::StrongParallelColoring).unwrap_err();
    assert_eq!(err.phase(), Some(Phase::ForwardColoring));
}

#[test]
fn invalid_config_is_rejected_before_building_the_pool() {
    let err = Engine::new(MemoryGraph::default(), EngineConfig::default().with_threads(0))
        .err()
        .unwrap();
    assert!(matches!(err, ComponentError::Config(_)));
}
