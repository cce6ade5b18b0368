use cc_engine::{Algorithm, Engine, EngineConfig, MemoryGraph, NodeId};

fn engine(graph: MemoryGraph, threads: usize) -> Engine<MemoryGraph> {
    Engine::new(
        graph,
        EngineConfig::default().with_threads(threads).with_batch_size(2),
    )
    .unwrap()
}

fn partition(engine: &Engine<MemoryGraph>, algorithm: Algorithm) -> Vec<Vec<NodeId>> {
    engine.run(algorithm).unwrap().partition()
}

const A: NodeId = 10;
const B: NodeId = 11;
const C: NodeId = 12;
const D: NodeId = 13;

#[test]
fn three_cycle_plus_isolated_node() {
    let e = engine(MemoryGraph::from_edges([D], [(A, B), (B, C), (C, A)]), 3);
    let expected = vec![vec![A, B, C], vec![D]];
    for algorithm in Algorithm::ALL {
        assert_eq!(partition(&e, algorithm), expected, "{algorithm:?}");
    }
}

#[test]
fn converging_edges_without_cycle() {
    let e = engine(MemoryGraph::from_edges([], [(A, B), (C, B)]), 2);
    assert_eq!(partition(&e, Algorithm::Weak), vec![vec![A, B, C]]);
    let singletons = vec![vec![A], vec![B], vec![C]];
    assert_eq!(partition(&e, Algorithm::StrongSequential), singletons);
    assert_eq!(partition(&e, Algorithm::StrongParallelColoring), singletons);
}

#[test]
fn empty_graph_yields_empty_map() {
    let e = engine(MemoryGraph::default(), 2);
    for algorithm in Algorithm::ALL {
        let report = e.run(algorithm).unwrap();
        assert!(report.components.is_empty());
        assert_eq!(report.component_count(), 0);
    }
}

#[test]
fn single_node_is_its_own_component() {
    let e = engine(MemoryGraph::from_edges([42], []), 1);
    for algorithm in Algorithm::ALL {
        let report = e.run(algorithm).unwrap();
        assert_eq!(report.components.len(), 1);
        assert!(report.component_of(42).is_some());
        assert_eq!(report.stats.trimmed, 1);
    }
}

#[test]
fn self_loop_is_a_singleton_scc() {
    let e = engine(MemoryGraph::from_edges([], [(1, 1), (1, 2), (2, 3), (3, 2)]), 2);
    let expected = vec![vec![1], vec![2, 3]];
    assert_eq!(partition(&e, Algorithm::StrongSequential), expected);
    assert_eq!(partition(&e, Algorithm::StrongParallelColoring), expected);
    assert_eq!(partition(&e, Algorithm::Weak), vec![vec![1, 2, 3]]);
}

#[test]
fn complete_graph_is_one_component() {
    let n = 40u64;
    let edges: Vec<(NodeId, NodeId)> = (0..n)
        .flat_map(|u| (0..n).filter(move |&v| v != u).map(move |v| (u, v)))
        .collect();
    let e = engine(MemoryGraph::from_edges([], edges), 4);
    let all: Vec<NodeId> = (0..n).collect();
    for algorithm in Algorithm::ALL {
        let report = e.run(algorithm).unwrap();
        assert_eq!(report.partition(), vec![all.clone()], "{algorithm:?}");
        assert_eq!(report.stats.trimmed, 0);
    }
}

#[test]
fn dag_chain_splits_into_singletons() {
    // 0 -> 1 -> ... -> 99; the strong trim only peels the ends, the rest is traversal
    let edges: Vec<(NodeId, NodeId)> = (0..99).map(|i| (i, i + 1)).collect();
    let e = engine(MemoryGraph::from_edges([], edges), 4);
    for algorithm in [Algorithm::StrongSequential, Algorithm::StrongParallelColoring] {
        let report = e.run(algorithm).unwrap();
        assert_eq!(report.component_count(), 100, "{algorithm:?}");
    }
    assert_eq!(e.run(Algorithm::Weak).unwrap().component_count(), 1);
}

#[test]
fn repeated_runs_give_the_same_partition() {
    let e = engine(
        MemoryGraph::from_edges([99], [(1, 2), (2, 1), (2, 3), (3, 4), (4, 3), (5, 4)]),
        4,
    );
    for algorithm in Algorithm::ALL {
        let first = partition(&e, algorithm);
        for _ in 0..5 {
            assert_eq!(partition(&e, algorithm), first, "{algorithm:?}");
        }
    }
}

#[test]
fn component_ids_are_dense_from_zero() {
    let e = engine(MemoryGraph::from_edges([7, 8], [(1, 2), (2, 1)]), 2);
    let report = e.run(Algorithm::StrongParallelColoring).unwrap();
    let ids: Vec<u64> = report.components_by_id().into_keys().collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn report_serializes_to_json() -> anyhow::Result<()> {
    let e = engine(MemoryGraph::from_edges([], [(1, 2), (2, 1)]), 1);
    let report = e.run(Algorithm::StrongSequential)?;
    let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
    assert_eq!(value["algorithm"], "StrongSequential");
    assert_eq!(value["components"].as_object().map(|m| m.len()), Some(2));
    assert_eq!(value["stats"]["trimmed"], 0);
    Ok(())
}
