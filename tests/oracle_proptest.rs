use std::collections::HashMap;

use cc_engine::{Algorithm, Engine, EngineConfig, MemoryGraph, NodeId};
use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;
use petgraph::unionfind::UnionFind;
use proptest::prelude::*;

fn canonical(mut sets: Vec<Vec<NodeId>>) -> Vec<Vec<NodeId>> {
    for set in &mut sets {
        set.sort_unstable();
    }
    sets.sort_unstable();
    sets
}

fn strong_oracle(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<NodeId>> {
    let mut g = DiGraph::<(), ()>::new();
    let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();
    for &(u, v) in edges {
        g.add_edge(nodes[u], nodes[v], ());
    }
    canonical(
        kosaraju_scc(&g)
            .into_iter()
            .map(|scc| scc.into_iter().map(|ix| ix.index() as NodeId).collect())
            .collect(),
    )
}

fn weak_oracle(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<NodeId>> {
    let mut uf = UnionFind::<usize>::new(n);
    for &(u, v) in edges {
        uf.union(u, v);
    }
    let mut groups: HashMap<usize, Vec<NodeId>> = HashMap::new();
    for node in 0..n {
        groups.entry(uf.find(node)).or_default().push(node as NodeId);
    }
    canonical(groups.into_values().collect())
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..48).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..n * 3)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn matches_petgraph((n, edges) in graph_strategy(), threads in 1usize..5, batch in 1usize..8) {
        let graph = MemoryGraph::from_edges(
            (0..n).map(|i| i as NodeId),
            edges.iter().map(|&(u, v)| (u as NodeId, v as NodeId)),
        );
        let engine = Engine::new(
            graph,
            EngineConfig::default().with_threads(threads).with_batch_size(batch),
        ).unwrap();

        let strong = strong_oracle(n, &edges);
        let weak = weak_oracle(n, &edges);

        prop_assert_eq!(engine.run(Algorithm::Weak).unwrap().partition(), weak);
        prop_assert_eq!(engine.run(Algorithm::StrongSequential).unwrap().partition(), strong.clone());
        prop_assert_eq!(engine.run(Algorithm::StrongParallelColoring).unwrap().partition(), strong);
    }

    #[test]
    fn every_node_is_assigned_once((n, edges) in graph_strategy()) {
        let graph = MemoryGraph::from_edges(
            (0..n).map(|i| i as NodeId),
            edges.iter().map(|&(u, v)| (u as NodeId, v as NodeId)),
        );
        let engine = Engine::new(graph, EngineConfig::default().with_threads(3)).unwrap();
        for algorithm in Algorithm::ALL {
            let report = engine.run(algorithm).unwrap();
            prop_assert_eq!(report.components.len(), n);
            let members: usize = report.components_by_id().values().map(Vec::len).sum();
            prop_assert_eq!(members, n);
        }
    }
}
