use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use proptest::prelude::*;
use spacedfs::collections::RankSelectBitvec;
use spacedfs::graph::{annotate_edges, biconnected_components, cut_vertices, update_edges, AdjacencyGraph, Graph};

fn oracle_graph(nodes: usize, edges: &[(usize, usize)], without: &[usize]) -> UnGraph<(), ()> {
    let mut graph = UnGraph::<(), ()>::with_capacity(nodes, edges.len());
    for _ in 0..nodes {
        graph.add_node(());
    }
    for &(a, b) in edges {
        if !without.contains(&a) && !without.contains(&b) {
            graph.add_edge(NodeIndex::new(a - 1), NodeIndex::new(b - 1), ());
        }
    }
    graph
}

/// Cut vertices by brute force: isolating a node splits its component.
fn oracle_cut_vertices(nodes: usize, edges: &[(usize, usize)], removed: &[usize]) -> Vec<usize> {
    let base = connected_components(&oracle_graph(nodes, edges, removed));
    (1..=nodes)
        .filter(|node| !removed.contains(node))
        .filter(|&node| {
            let mut without = removed.to_vec();
            without.push(node);
            connected_components(&oracle_graph(nodes, edges, &without)) > base + 1
        })
        .collect()
}

fn removal_set(nodes: usize, removed: &[usize]) -> RankSelectBitvec {
    let mut bits = RankSelectBitvec::new(nodes);
    for &node in removed {
        bits.set(node, true);
    }
    bits
}

fn ones(bits: &RankSelectBitvec) -> Vec<usize> {
    (1..=bits.len()).filter(|&pos| bits.get(pos)).collect()
}

fn random_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..40).prop_flat_map(|nodes| {
        let edges = proptest::collection::vec((1..=nodes, 1..=nodes), 0..(nodes * 2))
            .prop_map(|edges| edges.into_iter().filter(|(a, b)| a != b).collect::<Vec<_>>());
        (Just(nodes), edges)
    })
}

#[test]
fn test_scenario_one() {
    let edges = [(1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 3), (3, 5), (7, 8), (9, 1)];
    let graph = AdjacencyGraph::from_edges(9, &edges);
    let annotation = annotate_edges(&graph, None);
    assert_eq!(ones(&cut_vertices(&graph, &annotation, None)), vec![1, 2, 3]);
    assert_eq!(biconnected_components(&graph, &annotation, None).len(), 5);
    assert_eq!(connected_components(&oracle_graph(9, &edges, &[])), 2);
}

#[test]
fn test_scenario_three() {
    let edges = [
        (3, 6), (3, 2), (2, 15), (15, 13), (6, 12), (12, 13), (2, 1), (1, 14), (13, 16), (14, 16),
        (14, 10), (10, 8), (8, 9), (11, 8), (11, 9), (5, 4), (7, 4), (7, 5), (4, 6), (10, 6),
    ];
    let graph = AdjacencyGraph::from_edges(16, &edges);
    let annotation = annotate_edges(&graph, None);
    assert_eq!(ones(&cut_vertices(&graph, &annotation, None)), vec![4, 6, 8, 10]);
    assert_eq!(oracle_cut_vertices(16, &edges, &[]), vec![4, 6, 8, 10]);
}

#[test]
fn test_large_cycle_has_no_cut_vertex() {
    let nodes = 50_000;
    let mut edges: Vec<(usize, usize)> = (1..nodes).map(|node| (node, node + 1)).collect();
    edges.push((nodes, 1));
    let graph = AdjacencyGraph::from_edges(nodes, &edges);
    let annotation = annotate_edges(&graph, None);
    assert_eq!(cut_vertices(&graph, &annotation, None).ones(), 0);
    let blocks = biconnected_components(&graph, &annotation, None);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].len(), nodes);
}

#[test]
fn test_long_path_is_all_bridges() {
    let nodes = 20_000;
    let edges: Vec<(usize, usize)> = (1..nodes).map(|node| (node, node + 1)).collect();
    let graph = AdjacencyGraph::from_edges(nodes, &edges);
    let annotation = annotate_edges(&graph, None);
    assert_eq!(cut_vertices(&graph, &annotation, None).ones(), nodes - 2);
    assert_eq!(biconnected_components(&graph, &annotation, None).len(), nodes - 1);
}

proptest! {
    #[test]
    fn test_cut_vertices_match_brute_force((nodes, edges) in random_graph()) {
        let graph = AdjacencyGraph::from_edges(nodes, &edges);
        let annotation = annotate_edges(&graph, None);
        let cuts = cut_vertices(&graph, &annotation, None);
        prop_assert_eq!(ones(&cuts), oracle_cut_vertices(nodes, &edges, &[]));
    }

    #[test]
    fn test_blocks_partition_edges((nodes, edges) in random_graph()) {
        let graph = AdjacencyGraph::from_edges(nodes, &edges);
        let annotation = annotate_edges(&graph, None);
        let cuts = cut_vertices(&graph, &annotation, None);
        let blocks = biconnected_components(&graph, &annotation, None);

        for &(a, b) in &edges {
            let holders = blocks.iter().filter(|block| block.contains(&a) && block.contains(&b)).count();
            prop_assert_eq!(holders, 1, "edge {}-{}", a, b);
        }
        for node in 1..=nodes {
            let memberships = blocks.iter().filter(|block| block.contains(&node)).count();
            prop_assert_eq!(cuts.get(node), memberships >= 2, "node {}", node);
            prop_assert_eq!(memberships == 0, graph.degree(node) == 0, "node {}", node);
        }
    }

    #[test]
    fn test_removal_matches_brute_force(
        (nodes, edges) in random_graph(),
        picks in proptest::collection::vec(1usize..40, 0..5),
    ) {
        let mut removed: Vec<usize> = picks.into_iter().filter(|&node| node <= nodes).collect();
        removed.sort_unstable();
        removed.dedup();
        let gone = removal_set(nodes, &removed);
        let graph = AdjacencyGraph::from_edges(nodes, &edges);

        let mut annotation = annotate_edges(&graph, None);
        update_edges(&graph, &mut annotation, Some(&gone));
        let cuts = cut_vertices(&graph, &annotation, Some(&gone));
        prop_assert_eq!(ones(&cuts), oracle_cut_vertices(nodes, &edges, &removed));

        for block in biconnected_components(&graph, &annotation, Some(&gone)) {
            prop_assert!(block.len() >= 2);
            prop_assert!(block.iter().all(|node| !removed.contains(node)));
        }
    }
}
