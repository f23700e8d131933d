//! Graphs shared by the unit tests.

use crate::graph::AdjacencyGraph;

pub(crate) fn path(nodes: usize) -> AdjacencyGraph {
    let edges: Vec<(usize, usize)> = (1..nodes).map(|node| (node, node + 1)).collect();
    AdjacencyGraph::from_edges(nodes, &edges)
}

pub(crate) fn scenario_one() -> AdjacencyGraph {
    AdjacencyGraph::from_edges(
        9,
        &[(1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 3), (3, 5), (7, 8), (9, 1)],
    )
}

pub(crate) fn scenario_three() -> AdjacencyGraph {
    AdjacencyGraph::from_edges(
        16,
        &[
            (3, 6), (3, 2), (2, 15), (15, 13), (6, 12), (12, 13), (2, 1), (1, 14), (13, 16), (14, 16),
            (14, 10), (10, 8), (8, 9), (11, 8), (11, 9), (5, 4), (7, 4), (7, 5), (4, 6), (10, 6),
        ],
    )
}

/// Deterministic pseudo-random simple graph.
pub(crate) fn scrambled(nodes: usize, edges: usize, seed: u64) -> AdjacencyGraph {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };
    let mut list = Vec::new();
    while list.len() < edges {
        let a = next() % nodes + 1;
        let b = next() % nodes + 1;
        if a != b && !list.contains(&(a, b)) && !list.contains(&(b, a)) {
            list.push((a, b));
        }
    }
    AdjacencyGraph::from_edges(nodes, &list)
}

/// [`scenario_one`] plus node 10 joined to nodes 1 and 5.
pub(crate) fn scenario_one_bridged() -> AdjacencyGraph {
    AdjacencyGraph::from_edges(
        10,
        &[(1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 3), (3, 5), (7, 8), (9, 1), (10, 1), (10, 5)],
    )
}

pub(crate) fn removed(nodes: usize, set: &[usize]) -> crate::collections::RankSelectBitvec {
    let mut bits = crate::collections::RankSelectBitvec::new(nodes);
    for &node in set {
        bits.set(node, true);
    }
    bits.make_static();
    bits
}
