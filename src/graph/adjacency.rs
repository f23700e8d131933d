//! A static adjacency-array graph with exact edge mates.

use core::fmt;

use crate::graph::Graph;

/// Why an edge list was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// Edge number `edge` (0-based in the input) names node `0`.
    NullNode {
        /// Offending edge.
        edge: usize,
    },
    /// A node id exceeds the declared node count.
    NodeOutOfRange {
        /// Offending node id.
        node: usize,
        /// Declared node count.
        nodes: usize,
    },
    /// An edge joins a node to itself.
    SelfLoop {
        /// The node.
        node: usize,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NullNode { edge } => write!(f, "edge #{edge} references node 0"),
            GraphError::NodeOutOfRange { node, nodes } => {
                write!(f, "node {node} out of range for a graph with {nodes} nodes")
            }
            GraphError::SelfLoop { node } => write!(f, "self loop on node {node}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// An undirected graph stored as compressed adjacency arrays.
///
/// Every undirected edge `{u, v}` appears once in the edge list of `u` and
/// once in that of `v`; each entry also records its mate, the position of
/// the opposite entry in the neighbour's list. Both entries are appended in
/// lockstep while building, so mates are exact.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | `from_edges` | \(O(n + m)\) | Two passes over the edge list |
/// | `degree` | \(O(1)\) | Offset difference |
/// | `head` / `mate` | \(O(1)\) | Direct index |
#[derive(Clone, Debug)]
pub struct AdjacencyGraph {
    offsets: Vec<usize>,
    heads: Vec<usize>,
    mates: Vec<usize>,
}

impl AdjacencyGraph {
    /// Builds a graph with nodes `1..=nodes` from undirected edges.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if an edge names node `0`, a node above
    /// `nodes`, or joins a node to itself.
    pub fn try_from_edges(nodes: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut degrees = vec![0usize; nodes];
        for (index, &(u, v)) in edges.iter().enumerate() {
            if u == 0 || v == 0 {
                return Err(GraphError::NullNode { edge: index });
            }
            if let Some(&node) = [u, v].iter().find(|&&node| node > nodes) {
                return Err(GraphError::NodeOutOfRange { node, nodes });
            }
            if u == v {
                return Err(GraphError::SelfLoop { node: u });
            }
            degrees[u - 1] += 1;
            degrees[v - 1] += 1;
        }

        let mut offsets = Vec::with_capacity(nodes + 1);
        offsets.push(0);
        let mut total = 0;
        for degree in &degrees {
            total += degree;
            offsets.push(total);
        }

        let mut cursor = offsets[..nodes].to_vec();
        let mut heads = vec![0; total];
        let mut mates = vec![0; total];
        for &(u, v) in edges {
            let at_u = cursor[u - 1];
            let at_v = cursor[v - 1];
            heads[at_u] = v;
            mates[at_u] = at_v - offsets[v - 1] + 1;
            heads[at_v] = u;
            mates[at_v] = at_u - offsets[u - 1] + 1;
            cursor[u - 1] += 1;
            cursor[v - 1] += 1;
        }

        Ok(Self { offsets, heads, mates })
    }

    /// Builds a graph from undirected edges.
    ///
    /// # Panics
    ///
    /// Panics if the edge list is invalid, see [`try_from_edges`](Self::try_from_edges).
    pub fn from_edges(nodes: usize, edges: &[(usize, usize)]) -> Self {
        match Self::try_from_edges(nodes, edges) {
            Ok(graph) => graph,
            Err(err) => panic!("invalid edge list: {err}"),
        }
    }

    /// Neighbours of `node` in edge order; empty for invalid nodes.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        match self.range(node) {
            Some((start, end)) => &self.heads[start..end],
            None => &[],
        }
    }

    #[inline]
    fn range(&self, node: usize) -> Option<(usize, usize)> {
        if node == 0 || node >= self.offsets.len() {
            return None;
        }
        Some((self.offsets[node - 1], self.offsets[node]))
    }

    #[inline]
    fn slot(&self, node: usize, edge: usize) -> Option<usize> {
        let (start, end) = self.range(node)?;
        (edge != 0 && edge <= end - start).then(|| start + edge - 1)
    }
}

impl Graph for AdjacencyGraph {
    #[inline]
    fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    fn degree(&self, node: usize) -> usize {
        self.range(node).map_or(0, |(start, end)| end - start)
    }

    #[inline]
    fn head(&self, node: usize, edge: usize) -> usize {
        self.slot(node, edge).map_or(0, |slot| self.heads[slot])
    }

    #[inline]
    fn mate(&self, node: usize, edge: usize) -> (usize, usize) {
        self.slot(node, edge)
            .map_or((0, 0), |slot| (self.heads[slot], self.mates[slot]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mates_are_exact() {
        let graph = AdjacencyGraph::from_edges(4, &[(1, 2), (2, 3), (3, 1), (1, 4), (1, 2)]);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.degree(1), 4);
        assert_eq!(graph.neighbors(1), &[2, 3, 4, 2]);
        for node in 1..=4 {
            for edge in 1..=graph.degree(node) {
                let (next, back) = graph.mate(node, edge);
                assert_eq!(graph.head(node, edge), next);
                assert_eq!(graph.mate(next, back), (node, edge));
            }
        }
        assert_eq!(graph.mate(1, 4), (2, 3));
    }

    #[test]
    fn test_invalid_lookups_return_sentinels() {
        let graph = AdjacencyGraph::from_edges(3, &[(1, 2)]);
        assert_eq!(graph.degree(0), 0);
        assert_eq!(graph.degree(3), 0);
        assert_eq!(graph.degree(4), 0);
        assert_eq!(graph.head(1, 2), 0);
        assert_eq!(graph.head(1, 0), 0);
        assert_eq!(graph.mate(9, 1), (0, 0));
        assert!(graph.neighbors(7).is_empty());
        assert_eq!(graph.degrees().collect::<Vec<_>>(), vec![1, 1, 0]);
    }

    #[test]
    fn test_rejects_bad_edges() {
        assert_eq!(
            AdjacencyGraph::try_from_edges(3, &[(1, 2), (0, 1)]).unwrap_err(),
            GraphError::NullNode { edge: 1 }
        );
        assert_eq!(
            AdjacencyGraph::try_from_edges(3, &[(1, 4)]).unwrap_err(),
            GraphError::NodeOutOfRange { node: 4, nodes: 3 }
        );
        assert_eq!(
            AdjacencyGraph::try_from_edges(3, &[(2, 2)]).unwrap_err(),
            GraphError::SelfLoop { node: 2 }
        );
    }

    #[test]
    #[should_panic(expected = "self loop")]
    fn test_from_edges_panics() {
        let _ = AdjacencyGraph::from_edges(2, &[(1, 1)]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = AdjacencyGraph::from_edges(0, &[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.degree(1), 0);
    }
}
