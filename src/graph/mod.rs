//! Static undirected graphs, space-bounded depth-first search, and the
//! edge annotation used to find cut vertices and biconnected components.
//!
//! Nodes are numbered `1..=node_count()`, the edges of a node `1..=degree`.
//! `0` is the "none" sentinel for both.

pub mod adjacency;
pub mod algorithms;
pub mod annotation;
pub mod dfs;

#[cfg(test)]
pub(crate) mod fixtures;

pub use adjacency::{AdjacencyGraph, GraphError};
pub use algorithms::{biconnected_components, biconnected_components_with, cut_vertices};
pub use annotation::{annotate_edges, update_edges, EdgeAnnotation, EdgeFields, EdgeMark};
pub use dfs::{
    dfs, dfs_with_options, dfs_with_parents, Color, DfsHooks, DfsOptions, DfsStats, DfsVisitor, ParentEdges,
};

/// Read-only access to a static undirected graph.
///
/// Every undirected edge is seen from both endpoints; [`mate`](Self::mate)
/// links the two views.
pub trait Graph {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges of `node`; `0` for invalid nodes.
    fn degree(&self, node: usize) -> usize;

    /// Neighbour reached through edge `edge` of `node`; `0` if invalid.
    fn head(&self, node: usize, edge: usize) -> usize {
        self.mate(node, edge).0
    }

    /// The opposite view of edge `edge` of `node`: the neighbour and the
    /// index of the same edge in the neighbour's list. `(0, 0)` if invalid.
    fn mate(&self, node: usize, edge: usize) -> (usize, usize);

    /// Degrees of nodes `1..=node_count()` in order.
    fn degrees(&self) -> Degrees<'_, Self> {
        Degrees {
            graph: self,
            next: 1,
            end: self.node_count(),
        }
    }

    /// Total number of directed edge views, twice the undirected edge count.
    fn edge_slots(&self) -> usize {
        self.degrees().sum()
    }
}

/// Iterator over node degrees, see [`Graph::degrees`].
pub struct Degrees<'a, G: ?Sized> {
    graph: &'a G,
    next: usize,
    end: usize,
}

impl<G: ?Sized> Clone for Degrees<'_, G> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            next: self.next,
            end: self.end,
        }
    }
}

impl<G: Graph + ?Sized> Iterator for Degrees<'_, G> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next > self.end {
            return None;
        }
        let degree = self.graph.degree(self.next);
        self.next += 1;
        Some(degree)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<G: Graph + ?Sized> ExactSizeIterator for Degrees<'_, G> {}
