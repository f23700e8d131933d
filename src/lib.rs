//! # `spacedfs` - Succinct structures and space-bounded depth-first search
//!
//! Compact building blocks for running depth-first search over graphs with
//! millions of nodes, and two algorithms built on top of it: cut vertices
//! and biconnected components.
//!
//! ## Layers
//!
//! 1. **Zeroed storage** ([`alloc`]): page-backed regions that read as zero
//!    until written, so allocating a structure does not touch its memory.
//! 2. **Succinct containers** ([`collections`]):
//!    - [`RankSelectBitvec`]: bitvector with rank, select and next-one
//!      queries. Mutable until frozen; frozen vectors answer rank in O(1)
//!      and select in O(log n).
//!    - [`ConstTimeArray`]: array with O(1) creation and O(1) reset whose
//!      unwritten slots read as a default value.
//!    - [`SegmentedArray`]: parallel per-edge fields addressed as
//!      `(node, edge)`.
//!    - [`ChoiceDictionary`] and [`SpinStack`].
//! 3. **Graphs** ([`graph`]): a [`Graph`] trait, iterative DFS with four
//!    visitor hooks and a bounded stack, an edge annotation (tree edges,
//!    back edges, coverage marks) and the algorithms computed from it.
//!
//! ## Conventions
//!
//! Positions, nodes and edge indices are 1-based. `0` means "none" in
//! every argument and return value.
//!
//! ## Example
//!
//! ```rust
//! use spacedfs::graph::{annotate_edges, biconnected_components, cut_vertices, AdjacencyGraph};
//!
//! let graph = AdjacencyGraph::from_edges(4, &[(1, 2), (2, 3), (3, 1), (3, 4)]);
//! let annotation = annotate_edges(&graph, None);
//!
//! let cuts = cut_vertices(&graph, &annotation, None);
//! assert!(cuts.get(3));
//! assert_eq!(cuts.ones(), 1);
//!
//! let blocks = biconnected_components(&graph, &annotation, None);
//! assert_eq!(blocks, vec![vec![1, 2, 3], vec![3, 4]]);
//! ```
//!
//! ## Tracing
//!
//! With the `tracing` feature enabled, traversals and annotation passes emit
//! structured events under the `spacedfs::dfs`, `spacedfs::annotation` and
//! `spacedfs::algorithms` targets.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod macros;

pub mod alloc;
pub mod collections;
pub mod graph;

pub use alloc::{AllocError, ZeroedRegion};
pub use collections::{
    BoolArray, ChoiceDictionary, ConstTimeArray, PackedArray, RankSelectBitvec, SegmentLayout, SegmentedArray,
    SpinStack,
};
pub use graph::{
    annotate_edges, biconnected_components, biconnected_components_with, cut_vertices, dfs, dfs_with_options,
    dfs_with_parents, update_edges, AdjacencyGraph, Color, DfsOptions, DfsStats, DfsVisitor, EdgeAnnotation,
    EdgeMark, Graph,
};

const _: () = {
    use core::mem;

    // Both stack engines store plain index pairs.
    assert!(mem::size_of::<(usize, usize)>() == 2 * mem::size_of::<usize>());
    assert!(mem::size_of::<Color>() == 1);
    assert!(mem::size_of::<EdgeMark>() == 1);
};
