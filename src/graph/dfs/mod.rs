//! Iterative depth-first search with caller-supplied hooks.
//!
//! Two engines share the [`DfsVisitor`] hook interface:
//!
//! - [`dfs`] / [`dfs_with_options`] keep `(node, next edge)` pairs on a
//!   [`SpinStack`](crate::collections::SpinStack) of
//!   \(O(n / \log n)\) entries. When the stack overflows its budget the
//!   oldest entries are evicted; once the traversal climbs back to the
//!   evicted region the path from the root is recomputed by a restore walk
//!   that only repaints colors.
//! - [`dfs_with_parents`] keeps a single pending entry and asks the visitor
//!   for each node's parent edge ([`ParentEdges`]), so it never needs a
//!   stack or a restore walk.
//!
//! Both visit nodes in the same order and fire the hooks at the same
//! points:
//!
//! | Hook | Fired when |
//! |------|------------|
//! | `pre_process(node, degree, is_root)` | a white node is reached; `false` blackens it unexplored |
//! | `pre_explore(node, edge, next, color)` | edge `edge` of `node` is examined (the edge to the parent is skipped); `false` blackens `next` |
//! | `post_explore(node, next, color)` | `next` turned out non-white, or the search climbs back from `next` |
//! | `post_process(node, degree)` | every edge of `node` has been examined |

mod parents;
mod spin;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::collections::PackedArray;
use crate::graph::Graph;

use parents::ParentDfs;
use spin::SpinDfs;

/// Traversal state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    /// Not reached yet.
    White = 0,
    /// On the current path, painted by the primary pass.
    Gray = 1,
    /// On the current path, painted after an odd number of restore walks.
    DarkGray = 2,
    /// Finished or pruned.
    Black = 3,
}

impl Color {
    #[inline]
    fn from_bits(bits: u64) -> Self {
        match bits {
            0 => Color::White,
            1 => Color::Gray,
            2 => Color::DarkGray,
            _ => Color::Black,
        }
    }

    /// Returns `true` for the two on-path colors.
    #[inline]
    pub fn is_on_path(self) -> bool {
        matches!(self, Color::Gray | Color::DarkGray)
    }
}

/// Two bits of color per node.
#[derive(Clone, Debug)]
pub(crate) struct ColorMap {
    cells: PackedArray<2>,
}

impl ColorMap {
    pub(crate) fn new(nodes: usize) -> Self {
        Self {
            cells: PackedArray::new(nodes),
        }
    }

    #[inline]
    pub(crate) fn get(&self, node: usize) -> Color {
        Color::from_bits(self.cells.get(node))
    }

    #[inline]
    pub(crate) fn set(&mut self, node: usize, color: Color) {
        self.cells.set(node, color as u64);
    }
}

/// Hooks observing (and pruning) a depth-first search.
///
/// Every hook has a permissive default, so implementors only override what
/// they need.
pub trait DfsVisitor {
    /// Called when a white node is reached. Returning `false` blackens the
    /// node without exploring it.
    fn pre_process(&mut self, _node: usize, _degree: usize, _is_root: bool) -> bool {
        true
    }

    /// Called before following edge `edge` of `node` to `next`, whose
    /// current color is `color`. Returning `false` blackens `next`.
    fn pre_explore(&mut self, _node: usize, _edge: usize, _next: usize, _color: Color) -> bool {
        true
    }

    /// Called when `next` is not descended into (it is not white), or when
    /// the search returns from `next` to `node`.
    fn post_explore(&mut self, _node: usize, _next: usize, _color: Color) {}

    /// Called once all edges of `node` have been examined.
    fn post_process(&mut self, _node: usize, _degree: usize) {}
}

impl DfsVisitor for () {}

/// Parent lookup for [`dfs_with_parents`].
pub trait ParentEdges {
    /// The edge index of `node` leading to its DFS parent, or `0` for roots
    /// and nodes not reached yet.
    fn parent_edge(&self, node: usize) -> usize;
}

type PreProcess<'a> = Box<dyn FnMut(usize, usize, bool) -> bool + 'a>;
type PreExplore<'a> = Box<dyn FnMut(usize, usize, usize, Color) -> bool + 'a>;
type PostExplore<'a> = Box<dyn FnMut(usize, usize, Color) + 'a>;
type PostProcess<'a> = Box<dyn FnMut(usize, usize) + 'a>;

/// A [`DfsVisitor`] assembled from closures.
///
/// ```
/// use spacedfs::graph::{dfs, AdjacencyGraph, DfsHooks};
///
/// let graph = AdjacencyGraph::from_edges(3, &[(1, 2), (2, 3)]);
/// let mut order = Vec::new();
/// let mut hooks = DfsHooks::new().on_post_process(|node, _| order.push(node));
/// dfs(&graph, 1, &mut hooks);
/// drop(hooks);
/// assert_eq!(order, vec![3, 2, 1]);
/// ```
#[derive(Default)]
pub struct DfsHooks<'a> {
    pre_process: Option<PreProcess<'a>>,
    pre_explore: Option<PreExplore<'a>>,
    post_explore: Option<PostExplore<'a>>,
    post_process: Option<PostProcess<'a>>,
}

impl<'a> DfsHooks<'a> {
    /// Hooks that observe nothing and prune nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `pre_process` hook.
    #[must_use]
    pub fn on_pre_process(mut self, hook: impl FnMut(usize, usize, bool) -> bool + 'a) -> Self {
        self.pre_process = Some(Box::new(hook));
        self
    }

    /// Sets the `pre_explore` hook.
    #[must_use]
    pub fn on_pre_explore(mut self, hook: impl FnMut(usize, usize, usize, Color) -> bool + 'a) -> Self {
        self.pre_explore = Some(Box::new(hook));
        self
    }

    /// Sets the `post_explore` hook.
    #[must_use]
    pub fn on_post_explore(mut self, hook: impl FnMut(usize, usize, Color) + 'a) -> Self {
        self.post_explore = Some(Box::new(hook));
        self
    }

    /// Sets the `post_process` hook.
    #[must_use]
    pub fn on_post_process(mut self, hook: impl FnMut(usize, usize) + 'a) -> Self {
        self.post_process = Some(Box::new(hook));
        self
    }
}

impl DfsVisitor for DfsHooks<'_> {
    fn pre_process(&mut self, node: usize, degree: usize, is_root: bool) -> bool {
        self.pre_process.as_mut().map_or(true, |hook| hook(node, degree, is_root))
    }

    fn pre_explore(&mut self, node: usize, edge: usize, next: usize, color: Color) -> bool {
        self.pre_explore.as_mut().map_or(true, |hook| hook(node, edge, next, color))
    }

    fn post_explore(&mut self, node: usize, next: usize, color: Color) {
        if let Some(hook) = self.post_explore.as_mut() {
            hook(node, next, color);
        }
    }

    fn post_process(&mut self, node: usize, degree: usize) {
        if let Some(hook) = self.post_process.as_mut() {
            hook(node, degree);
        }
    }
}

/// Tuning for the spin-stack engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfsOptions {
    /// Entries evicted at once when the stack overflows its budget. `None`
    /// picks \(\max(1, \lfloor n / \ln n \rfloor)\) for an `n`-node graph.
    pub eviction_batch: Option<usize>,
}

impl DfsOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the eviction batch.
    #[must_use]
    pub fn with_eviction_batch(mut self, batch: usize) -> Self {
        self.eviction_batch = Some(batch);
        self
    }

    /// The eviction batch used for a graph of `nodes` nodes, clamped to
    /// `1..=max(nodes, 1)`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn eviction_batch_for(&self, nodes: usize) -> usize {
        let batch = self.eviction_batch.unwrap_or_else(|| {
            if nodes <= 2 {
                1
            } else {
                let n = nodes as f64;
                (n / n.ln()) as usize
            }
        });
        batch.clamp(1, nodes.max(1))
    }

    /// Stack capacity used for a graph of `nodes` nodes: `2 + 2q`.
    pub fn stack_capacity_for(&self, nodes: usize) -> usize {
        2 + 2 * self.eviction_batch_for(nodes)
    }
}

/// Counters reported by a traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfsStats {
    /// Traversal roots with at least one edge.
    pub roots: usize,
    /// Degree-0 roots handled without touching the stack.
    pub isolated: usize,
    /// Nodes reached while white, isolated roots excluded.
    pub visited: usize,
    /// Restore walks performed.
    pub restores: usize,
    /// Times the stack bottom was evicted.
    pub evictions: usize,
    /// Entries discarded by evictions.
    pub evicted_entries: usize,
    /// Largest stack occupancy observed.
    pub peak_stack: usize,
    /// Capacity of the work stack.
    pub stack_capacity: usize,
}

/// A traversal engine able to explore one component from a root.
trait Traversal<V: ?Sized> {
    fn color(&self, node: usize) -> Color;
    fn explore(&mut self, root: usize, visitor: &mut V);
    fn stats_mut(&mut self) -> &mut DfsStats;
}

/// Runs `engine` from `root`, or over every component in node order when
/// `root` is `0`.
fn drive<G, V, T>(graph: &G, engine: &mut T, root: usize, visitor: &mut V)
where
    G: Graph + ?Sized,
    V: DfsVisitor + ?Sized,
    T: Traversal<V>,
{
    let nodes = graph.node_count();
    assert!(root <= nodes, "root {root} is not a node of a graph with {nodes} nodes");
    if root != 0 {
        engine.stats_mut().roots += 1;
        engine.explore(root, visitor);
        return;
    }
    for node in 1..=nodes {
        if engine.color(node) != Color::White {
            continue;
        }
        if graph.degree(node) == 0 {
            engine.stats_mut().isolated += 1;
            if visitor.pre_process(node, 0, true) {
                visitor.post_process(node, 0);
            }
            continue;
        }
        engine.stats_mut().roots += 1;
        trace_event!(trace, target: "spacedfs::dfs", root = node, "dfs_component");
        engine.explore(node, visitor);
    }
}

/// Depth-first search from `root` (or over the whole graph when `root` is
/// `0`) with the default [`DfsOptions`].
///
/// # Panics
///
/// Panics if `root` exceeds the node count.
pub fn dfs<G, V>(graph: &G, root: usize, visitor: &mut V) -> DfsStats
where
    G: Graph + ?Sized,
    V: DfsVisitor + ?Sized,
{
    dfs_with_options(graph, root, visitor, &DfsOptions::default())
}

/// Depth-first search on a spin stack sized by `options`.
///
/// Memory is bounded by the stack capacity regardless of path depth; paths
/// longer than the budget cost restore walks instead.
///
/// # Panics
///
/// Panics if `root` exceeds the node count.
pub fn dfs_with_options<G, V>(graph: &G, root: usize, visitor: &mut V, options: &DfsOptions) -> DfsStats
where
    G: Graph + ?Sized,
    V: DfsVisitor + ?Sized,
{
    let mut engine = SpinDfs::new(graph, options);
    drive(graph, &mut engine, root, visitor);
    let stats = engine.into_stats();
    trace_event!(
        debug,
        target: "spacedfs::dfs",
        roots = stats.roots,
        visited = stats.visited,
        restores = stats.restores,
        evictions = stats.evictions,
        peak_stack = stats.peak_stack,
        "dfs_finished"
    );
    stats
}

/// Depth-first search that climbs back through parent edges reported by the
/// visitor instead of keeping a stack.
///
/// The visitor must report, for every node already reached, the edge
/// through which it was first reached (typically recorded by its own
/// `pre_explore` hook when `color` is white).
///
/// # Panics
///
/// Panics if `root` exceeds the node count.
pub fn dfs_with_parents<G, V>(graph: &G, root: usize, visitor: &mut V) -> DfsStats
where
    G: Graph + ?Sized,
    V: DfsVisitor + ParentEdges + ?Sized,
{
    let mut engine = ParentDfs::new(graph);
    drive(graph, &mut engine, root, visitor);
    engine.into_stats()
}
