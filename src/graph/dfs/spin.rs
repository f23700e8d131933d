use crate::collections::SpinStack;
use crate::graph::Graph;

use super::{Color, ColorMap, DfsOptions, DfsStats, DfsVisitor, Traversal};

/// Which on-path label the current pass paints with. Every restore walk
/// flips it so the walk can tell repainted ancestors from stale ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Primary,
    Restore,
}

impl Pass {
    #[inline]
    fn label(self) -> Color {
        match self {
            Pass::Primary => Color::Gray,
            Pass::Restore => Color::DarkGray,
        }
    }

    #[inline]
    fn flipped(self) -> Self {
        match self {
            Pass::Primary => Pass::Restore,
            Pass::Restore => Pass::Primary,
        }
    }
}

/// Stack-based engine with bounded memory.
///
/// The stack holds `(node, next edge)` pairs; the entry below the top is
/// always the parent of the top entry's node. Capacity is `2 + 2q` and `q`
/// entries are evicted from the bottom whenever occupancy exceeds `2q + 1`.
pub(super) struct SpinDfs<'g, G: ?Sized> {
    graph: &'g G,
    stack: SpinStack<(usize, usize)>,
    colors: ColorMap,
    batch: usize,
    pass: Pass,
    bottom_evicted: bool,
    stats: DfsStats,
}

impl<'g, G: Graph + ?Sized> SpinDfs<'g, G> {
    pub(super) fn new(graph: &'g G, options: &DfsOptions) -> Self {
        let nodes = graph.node_count();
        let capacity = options.stack_capacity_for(nodes);
        Self {
            graph,
            stack: SpinStack::new(capacity),
            colors: ColorMap::new(nodes),
            batch: options.eviction_batch_for(nodes),
            pass: Pass::Primary,
            bottom_evicted: false,
            stats: DfsStats {
                stack_capacity: capacity,
                ..DfsStats::default()
            },
        }
    }

    pub(super) fn into_stats(self) -> DfsStats {
        self.stats
    }

    /// Edge of the node just popped that leads back to the entry below it,
    /// or `0` at the bottom of the stack.
    #[inline]
    fn parent_edge_on_stack(&self) -> usize {
        if self.stack.is_empty() {
            return 0;
        }
        let (parent, next_edge) = self.stack.peek();
        self.graph.mate(parent, next_edge - 1).1
    }

    fn trim(&mut self) {
        self.stats.peak_stack = self.stats.peak_stack.max(self.stack.len());
        if self.stack.len() > 2 * self.batch + 1 {
            let dropped = self.stack.drop_front(self.batch);
            self.bottom_evicted = true;
            self.stats.evictions += 1;
            self.stats.evicted_entries += dropped;
            trace_event!(
                trace,
                target: "spacedfs::dfs",
                dropped,
                remaining = self.stack.len(),
                "dfs_evict"
            );
        }
    }

    /// Paints `node` black. If that leaves at most the entry of its parent
    /// on a stack whose bottom was evicted, rebuilds the path from `root`.
    fn finish(&mut self, root: usize, node: usize) {
        self.colors.set(node, Color::Black);
        if self.bottom_evicted && self.stack.len() <= 1 && self.colors.get(root) != Color::Black {
            if !self.stack.is_empty() {
                self.stack.pop();
            }
            self.pass = self.pass.flipped();
            self.stats.restores += 1;
            trace_event!(
                debug,
                target: "spacedfs::dfs",
                root,
                node,
                restores = self.stats.restores,
                "dfs_restore"
            );
            self.restore(root, node);
        }
    }

    /// Walks from `root` along nodes still carrying the previous pass's
    /// label, repainting them, until an edge to the finished node `target`
    /// is met. The stack then holds the path to `target`'s parent again,
    /// with each entry pointing just past the edge taken. No hooks fire.
    fn restore(&mut self, root: usize, target: usize) {
        self.bottom_evicted = false;
        let stale = self.pass.flipped().label();
        self.stack.push_top((root, 1));
        while !self.stack.is_empty() {
            let (node, edge) = self.stack.pop();
            self.colors.set(node, self.pass.label());
            if edge > self.graph.degree(node) {
                return;
            }
            let up = self.parent_edge_on_stack();
            self.stack.push_top((node, edge + 1));
            let next = self.graph.head(node, edge);
            if next == target {
                return;
            }
            if edge != up && self.colors.get(next) == stale {
                self.stack.push_top((next, 1));
            }
            self.trim();
        }
    }
}

impl<G, V> Traversal<V> for SpinDfs<'_, G>
where
    G: Graph + ?Sized,
    V: DfsVisitor + ?Sized,
{
    #[inline]
    fn color(&self, node: usize) -> Color {
        self.colors.get(node)
    }

    fn stats_mut(&mut self) -> &mut DfsStats {
        &mut self.stats
    }

    fn explore(&mut self, root: usize, visitor: &mut V) {
        self.stack.push_top((root, 1));
        let mut previous: Option<usize> = None;
        while !self.stack.is_empty() {
            let (node, edge) = self.stack.pop();
            if let Some(finished) = previous {
                if self.colors.get(finished) == Color::Black {
                    visitor.post_explore(node, finished, Color::Black);
                }
            }
            previous = Some(node);

            let degree = self.graph.degree(node);
            if self.colors.get(node) == Color::White {
                self.stats.visited += 1;
                if !visitor.pre_process(node, degree, node == root) {
                    self.finish(root, node);
                    continue;
                }
            }
            self.colors.set(node, self.pass.label());

            if edge <= degree {
                let up = self.parent_edge_on_stack();
                self.stack.push_top((node, edge + 1));
                if edge != up {
                    let next = self.graph.head(node, edge);
                    let mut color = self.colors.get(next);
                    if !visitor.pre_explore(node, edge, next, color) {
                        self.colors.set(next, Color::Black);
                        color = Color::Black;
                    }
                    if color == Color::White {
                        self.stack.push_top((next, 1));
                    } else {
                        visitor.post_explore(node, next, color);
                    }
                }
            } else {
                self.finish(root, node);
                visitor.post_process(node, degree);
            }
            self.trim();
        }
    }
}
