use crate::graph::Graph;

use super::{Color, ColorMap, DfsStats, DfsVisitor, ParentEdges, Traversal};

/// Stackless engine: one pending `(node, next edge)` entry, and parent
/// edges supplied by the visitor to climb back up.
pub(super) struct ParentDfs<'g, G: ?Sized> {
    graph: &'g G,
    colors: ColorMap,
    stats: DfsStats,
}

impl<'g, G: Graph + ?Sized> ParentDfs<'g, G> {
    pub(super) fn new(graph: &'g G) -> Self {
        Self {
            graph,
            colors: ColorMap::new(graph.node_count()),
            stats: DfsStats {
                stack_capacity: 1,
                ..DfsStats::default()
            },
        }
    }

    pub(super) fn into_stats(self) -> DfsStats {
        self.stats
    }
}

impl<G, V> Traversal<V> for ParentDfs<'_, G>
where
    G: Graph + ?Sized,
    V: DfsVisitor + ParentEdges + ?Sized,
{
    #[inline]
    fn color(&self, node: usize) -> Color {
        self.colors.get(node)
    }

    fn stats_mut(&mut self) -> &mut DfsStats {
        &mut self.stats
    }

    fn explore(&mut self, root: usize, visitor: &mut V) {
        let mut pending = Some((root, 1));
        let mut previous: Option<usize> = None;
        let mut descended_from: Option<(usize, usize)> = None;
        self.stats.peak_stack = 1;
        while let Some((node, edge)) = pending.take() {
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
                    self.colors.set(node, Color::Black);
                    pending = descended_from.map(|(parent, edge)| (parent, edge + 1));
                    continue;
                }
            }
            self.colors.set(node, Color::Gray);

            if edge <= degree {
                pending = Some((node, edge + 1));
                if visitor.parent_edge(node) != edge {
                    let next = self.graph.head(node, edge);
                    let mut color = self.colors.get(next);
                    if !visitor.pre_explore(node, edge, next, color) {
                        self.colors.set(next, Color::Black);
                        color = Color::Black;
                    }
                    if color == Color::White {
                        pending = Some((next, 1));
                        descended_from = Some((node, edge));
                    } else {
                        visitor.post_explore(node, next, color);
                    }
                }
            } else {
                self.colors.set(node, Color::Black);
                if self.colors.get(root) != Color::Black {
                    let up = visitor.parent_edge(node);
                    if up != 0 {
                        let (parent, back) = self.graph.mate(node, up);
                        pending = Some((parent, back + 1));
                    }
                }
                visitor.post_process(node, degree);
            }
        }
    }
}
