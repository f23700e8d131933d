//! Cut vertices and biconnected components from an [`EdgeAnnotation`].

use crate::collections::RankSelectBitvec;
use crate::graph::annotation::{EdgeAnnotation, EdgeMark};
use crate::graph::dfs::{dfs_with_parents, Color, DfsVisitor, ParentEdges};
use crate::graph::Graph;

#[inline]
fn is_removed(removed: Option<&RankSelectBitvec>, node: usize) -> bool {
    removed.is_some_and(|set| set.get(node))
}

/// Returns the cut vertices of `graph` as a frozen bitvector over its
/// nodes.
///
/// A root of the DFS forest is a cut vertex when it has two or more tree
/// children; any other node is one when some tree edge down to a child is
/// not [`EdgeMark::Full`]. `annotation` must have been computed with the
/// same `removed` set; removed nodes are never reported.
pub fn cut_vertices<G: Graph + ?Sized>(
    graph: &G,
    annotation: &EdgeAnnotation,
    removed: Option<&RankSelectBitvec>,
) -> RankSelectBitvec {
    let nodes = graph.node_count();
    let mut cuts = RankSelectBitvec::new(nodes);
    for node in 1..=nodes {
        let degree = graph.degree(node);
        if degree < 2 || is_removed(removed, node) {
            continue;
        }
        let up = annotation.parent_edge(node);
        let is_root = up == 0;
        let mut children = 0;
        let mut is_cut = false;
        for edge in (1..=degree).filter(|&edge| edge != up) {
            let (next, back) = graph.mate(node, edge);
            if annotation.parent_edge(next) != back {
                continue;
            }
            children += 1;
            if !is_root && annotation.mark(node, edge) != EdgeMark::Full {
                is_cut = true;
                break;
            }
        }
        if is_cut || (is_root && children >= 2) {
            cuts.set(node, true);
        }
    }
    cuts.make_static();
    trace_event!(debug, target: "spacedfs::algorithms", cut_vertices = cuts.ones(), "cut_vertices");
    cuts
}

/// Explores one block below its top node, descending only through full
/// tree edges.
struct BlockCollector<'a, G: ?Sized, F> {
    graph: &'a G,
    annotation: &'a EdgeAnnotation,
    removed: Option<&'a RankSelectBitvec>,
    top: usize,
    emit: &'a mut F,
}

impl<G: Graph + ?Sized, F> ParentEdges for BlockCollector<'_, G, F> {
    fn parent_edge(&self, node: usize) -> usize {
        self.annotation.parent_edge(node)
    }
}

impl<G, F> DfsVisitor for BlockCollector<'_, G, F>
where
    G: Graph + ?Sized,
    F: FnMut(usize, bool),
{
    fn pre_process(&mut self, node: usize, _degree: usize, _is_root: bool) -> bool {
        !is_removed(self.removed, node)
    }

    fn pre_explore(&mut self, node: usize, edge: usize, next: usize, color: Color) -> bool {
        if next == self.top || is_removed(self.removed, next) {
            return false;
        }
        if color != Color::White {
            return true;
        }
        let (_, back) = self.graph.mate(node, edge);
        if self.annotation.parent_edge(next) == back && self.annotation.mark(node, edge) == EdgeMark::Full {
            (self.emit)(next, false);
            true
        } else {
            false
        }
    }
}

/// Streams the biconnected components of `graph` to `emit`.
///
/// Each component is reported as a run of `emit(node, new_component)`
/// calls whose first call has `new_component == true`. Components are
/// found at their topmost tree edge, scanning child nodes in order; a
/// bridge yields a two-node component and isolated nodes yield none.
/// `annotation` must have been computed with the same `removed` set.
///
/// Returns the number of components reported.
pub fn biconnected_components_with<G, F>(
    graph: &G,
    annotation: &EdgeAnnotation,
    removed: Option<&RankSelectBitvec>,
    mut emit: F,
) -> usize
where
    G: Graph + ?Sized,
    F: FnMut(usize, bool),
{
    let mut components = 0_usize;
    for node in 1..=graph.node_count() {
        if is_removed(removed, node) {
            continue;
        }
        let up = annotation.parent_edge(node);
        if up == 0 {
            continue;
        }
        let mark = annotation.mark(node, up);
        if mark == EdgeMark::Full {
            continue;
        }
        let top = graph.head(node, up);
        components += 1;
        emit(top, true);
        emit(node, false);
        if mark == EdgeMark::Half {
            let mut collector = BlockCollector {
                graph,
                annotation,
                removed,
                top,
                emit: &mut emit,
            };
            dfs_with_parents(graph, node, &mut collector);
        }
    }
    trace_event!(debug, target: "spacedfs::algorithms", components, "biconnected_components");
    components
}

/// Collects the biconnected components of `graph`, one node list per
/// component in the order of [`biconnected_components_with`].
pub fn biconnected_components<G: Graph + ?Sized>(
    graph: &G,
    annotation: &EdgeAnnotation,
    removed: Option<&RankSelectBitvec>,
) -> Vec<Vec<usize>> {
    let mut components: Vec<Vec<usize>> = Vec::new();
    biconnected_components_with(graph, annotation, removed, |node, new_component| {
        if new_component {
            components.push(Vec::new());
        }
        if let Some(component) = components.last_mut() {
            component.push(node);
        }
    });
    components
}
