//! Per-edge DFS annotation.
//!
//! One segment per node, one position per directed edge view, three
//! parallel fields:
//!
//! - `parent`: set on the child's view of every tree edge, so a node's
//!   parent edge is the first set position of its segment.
//! - `backlink`: set on the ancestor's view of every back edge.
//! - `marks`: [`EdgeMark`] of every edge, stored identically on both views.
//!
//! A tree edge is [`EdgeMark::Full`] when some back edge from below it
//! reaches strictly above its upper endpoint, [`EdgeMark::Half`] when back
//! edges from below reach exactly its upper endpoint and no further, and
//! [`EdgeMark::Unmarked`] (a bridge) otherwise. Back edges are always full.

use serde::{Deserialize, Serialize};

use crate::collections::{BoolArray, FieldSet, PackedArray, RankSelectBitvec, SegmentLayout, SegmentedArray};
use crate::graph::dfs::{dfs_with_parents, Color, DfsVisitor, ParentEdges};
use crate::graph::Graph;

/// Strength of an edge's back-edge coverage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EdgeMark {
    /// Not covered by any back edge.
    Unmarked = 0,
    /// Covered up to, but not beyond, the upper endpoint.
    Half = 1,
    /// Covered beyond the upper endpoint, or a back edge itself.
    Full = 2,
}

impl EdgeMark {
    #[inline]
    fn from_bits(bits: u64) -> Self {
        match bits {
            0 => EdgeMark::Unmarked,
            1 => EdgeMark::Half,
            _ => EdgeMark::Full,
        }
    }
}

/// The three per-edge fields of an [`EdgeAnnotation`].
#[derive(Clone, Debug)]
pub struct EdgeFields {
    /// Child-side views of tree edges.
    pub parent: BoolArray,
    /// Ancestor-side views of back edges.
    pub backlink: BoolArray,
    /// Two-bit [`EdgeMark`] per view.
    pub marks: PackedArray<2>,
}

impl EdgeFields {
    fn new(len: usize) -> Self {
        Self {
            parent: BoolArray::new(len),
            backlink: BoolArray::new(len),
            marks: PackedArray::new(len),
        }
    }
}

impl FieldSet for EdgeFields {
    fn spans(&self, len: usize) -> bool {
        self.parent.len() == len && self.backlink.len() == len && self.marks.len() == len
    }

    fn is_static(&self) -> bool {
        self.parent.is_static() && self.backlink.is_static() && self.marks.is_static()
    }

    fn make_static(&mut self) {
        self.parent.make_static();
        self.backlink.make_static();
        self.marks.make_static();
    }
}

/// DFS tree, back edges and edge marks of a graph.
///
/// Built by [`annotate_edges`]; static (frozen) once complete. Clone it
/// before calling [`update_edges`] to keep the previous annotation.
#[derive(Clone, Debug)]
pub struct EdgeAnnotation {
    edges: SegmentedArray<EdgeFields>,
}

impl EdgeAnnotation {
    /// Empty, unfrozen annotation sized for `graph`.
    pub fn new<G: Graph + ?Sized>(graph: &G) -> Self {
        Self {
            edges: SegmentedArray::new(graph.degrees(), EdgeFields::new),
        }
    }

    /// Node/edge to flat position mapping.
    pub fn layout(&self) -> &SegmentLayout {
        self.edges.layout()
    }

    /// Raw fields.
    pub fn fields(&self) -> &EdgeFields {
        self.edges.fields()
    }

    /// Returns `true` once all three fields are frozen.
    pub fn is_static(&self) -> bool {
        self.edges.is_static()
    }

    /// Edge of `node` leading to its DFS parent; `0` for roots, removed
    /// and isolated nodes.
    pub fn parent_edge(&self, node: usize) -> usize {
        self.layout().select_segment_pos(&self.fields().parent, node, 1)
    }

    /// DFS parent of `node`, or `0`.
    pub fn parent<G: Graph + ?Sized>(&self, graph: &G, node: usize) -> usize {
        match self.parent_edge(node) {
            0 => 0,
            edge => graph.head(node, edge),
        }
    }

    /// Returns `true` if edge `edge` of `node` is the tree edge to its parent.
    pub fn is_parent_edge(&self, node: usize, edge: usize) -> bool {
        self.fields().parent.get(self.layout().get_pos(node, edge))
    }

    /// Returns `true` if edge `edge` of `node` is a back edge from a
    /// descendant to `node`.
    pub fn is_backlink(&self, node: usize, edge: usize) -> bool {
        self.fields().backlink.get(self.layout().get_pos(node, edge))
    }

    /// Edge indices of `node` that are back edges to `node`, ascending.
    pub fn backlinks(&self, node: usize) -> Backlinks<'_> {
        Backlinks {
            annotation: self,
            node,
            from: 1,
        }
    }

    /// Mark of edge `edge` of `node`; `Unmarked` for invalid edges.
    pub fn mark(&self, node: usize, edge: usize) -> EdgeMark {
        EdgeMark::from_bits(self.fields().marks.get(self.layout().get_pos(node, edge)))
    }

    /// Number of tree edges.
    pub fn tree_edges(&self) -> usize {
        self.fields().parent.ones()
    }

    /// Number of back edges.
    pub fn back_edges(&self) -> usize {
        self.fields().backlink.ones()
    }
}

/// Iterator over the back edges ending at one node.
pub struct Backlinks<'a> {
    annotation: &'a EdgeAnnotation,
    node: usize,
    from: usize,
}

impl Iterator for Backlinks<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let annotation = self.annotation;
        match annotation
            .layout()
            .select_segment_pos(&annotation.fields().backlink, self.node, self.from)
        {
            0 => None,
            edge => {
                self.from = edge + 1;
                Some(edge)
            }
        }
    }
}

#[inline]
fn is_removed(removed: Option<&RankSelectBitvec>, node: usize) -> bool {
    removed.is_some_and(|set| set.get(node))
}

/// Annotates every edge of `graph`, ignoring nodes set in `removed`.
pub fn annotate_edges<G: Graph + ?Sized>(graph: &G, removed: Option<&RankSelectBitvec>) -> EdgeAnnotation {
    let mut annotation = EdgeAnnotation::new(graph);
    update_edges(graph, &mut annotation, removed);
    annotation
}

/// Records tree edges and back edges while the traversal runs; its own
/// parent records drive the traversal.
struct TreeBuilder<'a, G: ?Sized> {
    graph: &'a G,
    layout: &'a SegmentLayout,
    parent: &'a mut BoolArray,
    backlink: &'a mut BoolArray,
    removed: Option<&'a RankSelectBitvec>,
    roots: usize,
}

impl<G: Graph + ?Sized> ParentEdges for TreeBuilder<'_, G> {
    fn parent_edge(&self, node: usize) -> usize {
        self.layout.select_segment_pos(&*self.parent, node, 1)
    }
}

impl<G: Graph + ?Sized> DfsVisitor for TreeBuilder<'_, G> {
    fn pre_process(&mut self, node: usize, degree: usize, is_root: bool) -> bool {
        if is_removed(self.removed, node) {
            return false;
        }
        if is_root && degree > 0 {
            self.roots += 1;
        }
        true
    }

    fn pre_explore(&mut self, node: usize, edge: usize, next: usize, color: Color) -> bool {
        if is_removed(self.removed, next) {
            return false;
        }
        let (_, back) = self.graph.mate(node, edge);
        match color {
            Color::White => self.parent.set(self.layout.get_pos(next, back), true),
            Color::Gray | Color::DarkGray => self.backlink.set(self.layout.get_pos(next, back), true),
            Color::Black => {}
        }
        true
    }
}

/// Recomputes `annotation` for `graph` with the nodes in `removed` taken
/// out, resetting any previous contents.
///
/// Tree and back edges come from one parent-tracking traversal; marks are
/// then derived by walking every back edge up the tree.
pub fn update_edges<G: Graph + ?Sized>(
    graph: &G,
    annotation: &mut EdgeAnnotation,
    removed: Option<&RankSelectBitvec>,
) {
    let (layout, fields) = annotation.edges.split_mut();
    fields.parent.reset();
    fields.backlink.reset();
    fields.marks.reset();

    let mut builder = TreeBuilder {
        graph,
        layout,
        parent: &mut fields.parent,
        backlink: &mut fields.backlink,
        removed,
        roots: 0,
    };
    dfs_with_parents(graph, 0, &mut builder);
    let roots = builder.roots;
    if removed.is_none() {
        debug_assert_eq!(
            layout.segments() - layout.empty_segments(),
            fields.parent.ones() + roots,
            "every non-isolated node is either a root or has a parent edge"
        );
    }
    fields.parent.make_static();
    fields.backlink.make_static();
    trace_event!(
        debug,
        target: "spacedfs::annotation",
        roots,
        tree_edges = fields.parent.ones(),
        back_edges = fields.backlink.ones(),
        "update_edges"
    );

    mark_edges(graph, layout, fields, removed);
    fields.marks.make_static();
}

/// Walks back edges up the DFS tree, strengthening marks.
///
/// Owners of back edges are visited in DFS preorder (the same traversal as
/// the tree builder), so an ancestor's walks always run before those of its
/// descendants and a walk can stop at the first full edge.
struct MarkWalker<'a, G: ?Sized> {
    graph: &'a G,
    layout: &'a SegmentLayout,
    parent: &'a BoolArray,
    backlink: &'a BoolArray,
    marks: &'a mut PackedArray<2>,
    removed: Option<&'a RankSelectBitvec>,
}

impl<G: Graph + ?Sized> MarkWalker<'_, G> {
    fn set_mark(&mut self, node: usize, edge: usize, mark: EdgeMark) {
        self.marks.set(self.layout.get_pos(node, edge), mark as u64);
    }

    fn mark_of(&self, node: usize, edge: usize) -> EdgeMark {
        EdgeMark::from_bits(self.marks.get(self.layout.get_pos(node, edge)))
    }

    /// Marks the back edge `edge` of `stop` and the tree path from its
    /// lower endpoint up to `stop`.
    fn mark_path(&mut self, stop: usize, edge: usize) {
        let (descendant, back) = self.graph.mate(stop, edge);
        self.set_mark(stop, edge, EdgeMark::Full);
        self.set_mark(descendant, back, EdgeMark::Full);

        let mut current = descendant;
        while current != stop {
            let up = self.parent_edge(current);
            if up == 0 {
                break;
            }
            let (parent, down) = self.graph.mate(current, up);
            if self.mark_of(parent, down) == EdgeMark::Full {
                break;
            }
            let mark = if parent == stop { EdgeMark::Half } else { EdgeMark::Full };
            self.set_mark(current, up, mark);
            self.set_mark(parent, down, mark);
            current = parent;
        }
    }
}

impl<G: Graph + ?Sized> ParentEdges for MarkWalker<'_, G> {
    fn parent_edge(&self, node: usize) -> usize {
        self.layout.select_segment_pos(self.parent, node, 1)
    }
}

impl<G: Graph + ?Sized> DfsVisitor for MarkWalker<'_, G> {
    fn pre_process(&mut self, node: usize, _degree: usize, _is_root: bool) -> bool {
        if is_removed(self.removed, node) {
            return false;
        }
        let mut from = 1;
        loop {
            let edge = self.layout.select_segment_pos(self.backlink, node, from);
            if edge == 0 {
                break;
            }
            self.mark_path(node, edge);
            from = edge + 1;
        }
        true
    }

    fn pre_explore(&mut self, _node: usize, _edge: usize, next: usize, _color: Color) -> bool {
        !is_removed(self.removed, next)
    }
}

fn mark_edges<G: Graph + ?Sized>(
    graph: &G,
    layout: &SegmentLayout,
    fields: &mut EdgeFields,
    removed: Option<&RankSelectBitvec>,
) {
    let EdgeFields {
        parent,
        backlink,
        marks,
    } = fields;
    let mut walker = MarkWalker {
        graph,
        layout,
        parent,
        backlink,
        marks,
        removed,
    };
    dfs_with_parents(graph, 0, &mut walker);
    trace_event!(
        debug,
        target: "spacedfs::annotation",
        marked_bits = walker.marks.ones(),
        "mark_edges"
    );
}
