//! Flat arrays partitioned into variable-length segments.
//!
//! A [`SegmentLayout`] maps `(segment, local)` pairs (both 1-based) onto a
//! flat 1-based index space using two frozen marker bitvectors: one bit per
//! segment telling whether it is non-empty, and one bit per flat position
//! marking where each non-empty segment starts. Both carry a trailing
//! stopper bit so "the next segment start" always exists.
//!
//! A [`SegmentedArray`] pairs a layout with a set of parallel fields that
//! all span the flat index space. Graph code uses one segment per node and
//! one flat position per directed edge.


use crate::collections::bitvec::RankSelectBitvec;
use crate::collections::const_array::{BoolArray, ConstTimeArray, PackedArray};

/// One per-position field of a [`SegmentedArray`].
pub trait Field: Clone {
    /// Number of flat positions covered.
    fn len(&self) -> usize;

    /// Returns `true` if the field covers no positions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the field no longer accepts writes.
    fn is_static(&self) -> bool {
        false
    }

    /// Freezes the field; a no-op for field kinds without a frozen form.
    fn make_static(&mut self) {}

    /// Returns every position to its initial value.
    fn reset(&mut self);
}

/// Fields whose set positions can be ranked and searched.
pub trait OnesIndex {
    /// First set position at or after `pos`, or `0`.
    fn next_one(&self, pos: usize) -> usize;

    /// Set bits strictly before `pos` (`pos >= 1`).
    fn rank(&self, pos: usize) -> usize;
}

/// The collection of fields stored by a [`SegmentedArray`].
pub trait FieldSet: Clone {
    /// Returns `true` if every field spans exactly `len` positions.
    fn spans(&self, len: usize) -> bool;

    /// Returns `true` if every field is frozen.
    fn is_static(&self) -> bool;

    /// Freezes every field.
    fn make_static(&mut self);
}

impl<T: Copy> Field for ConstTimeArray<T> {
    fn len(&self) -> usize {
        ConstTimeArray::len(self)
    }

    fn reset(&mut self) {
        ConstTimeArray::reset(self);
    }
}

impl Field for BoolArray {
    fn len(&self) -> usize {
        BoolArray::len(self)
    }

    fn is_static(&self) -> bool {
        BoolArray::is_static(self)
    }

    fn make_static(&mut self) {
        BoolArray::make_static(self);
    }

    fn reset(&mut self) {
        BoolArray::reset(self);
    }
}

impl<const WIDTH: usize> Field for PackedArray<WIDTH> {
    fn len(&self) -> usize {
        PackedArray::len(self)
    }

    fn is_static(&self) -> bool {
        PackedArray::is_static(self)
    }

    fn make_static(&mut self) {
        PackedArray::make_static(self);
    }

    fn reset(&mut self) {
        PackedArray::reset(self);
    }
}

impl OnesIndex for BoolArray {
    fn next_one(&self, pos: usize) -> usize {
        BoolArray::next_one(self, pos)
    }

    fn rank(&self, pos: usize) -> usize {
        BoolArray::rank(self, pos)
    }
}

impl<const WIDTH: usize> OnesIndex for PackedArray<WIDTH> {
    fn next_one(&self, pos: usize) -> usize {
        PackedArray::next_one(self, pos)
    }

    fn rank(&self, pos: usize) -> usize {
        PackedArray::rank(self, pos)
    }
}

impl OnesIndex for RankSelectBitvec {
    fn next_one(&self, pos: usize) -> usize {
        RankSelectBitvec::next_one(self, pos)
    }

    fn rank(&self, pos: usize) -> usize {
        RankSelectBitvec::rank(self, pos)
    }
}

macro_rules! impl_field_set {
    ($($field:ident . $idx:tt),+) => {
        impl<$($field: Field),+> FieldSet for ($($field,)+) {
            fn spans(&self, len: usize) -> bool {
                true $(&& self.$idx.len() == len)+
            }

            fn is_static(&self) -> bool {
                true $(&& self.$idx.is_static())+
            }

            fn make_static(&mut self) {
                $(self.$idx.make_static();)+
            }
        }
    };
}

impl_field_set!(A.0);
impl_field_set!(A.0, B.1);
impl_field_set!(A.0, B.1, C.2);
impl_field_set!(A.0, B.1, C.2, D.3);

/// Mapping between `(segment, local)` coordinates and flat positions.
///
/// ### Performance Characteristics
/// | Operation | Complexity |
/// |-----------|------------|
/// | `new` | \(O(\text{segments} + \text{len} / 64)\) |
/// | `get_pos` / `segment_size` | \(O(\log n)\) |
/// | `select_array_pos` | one rank/select plus one `next_one` on the field |
/// | `ones_segment` | two ranks on the field |
#[derive(Clone, Debug)]
pub struct SegmentLayout {
    len: usize,
    segments: usize,
    starts: RankSelectBitvec,
    nonempty: RankSelectBitvec,
}

impl SegmentLayout {
    /// Builds the layout for the given segment sizes (zero sizes allowed).
    pub fn new<I>(sizes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
        I::IntoIter: Clone,
    {
        let sizes = sizes.into_iter();
        let (segments, len) = sizes
            .clone()
            .fold((0usize, 0usize), |(count, total), size| (count + 1, total + size));

        let mut nonempty = RankSelectBitvec::new(segments + 1);
        let mut starts = RankSelectBitvec::new(len + 1);
        let mut flat = 1;
        for (segment, size) in sizes.enumerate() {
            if size > 0 {
                nonempty.set(segment + 1, true);
                starts.set(flat, true);
                flat += size;
            }
        }
        nonempty.set(segments + 1, true);
        starts.set(len + 1, true);
        nonempty.make_static();
        starts.make_static();

        Self {
            len,
            segments,
            starts,
            nonempty,
        }
    }

    /// Number of flat positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if every segment is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments.
    #[inline]
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Flat start and exclusive end of a non-empty segment.
    fn bounds(&self, segment: usize) -> Option<(usize, usize)> {
        if segment == 0 || segment > self.segments || !self.nonempty.get(segment) {
            return None;
        }
        let start = self.starts.select(self.nonempty.rank(segment));
        Some((start, self.starts.next_one(start + 1)))
    }

    /// Number of positions in `segment`; `0` for empty or invalid segments.
    pub fn segment_size(&self, segment: usize) -> usize {
        self.bounds(segment).map_or(0, |(start, end)| end - start)
    }

    /// Flat position of `local` inside `segment`, or `0` if the segment is
    /// empty or `local` is not within `1..=segment_size(segment)`.
    pub fn get_pos(&self, segment: usize, local: usize) -> usize {
        match self.bounds(segment) {
            Some((start, end)) if local != 0 && local <= end - start => start + local - 1,
            _ => 0,
        }
    }

    /// Flat position of the first set position of `field` inside `segment`
    /// at or after local offset `from`, or `0` if none remains in the
    /// segment.
    pub fn select_array_pos<F: OnesIndex + ?Sized>(&self, field: &F, segment: usize, from: usize) -> usize {
        let Some((start, end)) = self.bounds(segment) else {
            return 0;
        };
        let first = start.saturating_add(from.max(1) - 1);
        if first >= end {
            return 0;
        }
        let found = field.next_one(first);
        if found == 0 || found >= end {
            0
        } else {
            found
        }
    }

    /// Like [`select_array_pos`](Self::select_array_pos) but returns the
    /// segment-local position.
    pub fn select_segment_pos<F: OnesIndex + ?Sized>(&self, field: &F, segment: usize, from: usize) -> usize {
        match self.select_array_pos(field, segment, from) {
            0 => 0,
            found => found + 1 - self.get_pos(segment, 1),
        }
    }

    /// Number of set bits of `field` inside `segment`.
    pub fn ones_segment<F: OnesIndex + ?Sized>(&self, field: &F, segment: usize) -> usize {
        self.bounds(segment)
            .map_or(0, |(start, end)| field.rank(end) - field.rank(start))
    }

    /// Number of empty segments before `segment`.
    pub fn empty_before(&self, segment: usize) -> usize {
        let segment = segment.min(self.segments + 1);
        if segment == 0 {
            return 0;
        }
        segment - 1 - self.nonempty.rank(segment)
    }

    /// Number of empty segments overall.
    pub fn empty_segments(&self) -> usize {
        self.nonempty.len() - self.nonempty.ones()
    }
}

/// A [`SegmentLayout`] together with parallel per-position fields.
///
/// Copies are explicit: `clone` duplicates every field.
#[derive(Clone, Debug)]
pub struct SegmentedArray<F> {
    layout: SegmentLayout,
    fields: F,
}

impl<F: FieldSet> SegmentedArray<F> {
    /// Builds the layout from `sizes` and asks `fields` for storage spanning
    /// the resulting flat length.
    ///
    /// # Panics
    ///
    /// Panics if a field returned by `fields` does not span the flat length.
    pub fn new<I>(sizes: I, fields: impl FnOnce(usize) -> F) -> Self
    where
        I: IntoIterator<Item = usize>,
        I::IntoIter: Clone,
    {
        let layout = SegmentLayout::new(sizes);
        let fields = fields(layout.len());
        assert!(
            fields.spans(layout.len()),
            "every field must span all {} flat positions",
            layout.len()
        );
        Self { layout, fields }
    }

    /// The coordinate mapping.
    #[inline]
    pub fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    /// Shared access to the fields.
    #[inline]
    pub fn fields(&self) -> &F {
        &self.fields
    }

    /// Mutable access to the fields.
    #[inline]
    pub fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    /// Layout and fields borrowed at once, so fields can be written while
    /// positions are being resolved.
    #[inline]
    pub fn split_mut(&mut self) -> (&SegmentLayout, &mut F) {
        (&self.layout, &mut self.fields)
    }

    /// Returns `true` once every field is frozen.
    pub fn is_static(&self) -> bool {
        self.fields.is_static()
    }

    /// Freezes every field.
    pub fn make_static(&mut self) {
        self.fields.make_static();
    }

    /// See [`SegmentLayout::len`].
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// See [`SegmentLayout::is_empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// See [`SegmentLayout::segments`].
    #[inline]
    pub fn segments(&self) -> usize {
        self.layout.segments()
    }

    /// See [`SegmentLayout::get_pos`].
    #[inline]
    pub fn get_pos(&self, segment: usize, local: usize) -> usize {
        self.layout.get_pos(segment, local)
    }

    /// See [`SegmentLayout::segment_size`].
    #[inline]
    pub fn segment_size(&self, segment: usize) -> usize {
        self.layout.segment_size(segment)
    }
}
