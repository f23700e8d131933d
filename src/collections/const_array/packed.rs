use crate::collections::bitvec::RankSelectBitvec;

/// A constant-time-initialized array of booleans, one bit per position.
///
/// Thin wrapper over [`RankSelectBitvec`] that adds nothing but naming; it
/// exists so boolean fields compose with the other array kinds.
#[derive(Clone, Debug)]
pub struct BoolArray {
    bits: RankSelectBitvec,
}

impl BoolArray {
    /// Creates `len` positions, all `false`.
    pub fn new(len: usize) -> Self {
        Self {
            bits: RankSelectBitvec::new(len),
        }
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if there are no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Value at `pos`; `false` when out of range.
    #[inline]
    pub fn get(&self, pos: usize) -> bool {
        self.bits.get(pos)
    }

    /// Stores `value` at `pos`; out-of-range positions are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the array is static.
    #[inline]
    pub fn set(&mut self, pos: usize, value: bool) {
        self.bits.set(pos, value);
    }

    /// Number of `true` positions.
    #[inline]
    pub fn ones(&self) -> usize {
        self.bits.ones()
    }

    /// See [`RankSelectBitvec::rank`].
    #[inline]
    pub fn rank(&self, pos: usize) -> usize {
        self.bits.rank(pos)
    }

    /// See [`RankSelectBitvec::select`].
    #[inline]
    pub fn select(&self, k: usize) -> usize {
        self.bits.select(k)
    }

    /// See [`RankSelectBitvec::next_one`].
    #[inline]
    pub fn next_one(&self, pos: usize) -> usize {
        self.bits.next_one(pos)
    }

    /// Freezes the array for faster queries.
    pub fn make_static(&mut self) {
        self.bits.make_static();
    }

    /// Returns `true` once frozen.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.bits.is_static()
    }

    /// Replaces the contents with a fresh, mutable, all-`false` array.
    pub fn reset(&mut self) {
        self.bits = RankSelectBitvec::new(self.bits.len());
    }

    /// The underlying bitvector.
    pub fn as_bitvec(&self) -> &RankSelectBitvec {
        &self.bits
    }
}

/// A constant-time-initialized array of `WIDTH`-bit unsigned integers.
///
/// Queries that search for "ones" treat any nonzero element as set, and
/// [`rank`](Self::rank) counts set *bits*, matching the field-width algebra
/// of [`RankSelectBitvec::rank_n`].
#[derive(Clone, Debug)]
pub struct PackedArray<const WIDTH: usize> {
    bits: RankSelectBitvec,
    len: usize,
}

impl<const WIDTH: usize> PackedArray<WIDTH> {
    /// Creates `len` elements, all zero.
    ///
    /// # Panics
    ///
    /// Panics if `WIDTH` is not in `1..=64` or the bit length overflows.
    pub fn new(len: usize) -> Self {
        assert!((1..=64).contains(&WIDTH), "element width must be within 1..=64");
        let Some(nbits) = len.checked_mul(WIDTH) else {
            panic!("capacity overflow: {len} elements of {WIDTH} bits");
        };
        Self {
            bits: RankSelectBitvec::new(nbits),
            len,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element `pos`; `0` when out of range.
    #[inline]
    pub fn get(&self, pos: usize) -> u64 {
        self.bits.get_n(pos, WIDTH)
    }

    /// Stores `value` at `pos`; out-of-range positions are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `value` needs more than `WIDTH` bits or the array is static.
    #[inline]
    pub fn set(&mut self, pos: usize, value: u64) {
        self.bits.set_n(pos, WIDTH, value);
    }

    /// Number of set bits over all elements.
    #[inline]
    pub fn ones(&self) -> usize {
        self.bits.ones()
    }

    /// Number of set bits in the elements before `pos`.
    #[inline]
    pub fn rank(&self, pos: usize) -> usize {
        self.bits.rank_n(pos, WIDTH)
    }

    /// Element holding the set bit of 0-based rank `k`, or `0`.
    #[inline]
    pub fn select(&self, k: usize) -> usize {
        self.bits.select_n(k, WIDTH)
    }

    /// First nonzero element at or after `pos`, or `0`.
    #[inline]
    pub fn next_one(&self, pos: usize) -> usize {
        self.bits.next_one_n(pos, WIDTH)
    }

    /// Freezes the array for faster queries.
    pub fn make_static(&mut self) {
        self.bits.make_static();
    }

    /// Returns `true` once frozen.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.bits.is_static()
    }

    /// Replaces the contents with a fresh, mutable, all-zero array.
    pub fn reset(&mut self) {
        self.bits = RankSelectBitvec::new(self.bits.len());
    }
}
