//! Rank/select bitvector with lazily initialized slates.
//!
//! Positions are 1-based; `0` is the "none" sentinel returned by every
//! search. The bit array lives in a [`ZeroedRegion`], so untouched blocks
//! read as zero without an initialization pass.
//!
//! Blocks of 64 bits are grouped into *slates* of `max(1, ⌊ln blocks⌋)`
//! blocks. While the vector is mutable, a [`ConstTimeArray`] keeps one
//! population counter per slate; a slate whose counter was never written is
//! known to be all zero and is skipped wholesale by `select` and `next_one`.
//! [`make_static`](RankSelectBitvec::make_static) swaps that counting index
//! for a frozen [`Rank9Index`] and forbids further writes.

mod rank9;


use core::fmt;

use crate::alloc::ZeroedRegion;
use crate::collections::const_array::ConstTimeArray;

pub use rank9::Rank9Index;
use rank9::select_in_word;

const BLOCK_BITS: usize = 64;

#[derive(Clone, Debug)]
enum SlateIndex {
    Mutable { counts: ConstTimeArray<u32> },
    Frozen(Rank9Index),
}

/// A fixed-length bitvector supporting rank, select and successor queries.
///
/// ### Performance Characteristics
/// | Operation | Mutable | Static |
/// |-----------|---------|--------|
/// | `new` | \(O(1)\) amortized | - |
/// | `get` / `get_n` | \(O(1)\) | \(O(1)\) |
/// | `set` / `flip` / `set_n` | \(O(1)\) | not allowed |
/// | `rank` | \(O(n / \log n)\) slates + one slate scan | \(O(1)\) |
/// | `select` | \(O(n / \log n)\) slates + one slate scan | \(O(\log n)\) |
/// | `next_one` | skips empty slates in one step | \(O(\log n)\) |
#[derive(Clone)]
pub struct RankSelectBitvec {
    words: ZeroedRegion<u64>,
    len: usize,
    ones: usize,
    slate_blocks: usize,
    index: SlateIndex,
}

#[inline]
fn low_mask(width: usize) -> u64 {
    if width >= BLOCK_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn slate_blocks_for(blocks: usize) -> usize {
    ((blocks as f64).ln() as usize).max(1)
}

impl RankSelectBitvec {
    /// Creates an all-zero bitvector of `len` bits.
    ///
    /// A length of zero yields an inert vector on which every query returns
    /// its sentinel.
    pub fn new(len: usize) -> Self {
        let blocks = len.div_ceil(BLOCK_BITS);
        let slate_blocks = slate_blocks_for(blocks);
        let slates = blocks.div_ceil(slate_blocks);
        Self {
            words: ZeroedRegion::new(blocks),
            len,
            ones: 0,
            slate_blocks,
            index: SlateIndex::Mutable {
                counts: ConstTimeArray::new(slates, 0),
            },
        }
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set bits.
    #[inline]
    pub fn ones(&self) -> usize {
        self.ones
    }

    /// Number of 64-bit blocks backing the vector.
    #[inline]
    pub fn blocks(&self) -> usize {
        self.words.len()
    }

    /// Number of slates the blocks are grouped into.
    pub fn slate_count(&self) -> usize {
        self.words.len().div_ceil(self.slate_blocks)
    }

    /// Returns `true` once [`make_static`](Self::make_static) has run.
    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self.index, SlateIndex::Frozen(_))
    }

    /// Returns `true` if the slate holding `pos` has been written to (always
    /// `true` for valid positions of a static vector).
    pub fn is_slate_init(&self, pos: usize) -> bool {
        if !self.in_range(pos) {
            return false;
        }
        match &self.index {
            SlateIndex::Mutable { counts } => counts.is_init(self.slate_of_word((pos - 1) / BLOCK_BITS)),
            SlateIndex::Frozen(_) => true,
        }
    }

    #[inline]
    fn in_range(&self, pos: usize) -> bool {
        pos != 0 && pos <= self.len
    }

    /// 1-based slate number owning block `word`.
    #[inline]
    fn slate_of_word(&self, word: usize) -> usize {
        word / self.slate_blocks + 1
    }

    /// Reads bit `pos`; `false` for out-of-range positions.
    #[inline]
    pub fn get(&self, pos: usize) -> bool {
        if !self.in_range(pos) {
            return false;
        }
        let bit = pos - 1;
        self.words[bit / BLOCK_BITS] >> (bit % BLOCK_BITS) & 1 == 1
    }

    /// Writes bit `pos`. Out-of-range positions are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the vector is static.
    pub fn set(&mut self, pos: usize, value: bool) {
        if !self.in_range(pos) {
            return;
        }
        let bit = pos - 1;
        let word = bit / BLOCK_BITS;
        let mask = 1u64 << (bit % BLOCK_BITS);
        let current = self.words[word];
        self.write_word(word, if value { current | mask } else { current & !mask });
    }

    /// Inverts bit `pos`. Out-of-range positions are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the vector is static.
    pub fn flip(&mut self, pos: usize) {
        if !self.in_range(pos) {
            return;
        }
        let bit = pos - 1;
        let word = bit / BLOCK_BITS;
        let current = self.words[word];
        self.write_word(word, current ^ (1u64 << (bit % BLOCK_BITS)));
    }

    /// Replaces one block and keeps the population counters in step.
    fn write_word(&mut self, word: usize, value: u64) {
        let counts = match &mut self.index {
            SlateIndex::Mutable { counts } => counts,
            SlateIndex::Frozen(_) => panic!("bitvector is static and can no longer be modified"),
        };
        let before = self.words[word].count_ones();
        let after = value.count_ones();
        self.words[word] = value;
        let slate = counts.get_mut(word / self.slate_blocks + 1);
        *slate = *slate - before + after;
        self.ones = self.ones - before as usize + after as usize;
    }

    fn check_width(&self, width: usize) {
        assert!(
            (1..=BLOCK_BITS).contains(&width),
            "field width must be within 1..=64, got {width}"
        );
        assert!(
            self.len % width == 0,
            "field width {width} does not divide bitvector length {}",
            self.len
        );
    }

    /// 0-based first bit of field `pos`, if the whole field is in range.
    fn field_start(&self, pos: usize, width: usize) -> Option<usize> {
        let start = pos.checked_sub(1)?.checked_mul(width)?;
        (start.checked_add(width)? <= self.len).then_some(start)
    }

    /// Reads the `width`-bit field number `pos` (1-based); `0` if the field
    /// lies outside the vector.
    ///
    /// # Panics
    ///
    /// Panics if `width` is not in `1..=64` or does not divide the length.
    pub fn get_n(&self, pos: usize, width: usize) -> u64 {
        self.check_width(width);
        let Some(start) = self.field_start(pos, width) else {
            return 0;
        };
        let word = start / BLOCK_BITS;
        let offset = start % BLOCK_BITS;
        let low = self.words[word] >> offset;
        if offset + width <= BLOCK_BITS {
            low & low_mask(width)
        } else {
            let spill = offset + width - BLOCK_BITS;
            low | ((self.words[word + 1] & low_mask(spill)) << (BLOCK_BITS - offset))
        }
    }

    /// Writes the `width`-bit field number `pos` (1-based). Fields outside
    /// the vector are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `width` is invalid, if `value` does not fit into `width`
    /// bits, or if the vector is static.
    pub fn set_n(&mut self, pos: usize, width: usize, value: u64) {
        self.check_width(width);
        assert!(
            width == BLOCK_BITS || value < 1u64 << width,
            "value {value} does not fit into {width} bits"
        );
        let Some(start) = self.field_start(pos, width) else {
            return;
        };
        let word = start / BLOCK_BITS;
        let offset = start % BLOCK_BITS;
        if offset + width <= BLOCK_BITS {
            let mask = low_mask(width) << offset;
            let updated = (self.words[word] & !mask) | (value << offset);
            self.write_word(word, updated);
        } else {
            let low_bits = BLOCK_BITS - offset;
            let updated = (self.words[word] & low_mask(offset)) | (value << offset);
            self.write_word(word, updated);
            let spill = width - low_bits;
            let updated = (self.words[word + 1] & !low_mask(spill)) | (value >> low_bits);
            self.write_word(word + 1, updated);
        }
    }

    /// Freezes the vector: builds the rank9 directory and drops the slate
    /// counters. Idempotent; there is no way back.
    pub fn make_static(&mut self) {
        if self.is_static() {
            return;
        }
        let index = Rank9Index::build(&self.words);
        debug_assert_eq!(index.ones(), self.ones, "slate counters drifted from the bits");
        self.index = SlateIndex::Frozen(index);
    }

    /// Number of set bits strictly before `pos`. Positions past the end
    /// return [`ones`](Self::ones).
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `0`.
    pub fn rank(&self, pos: usize) -> usize {
        assert!(pos != 0, "rank positions are 1-based");
        if pos > self.len || self.ones == 0 {
            return self.ones;
        }
        let bit = pos - 1;
        match &self.index {
            SlateIndex::Frozen(index) => index.rank(&self.words, bit),
            SlateIndex::Mutable { counts } => {
                let word = bit / BLOCK_BITS;
                let slate = word / self.slate_blocks;
                let mut rank: usize = (1..=slate).map(|s| counts.get(s) as usize).sum();
                rank += self.words[slate * self.slate_blocks..word]
                    .iter()
                    .map(|w| w.count_ones() as usize)
                    .sum::<usize>();
                let offset = bit % BLOCK_BITS;
                if offset > 0 {
                    rank += (self.words[word] & low_mask(offset)).count_ones() as usize;
                }
                rank
            }
        }
    }

    /// Position of the set bit with 0-based rank `k`, or `0` if `k >= ones`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn select(&self, k: usize) -> usize {
        if k >= self.ones {
            return 0;
        }
        match &self.index {
            SlateIndex::Frozen(index) => index.select(&self.words, k).map_or(0, |bit| bit + 1),
            SlateIndex::Mutable { counts } => {
                let mut remaining = k;
                let mut first = 0;
                for slate in 1..=self.slate_count() {
                    let count = counts.get(slate) as usize;
                    if remaining < count {
                        first = (slate - 1) * self.slate_blocks;
                        break;
                    }
                    remaining -= count;
                }
                for word in first..self.words.len() {
                    let count = self.words[word].count_ones() as usize;
                    if remaining < count {
                        return word * BLOCK_BITS + select_in_word(self.words[word], remaining as u32) + 1;
                    }
                    remaining -= count;
                }
                0
            }
        }
    }

    /// First set bit at or after `pos`, or `0` if there is none. Position
    /// `0` searches from the start.
    pub fn next_one(&self, pos: usize) -> usize {
        if pos > self.len || self.ones == 0 {
            return 0;
        }
        let pos = pos.max(1);
        let counts = match &self.index {
            SlateIndex::Frozen(_) => return self.select(self.rank(pos)),
            SlateIndex::Mutable { counts } => counts,
        };
        let mut word = (pos - 1) / BLOCK_BITS;
        let mut bits = self.words[word] & (u64::MAX << ((pos - 1) % BLOCK_BITS));
        loop {
            if bits != 0 {
                return word * BLOCK_BITS + bits.trailing_zeros() as usize + 1;
            }
            word += 1;
            if word >= self.words.len() {
                return 0;
            }
            if word % self.slate_blocks == 0 {
                while counts.get(self.slate_of_word(word)) == 0 {
                    word += self.slate_blocks;
                    if word >= self.words.len() {
                        return 0;
                    }
                }
            }
            bits = self.words[word];
        }
    }

    /// Number of set bits in the `width`-bit fields before field `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `0` or `width` is invalid.
    pub fn rank_n(&self, pos: usize, width: usize) -> usize {
        self.check_width(width);
        assert!(pos != 0, "rank positions are 1-based");
        self.rank((pos - 1).saturating_mul(width).saturating_add(1))
    }

    /// Index of the `width`-bit field holding the set bit of 0-based rank
    /// `k`, or `0` if there is none.
    ///
    /// # Panics
    ///
    /// Panics if `width` is invalid.
    pub fn select_n(&self, k: usize, width: usize) -> usize {
        self.check_width(width);
        self.select(k).div_ceil(width)
    }

    /// First `width`-bit field at or after field `pos` that is nonzero, or
    /// `0` if there is none.
    ///
    /// # Panics
    ///
    /// Panics if `width` is invalid.
    pub fn next_one_n(&self, pos: usize, width: usize) -> usize {
        self.check_width(width);
        let start = pos.saturating_sub(1).saturating_mul(width).saturating_add(1);
        self.next_one(start).div_ceil(width)
    }
}

impl fmt::Debug for RankSelectBitvec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankSelectBitvec")
            .field("len", &self.len)
            .field("ones", &self.ones)
            .field("slate_blocks", &self.slate_blocks)
            .field("static", &self.is_static())
            .finish()
    }
}
