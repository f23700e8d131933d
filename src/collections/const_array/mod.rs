//! Arrays with constant-time initialization.
//!
//! [`ConstTimeArray`] hands out a default for every slot that was never
//! written without ever touching the slots: values are appended to an arena
//! in first-write order and two index tables (position → slot and
//! slot → position) certify whether a position owns a slot. The tables live
//! in [`ZeroedRegion`]s and use the narrowest unsigned width able to address
//! the capacity.
//!
//! Boolean and fixed-width integer elements are stored bit-packed in a
//! [`RankSelectBitvec`](crate::collections::RankSelectBitvec) instead, see
//! [`BoolArray`] and [`PackedArray`].

mod packed;


use num_traits::{NumCast, PrimInt};
use zerocopy::FromZeroes;

use crate::alloc::ZeroedRegion;

pub use packed::{BoolArray, PackedArray};

#[derive(Clone, Debug)]
struct SlotTables<I: FromZeroes + Copy> {
    slot_of: ZeroedRegion<I>,
    pos_of: ZeroedRegion<I>,
}

impl<I: PrimInt + FromZeroes> SlotTables<I> {
    fn new(len: usize) -> Self {
        Self {
            slot_of: ZeroedRegion::new(len),
            pos_of: ZeroedRegion::new(len),
        }
    }

    /// Slot owned by 0-based `pos`, given that `used` slots are live.
    #[inline]
    fn lookup(&self, pos: usize, used: usize) -> Option<usize> {
        let slot = self.slot_of[pos].to_usize()?;
        (slot < used && self.pos_of[slot].to_usize() == Some(pos)).then_some(slot)
    }

    #[inline]
    fn bind(&mut self, pos: usize, slot: usize) {
        let (Some(slot_index), Some(pos_index)) = (<I as NumCast>::from(slot), <I as NumCast>::from(pos)) else {
            unreachable!("index table too narrow for position {pos}");
        };
        self.slot_of[pos] = slot_index;
        self.pos_of[slot] = pos_index;
    }
}

#[derive(Clone, Debug)]
enum SlotIndex {
    U8(SlotTables<u8>),
    U16(SlotTables<u16>),
    U32(SlotTables<u32>),
    U64(SlotTables<u64>),
}

macro_rules! with_tables {
    ($index:expr, $tables:ident => $body:expr) => {
        match $index {
            SlotIndex::U8($tables) => $body,
            SlotIndex::U16($tables) => $body,
            SlotIndex::U32($tables) => $body,
            SlotIndex::U64($tables) => $body,
        }
    };
}

impl SlotIndex {
    fn new(len: usize) -> Self {
        let widest = len.saturating_sub(1);
        if u8::try_from(widest).is_ok() {
            SlotIndex::U8(SlotTables::new(len))
        } else if u16::try_from(widest).is_ok() {
            SlotIndex::U16(SlotTables::new(len))
        } else if u32::try_from(widest).is_ok() {
            SlotIndex::U32(SlotTables::new(len))
        } else {
            SlotIndex::U64(SlotTables::new(len))
        }
    }

    fn width_bits(&self) -> u32 {
        match self {
            SlotIndex::U8(_) => u8::BITS,
            SlotIndex::U16(_) => u16::BITS,
            SlotIndex::U32(_) => u32::BITS,
            SlotIndex::U64(_) => u64::BITS,
        }
    }
}

/// A fixed-capacity array whose unwritten positions read as a default
/// value, created in O(1) regardless of capacity.
///
/// Positions are 1-based. The element type must be a plain `Copy` value.
///
/// ### Performance Characteristics
/// | Operation | Complexity |
/// |-----------|------------|
/// | `new` | \(O(1)\) amortized |
/// | `get` / `is_init` | \(O(1)\) |
/// | `set` / `get_mut` | \(O(1)\) amortized |
/// | `reset` | \(O(1)\) |
#[derive(Clone, Debug)]
pub struct ConstTimeArray<T: Copy> {
    values: Vec<T>,
    index: SlotIndex,
    default: T,
    len: usize,
}

impl<T: Copy> ConstTimeArray<T> {
    /// Creates an array of `len` positions that all read as `default`.
    pub fn new(len: usize, default: T) -> Self {
        Self {
            values: Vec::with_capacity(len),
            index: SlotIndex::new(len),
            default,
            len,
        }
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array has no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The value read from unwritten positions.
    #[inline]
    pub fn default_value(&self) -> T {
        self.default
    }

    /// Number of positions written since creation or the last reset.
    #[inline]
    pub fn initialized(&self) -> usize {
        self.values.len()
    }

    /// Bit width of the index tables chosen for this capacity.
    pub fn index_width(&self) -> u32 {
        self.index.width_bits()
    }

    #[inline]
    fn slot(&self, pos: usize) -> Option<usize> {
        if pos == 0 || pos > self.len {
            return None;
        }
        let used = self.values.len();
        with_tables!(&self.index, tables => tables.lookup(pos - 1, used))
    }

    /// Returns `true` if `pos` has been written. Never initializes.
    #[inline]
    pub fn is_init(&self, pos: usize) -> bool {
        self.slot(pos).is_some()
    }

    /// Value at `pos`, or the default if `pos` was never written or is out
    /// of range.
    #[inline]
    pub fn get(&self, pos: usize) -> T {
        self.slot(pos).map_or(self.default, |slot| self.values[slot])
    }

    /// Stores `value` at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `0` or greater than [`len`](Self::len).
    #[inline]
    pub fn set(&mut self, pos: usize, value: T) {
        *self.get_mut(pos) = value;
    }

    /// Mutable access to `pos`, initializing it with the default first if
    /// it was never written.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is `0` or greater than [`len`](Self::len).
    pub fn get_mut(&mut self, pos: usize) -> &mut T {
        assert!(
            pos != 0 && pos <= self.len,
            "position {pos} out of range 1..={}",
            self.len
        );
        let slot = match self.slot(pos) {
            Some(slot) => slot,
            None => {
                let slot = self.values.len();
                self.values.push(self.default);
                with_tables!(&mut self.index, tables => tables.bind(pos - 1, slot));
                slot
            }
        };
        &mut self.values[slot]
    }

    /// Forgets every write in O(1); all positions read as the default again.
    pub fn reset(&mut self) {
        self.values.clear();
    }
}
