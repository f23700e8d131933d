//! Succinct containers.
//!
//! Everything here is 1-based with `0` as the "none" sentinel, and built so
//! that creating a structure costs O(1) amortized regardless of its
//! capacity:
//!
//! - [`RankSelectBitvec`]: bitvector with rank/select and a frozen form.
//! - [`ConstTimeArray`], [`BoolArray`], [`PackedArray`]: arrays whose
//!   unwritten slots read as a default.
//! - [`SegmentedArray`]: parallel fields over variable-length segments.
//! - [`ChoiceDictionary`]: integer set with arbitrary-element extraction.
//! - [`SpinStack`]: bounded ring-buffer stack.

pub mod bitvec;
pub mod choice;
pub mod const_array;
pub mod segmented;
pub mod spin_stack;

pub use bitvec::{Rank9Index, RankSelectBitvec};
pub use choice::ChoiceDictionary;
pub use const_array::{BoolArray, ConstTimeArray, PackedArray};
pub use segmented::{Field, FieldSet, OnesIndex, SegmentLayout, SegmentedArray};
pub use spin_stack::SpinStack;
