//! Lazily zeroed flat buffers.

use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

use zerocopy::FromZeroes;

use crate::alloc::page::{MAP_THRESHOLD, PAGE_SIZE};
use crate::alloc::syscall;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Backing {
    Empty,
    Heap,
    Mapped,
}

/// A fixed-length buffer of plain values whose every element starts out as
/// the all-zero bit pattern.
///
/// Large regions are anonymous page mappings: allocation is O(1) and pages
/// only become resident once written, which is what lets the succinct
/// structures built on top promise constant-time initialization. Small
/// regions come from the global allocator via `alloc_zeroed`.
///
/// The element type must be valid when zeroed (`FromZeroes`) and carry no
/// destructor (`Copy`).
pub struct ZeroedRegion<T: FromZeroes + Copy> {
    ptr: NonNull<T>,
    len: usize,
    backing: Backing,
    _owns: PhantomData<T>,
}

// SAFETY: the region uniquely owns its buffer, like `Box<[T]>`.
unsafe impl<T: FromZeroes + Copy + Send> Send for ZeroedRegion<T> {}
// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: FromZeroes + Copy + Sync> Sync for ZeroedRegion<T> {}

impl<T: FromZeroes + Copy> ZeroedRegion<T> {
    /// Allocates `len` zeroed elements.
    ///
    /// Falls back to the global allocator if the page mapping is refused.
    ///
    /// # Panics
    ///
    /// Panics if the byte size of the region overflows `isize`.
    pub fn new(len: usize) -> Self {
        let Ok(layout) = Layout::array::<T>(len) else {
            panic!("capacity overflow: {len} elements");
        };
        if layout.size() == 0 {
            return Self::from_raw(NonNull::dangling(), len, Backing::Empty);
        }
        if layout.size() >= MAP_THRESHOLD && layout.align() <= PAGE_SIZE {
            if let Ok(raw) = syscall::map_zeroed(layout.size()) {
                return Self::from_raw(raw.cast::<T>(), len, Backing::Mapped);
            }
        }
        // SAFETY: the layout has a nonzero size.
        let raw = unsafe { std::alloc::alloc_zeroed(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => Self::from_raw(ptr, len, Backing::Heap),
            None => std::alloc::handle_alloc_error(layout),
        }
    }

    fn from_raw(ptr: NonNull<T>, len: usize, backing: Backing) -> Self {
        Self {
            ptr,
            len,
            backing,
            _owns: PhantomData,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the region holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the region is an anonymous page mapping.
    pub fn is_mapped(&self) -> bool {
        self.backing == Backing::Mapped
    }
}

impl<T: FromZeroes + Copy> Deref for ZeroedRegion<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        // SAFETY: `ptr` is valid for `len` elements and every element was
        // zero-initialized, which `FromZeroes` guarantees is a valid `T`.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: FromZeroes + Copy> DerefMut for ZeroedRegion<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: as in `deref`, and `&mut self` guarantees uniqueness.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: FromZeroes + Copy> Clone for ZeroedRegion<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::new(self.len);
        copy.copy_from_slice(self);
        copy
    }
}

impl<T: FromZeroes + Copy> Drop for ZeroedRegion<T> {
    fn drop(&mut self) {
        let Ok(layout) = Layout::array::<T>(self.len) else {
            return;
        };
        match self.backing {
            Backing::Empty => {}
            // SAFETY: pointer and size are those of the live mapping.
            Backing::Mapped => unsafe { syscall::unmap(self.ptr.cast::<u8>(), layout.size()) },
            // SAFETY: allocated by `alloc_zeroed` with this very layout.
            Backing::Heap => unsafe { std::alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) },
        }
    }
}

impl<T: FromZeroes + Copy> fmt::Debug for ZeroedRegion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroedRegion")
            .field("len", &self.len)
            .field("backing", &self.backing)
            .finish()
    }
}
