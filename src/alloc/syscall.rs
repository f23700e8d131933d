//! Anonymous page mappings. Fresh mappings are zero-filled by the OS and
//! only become resident when first written.

use core::ptr::{self, NonNull};

use crate::alloc::error::AllocError;
use crate::alloc::page::{align_up, PAGE_SIZE};

/// Maps `size` bytes (rounded up to whole pages) of zeroed memory.
///
/// # Errors
/// Returns `AllocError` if `size` is zero or the mapping is refused.
#[cfg(unix)]
pub fn map_zeroed(size: usize) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
        return Err(AllocError);
    }
    let size = align_up(size, PAGE_SIZE);
    // SAFETY: anonymous private mapping with no address hint; the result is
    // checked against MAP_FAILED before use.
    let raw = unsafe {
        libc::mmap(
            ptr::null_mut(),
            size,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANON,
            -1,
            0,
        )
    };
    if raw == libc::MAP_FAILED {
        Err(AllocError)
    } else {
        NonNull::new(raw.cast::<u8>()).ok_or(AllocError)
    }
}

/// Releases a mapping obtained from [`map_zeroed`].
///
/// # Safety
/// `ptr` and `size` must be exactly the pointer and requested size of a live
/// mapping returned by [`map_zeroed`].
#[cfg(unix)]
pub unsafe fn unmap(ptr: NonNull<u8>, size: usize) {
    let size = align_up(size, PAGE_SIZE);
    libc::munmap(ptr.as_ptr().cast::<libc::c_void>(), size);
}

/// Maps `size` bytes (rounded up to whole pages) of zeroed memory.
///
/// # Errors
/// Returns `AllocError` if `size` is zero or the mapping is refused.
#[cfg(windows)]
pub fn map_zeroed(size: usize) -> Result<NonNull<u8>, AllocError> {
    use windows_sys::Win32::System::Memory::{VirtualAlloc, MEM_COMMIT, MEM_RESERVE, PAGE_READWRITE};
    if size == 0 {
        return Err(AllocError);
    }
    let size = align_up(size, PAGE_SIZE);
    // SAFETY: fresh reservation with no address hint; checked for null.
    let raw = unsafe { VirtualAlloc(ptr::null(), size, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE) };
    NonNull::new(raw.cast::<u8>()).ok_or(AllocError)
}

/// Releases a mapping obtained from [`map_zeroed`].
///
/// # Safety
/// `ptr` must be a live mapping returned by [`map_zeroed`].
#[cfg(windows)]
pub unsafe fn unmap(ptr: NonNull<u8>, _size: usize) {
    use windows_sys::Win32::System::Memory::{VirtualFree, MEM_RELEASE};
    VirtualFree(ptr.as_ptr().cast::<core::ffi::c_void>(), 0, MEM_RELEASE);
}
