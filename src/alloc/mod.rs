//! Zero-initialized backing storage.
//!
//! Every succinct structure in this crate sits on a [`ZeroedRegion`]: a flat
//! buffer whose untouched elements read as zero without any initialization
//! pass. Big regions are mapped directly from the OS (`mmap` / `VirtualAlloc`)
//! so their cost is paid per page actually touched.

pub mod error;
pub mod page;
pub mod region;
mod syscall;

pub use error::AllocError;
pub use region::ZeroedRegion;
