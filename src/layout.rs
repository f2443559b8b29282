//! Block header layout and the raw-pointer boundary between client pointers
//! and the headers that precede them.
//!
//! Every region this allocator owns — whether carved from the heap or
//! obtained as a private anonymous mapping — begins with a [`Header`].
//! The payload immediately follows. [`header_of`]/[`payload_of`] are the
//! one narrow place where that correspondence is expressed in pointer
//! arithmetic; nothing outside this module should cast across the
//! boundary directly.

use core::mem;
use core::ptr;

use static_assertions::const_assert_eq;

/// Fixed payload/header alignment. The allocator makes no stronger guarantee.
pub(crate) const ALIGNMENT: usize = 8;

/// Default mapping threshold: total footprint above this goes to `mmap`
/// instead of the heap.
pub(crate) const MMAP_THRESHOLD: usize = 128 * 1024;

/// Size of the one-shot initial heap reservation, equal to the threshold.
pub(crate) const HEAP_PRELUDE: usize = MMAP_THRESHOLD;

/// Round `value` up to the next multiple of [`ALIGNMENT`].
#[inline]
pub(crate) const fn align8(value: usize) -> usize {
    (value + (ALIGNMENT - 1)) & !(ALIGNMENT - 1)
}

/// Where a block's memory came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub(crate) enum BlockStatus {
    Free,
    HeapAlloc,
    Mapped,
}

/// Intrusive block-metadata header. Lives at the start of every region the
/// allocator manages; the client pointer is the address immediately after it.
#[repr(C)]
#[derive(Debug)]
pub(crate) struct Header {
    /// Usable payload bytes, not counting this header.
    pub size: usize,
    pub status: BlockStatus,
    pub prev: *mut Header,
    pub next: *mut Header,
}

/// 8-aligned stride between a header's address and its payload's address.
pub(crate) const HEADER_STRIDE: usize = align8(mem::size_of::<Header>());

const_assert_eq!(HEADER_STRIDE % ALIGNMENT, 0);

/// Recover the header preceding a client pointer.
///
/// # Safety
/// `client_ptr` must be a non-null pointer previously returned by
/// [`crate::allocate`], [`crate::zalloc`], or [`crate::resize`].
#[inline]
pub(crate) unsafe fn header_of(client_ptr: *mut u8) -> *mut Header {
    client_ptr.sub(HEADER_STRIDE) as *mut Header
}

/// Compute the client pointer for a freshly prepared header.
///
/// # Safety
/// `header` must point to a valid, fully initialized [`Header`].
#[inline]
pub(crate) unsafe fn payload_of(header: *mut Header) -> *mut u8 {
    (header as *mut u8).add(HEADER_STRIDE)
}

/// Initialize a header in place. Does not touch the registry linkage beyond
/// nulling `prev`/`next`; callers splice the node in themselves.
///
/// # Safety
/// `header` must point to at least `HEADER_STRIDE` writable bytes.
#[inline]
pub(crate) unsafe fn init_header(header: *mut Header, size: usize, status: BlockStatus) {
    (*header).size = size;
    (*header).status = status;
    (*header).prev = ptr::null_mut();
    (*header).next = ptr::null_mut();
}
