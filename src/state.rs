//! Process-wide mutable state: the registry head, the first-heap-allocation
//! latch, and the effective mapping threshold.
//!
//! The contract forbids concurrent access (§ single-threaded use only), so
//! this is modeled as one statically allocated value rather than three
//! independent globals or anything synchronized — a `Mutex` here would
//! imply a concurrency story this allocator deliberately does not have.

use core::ptr;

use crate::layout::{Header, MMAP_THRESHOLD};

pub(crate) struct State {
    /// Head of the address-ordered registry. Null until the first
    /// heap-path allocation seeds it (or after a mapping-backed block is
    /// freed — see the registry-wipe disposition in `registry.rs`).
    pub head: *mut Header,
    pub first_heap_alloc_done: bool,
    /// `MMAP_THRESHOLD` outside `zalloc`, the kernel page size during it.
    pub effective_threshold: usize,
}

impl State {
    const fn new() -> Self {
        State {
            head: ptr::null_mut(),
            first_heap_alloc_done: false,
            effective_threshold: MMAP_THRESHOLD,
        }
    }
}

static mut STATE: State = State::new();

/// Access the single process-wide allocator state.
///
/// # Safety
/// Callers must uphold the allocator's single-threaded contract: no two
/// calls into this crate may run concurrently.
#[inline]
pub(crate) unsafe fn state() -> &'static mut State {
    &mut *ptr::addr_of_mut!(STATE)
}
