//! Best-fit search, splitting, and end-of-heap extension.
//!
//! `acquire_heap_block` is the single entry point: it always coalesces
//! first, then tries to satisfy the request from the existing free list
//! before touching the program break at all.

use tracing::{debug, trace};

use crate::errors::KernelFailure;
use crate::layout::{BlockStatus, Header, HEADER_STRIDE};
use crate::raw;
use crate::registry::coalesce_heap_frees;
use crate::state::State;

/// Select or create a `HEAP_ALLOC` block of exactly `aligned_size` payload
/// bytes.
///
/// # Safety
/// `state.head` must be non-null (the heap prelude must already be
/// installed) and no other reference into the registry may be live.
pub(crate) unsafe fn acquire_heap_block(
    state: &mut State,
    aligned_size: usize,
) -> Result<*mut Header, KernelFailure> {
    coalesce_heap_frees(state);

    if let Some(chosen) = find_best_fit(state, aligned_size) {
        split_if_worthwhile(chosen, aligned_size);
        (*chosen).status = BlockStatus::HeapAlloc;
        trace!(block = ?chosen, aligned_size, "satisfied by best-fit search");
        return Ok(chosen);
    }

    let mut tail = state.head;
    while !(*tail).next.is_null() {
        tail = (*tail).next;
    }

    if (*tail).status == BlockStatus::Free {
        let grow = aligned_size - (*tail).size;
        raw::sbrk(grow)?;
        (*tail).size += grow;
        (*tail).status = BlockStatus::HeapAlloc;
        debug!(grow, block = ?tail, "extended trailing free block to satisfy request");
        return Ok(tail);
    }

    let base = raw::sbrk(aligned_size + HEADER_STRIDE)?;
    let fresh = base as *mut Header;
    (*fresh).size = aligned_size;
    (*fresh).status = BlockStatus::HeapAlloc;
    (*fresh).prev = tail;
    (*fresh).next = core::ptr::null_mut();
    (*tail).next = fresh;
    debug!(block = ?fresh, "extended heap with a fresh block");
    Ok(fresh)
}

/// Smallest FREE block whose size is >= `aligned_size`; ties go to the
/// first encountered in list order.
unsafe fn find_best_fit(state: &State, aligned_size: usize) -> Option<*mut Header> {
    let mut best: *mut Header = core::ptr::null_mut();
    let mut best_size = usize::MAX;
    let mut current = state.head;
    while !current.is_null() {
        if (*current).status == BlockStatus::Free
            && (*current).size >= aligned_size
            && (*current).size < best_size
        {
            best = current;
            best_size = (*current).size;
        }
        current = (*current).next;
    }
    if best.is_null() {
        None
    } else {
        Some(best)
    }
}

/// Carve a trailing FREE block out of `chosen` if the excess beyond
/// `aligned_size` is more than one header stride; otherwise leave the whole
/// block with the client.
///
/// # Safety
/// `chosen` must be a valid, currently FREE header with `size >=
/// aligned_size`.
unsafe fn split_if_worthwhile(chosen: *mut Header, aligned_size: usize) {
    let total = aligned_size + HEADER_STRIDE;
    if (*chosen).size <= total {
        return;
    }

    let remainder = (*chosen).size - total;
    let new_free = (chosen as *mut u8).add(total) as *mut Header;
    (*new_free).size = remainder;
    (*new_free).status = BlockStatus::Free;
    (*new_free).prev = chosen;
    (*new_free).next = (*chosen).next;
    if !(*chosen).next.is_null() {
        (*(*chosen).next).prev = new_free;
    }
    (*chosen).next = new_free;
    (*chosen).size = aligned_size;
}

/// Split `header` at `aligned_size` in place, used by `resize`'s in-place
/// shrink path. Shares the exact carve-a-trailing-block logic as best-fit
/// splitting; kept separate because resize's caller has already decided
/// the split is worthwhile (it compares against the resize-specific `old >
/// T` condition, not `size > total`).
///
/// # Safety
/// Same as [`split_if_worthwhile`].
pub(crate) unsafe fn split_for_resize(header: *mut Header, aligned_size: usize) {
    split_if_worthwhile(header, aligned_size);
}
