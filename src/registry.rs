//! The address-ordered doubly linked list of block headers and the
//! coalescing pass over it.
//!
//! Every node lives inside memory the allocator itself owns (heap-extended
//! or mapped); this is an intrusive list threaded through raw headers, not
//! a general-purpose linked-list type that would insist on owning node
//! storage itself.

use crate::layout::{BlockStatus, Header, HEADER_STRIDE};
use crate::state::State;

/// Append a mapping-backed block at the tail of the registry, or seed the
/// list if it is empty. Mapping-backed blocks never participate in
/// coalescing or best-fit search; this is the only place one is attached.
///
/// # Safety
/// `header` must point to a fully initialized, currently unlinked [`Header`]
/// whose `status` is [`BlockStatus::Mapped`].
pub(crate) unsafe fn append_mapping(state: &mut State, header: *mut Header) {
    if state.head.is_null() {
        state.head = header;
        return;
    }

    let mut last = state.head;
    while !(*last).next.is_null() {
        last = (*last).next;
    }
    (*last).next = header;
    (*header).prev = last;
}

/// Merge every run of list-adjacent FREE heap blocks into one.
///
/// Walks front-to-back; a successful merge does not advance, so a run of
/// three or more free blocks collapses in a single pass. Mapping-backed
/// entries interrupt physical adjacency but are never themselves FREE, so
/// the walk simply steps over them without merging.
///
/// # Safety
/// Must only be called while no other reference into the registry is live.
pub(crate) unsafe fn coalesce_heap_frees(state: &mut State) {
    let mut current = state.head;
    while !current.is_null() && !(*current).next.is_null() {
        let next = (*current).next;
        if (*current).status == BlockStatus::Free && (*next).status == BlockStatus::Free {
            (*current).size += (*next).size + HEADER_STRIDE;
            (*current).next = (*next).next;
            if !(*next).next.is_null() {
                (*(*next).next).prev = current;
            }
        } else {
            current = next;
        }
    }
}
