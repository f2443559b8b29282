//! The four client entry points: [`allocate`], [`free`], [`zalloc`], and
//! [`resize`].

use core::ptr;

use tracing::trace;

use crate::errors::fatal;
use crate::layout::{
    align8, header_of, init_header, payload_of, BlockStatus, Header, HEADER_STRIDE,
    MMAP_THRESHOLD,
};
use crate::policy::{acquire_heap_block, split_for_resize};
use crate::raw;
use crate::registry::append_mapping;
use crate::state::{state, State};

/// Request `requested` usable bytes. Returns a pointer aligned to 8 bytes,
/// or `NULL` if `requested == 0`.
///
/// Contents are unspecified — unlike [`zalloc`], this does not zero the
/// returned region.
pub fn allocate(requested: usize) -> *mut u8 {
    if requested == 0 {
        return ptr::null_mut();
    }

    let size = align8(requested);
    let total = size + HEADER_STRIDE;

    // Safety: single-threaded contract; no other call into this crate is
    // concurrently live.
    let st = unsafe { state() };

    if total > st.effective_threshold {
        return allocate_mapped(st, size, total);
    }

    if !st.first_heap_alloc_done {
        install_heap_prelude(st);
    }

    match unsafe { acquire_heap_block(st, size) } {
        Ok(header) => unsafe { payload_of(header) },
        Err(e) => fatal(e),
    }
}

fn allocate_mapped(st: &mut State, size: usize, total: usize) -> *mut u8 {
    match raw::map_anonymous(total) {
        Ok(base) => {
            let header = base as *mut Header;
            unsafe {
                init_header(header, size, BlockStatus::Mapped);
                append_mapping(st, header);
                trace!(block = ?header, total, "mapping-backed allocation");
                payload_of(header)
            }
        }
        Err(e) => fatal(e),
    }
}

fn install_heap_prelude(st: &mut State) {
    match raw::sbrk(crate::layout::HEAP_PRELUDE) {
        Ok(base) => {
            let header = base as *mut Header;
            unsafe {
                init_header(
                    header,
                    crate::layout::HEAP_PRELUDE - HEADER_STRIDE,
                    BlockStatus::Free,
                );
            }
            st.head = header;
            st.first_heap_alloc_done = true;
            trace!("installed heap prelude");
        }
        Err(e) => fatal(e),
    }
}

/// Release a block previously returned by [`allocate`], [`zalloc`], or
/// [`resize`]. `NULL` is a no-op; freeing an already-free block is a no-op
/// (no double-free detection is performed).
///
/// # Safety
/// `pointer` must be `NULL` or a pointer previously returned by one of this
/// crate's allocation functions and not already freed in a way this crate
/// could not observe.
pub unsafe fn free(pointer: *mut u8) {
    if pointer.is_null() {
        return;
    }

    let header = header_of(pointer);
    match (*header).status {
        BlockStatus::Free => {}
        BlockStatus::HeapAlloc => {
            (*header).status = BlockStatus::Free;
        }
        BlockStatus::Mapped => {
            let total = (*header).size + HEADER_STRIDE;
            match raw::unmap(header as *mut u8, total) {
                Ok(()) => {
                    // Deliberate simplification carried over from the
                    // reference implementation: freeing any mapped block
                    // resets the whole registry rather than unlinking just
                    // this node. See the registry-wipe note in this
                    // crate's design docs.
                    state().head = ptr::null_mut();
                }
                Err(e) => fatal(e),
            }
        }
    }
}

/// Allocate `count * unit` bytes and zero them. Returns `NULL` if either
/// factor is zero, or if the product overflows `usize`.
///
/// For the duration of this call the mapping threshold is lowered to the
/// kernel page size, so requests far below `MMAP_THRESHOLD` may still route
/// through `mmap` if their footprint exceeds a page.
pub fn zalloc(count: usize, unit: usize) -> *mut u8 {
    if count == 0 || unit == 0 {
        return ptr::null_mut();
    }

    let total = match count.checked_mul(unit) {
        Some(total) if total > 0 => total,
        _ => return ptr::null_mut(),
    };

    // Safety: single-threaded contract.
    unsafe { state() }.effective_threshold = raw::page_size();
    let _restore_threshold = RestoreThresholdOnDrop;

    let pointer = allocate(total);
    if pointer.is_null() {
        return pointer;
    }

    // allocate() only returns NULL for a zero-sized request (excluded
    // above) or after a fatal kernel failure (which aborts the process),
    // so reaching here with a non-null pointer is guaranteed.
    unsafe { ptr::write_bytes(pointer, 0, total) };
    pointer
}

/// Restores the effective threshold to `MMAP_THRESHOLD` when dropped,
/// guaranteeing restoration across every `zalloc` return path.
struct RestoreThresholdOnDrop;

impl Drop for RestoreThresholdOnDrop {
    fn drop(&mut self) {
        unsafe { state() }.effective_threshold = MMAP_THRESHOLD;
    }
}

/// Resize a block previously returned by [`allocate`], [`zalloc`], or
/// [`resize`] to `new_requested` bytes, preserving its contents up to the
/// smaller of the old and new sizes.
///
/// `resize(NULL, size)` behaves as `allocate(size)`; `resize(pointer, 0)`
/// frees `pointer` and returns `NULL`. Resizing an already-free block
/// returns `NULL` without side effects (non-fatal client error). Growing
/// never attempts to absorb a following free neighbor — it always
/// relocates.
///
/// # Safety
/// `pointer` must be `NULL` or a pointer previously returned by one of this
/// crate's allocation functions.
pub unsafe fn resize(pointer: *mut u8, new_requested: usize) -> *mut u8 {
    if pointer.is_null() {
        return allocate(new_requested);
    }
    if new_requested == 0 {
        free(pointer);
        return ptr::null_mut();
    }

    let header = header_of(pointer);
    if (*header).status == BlockStatus::Free {
        return ptr::null_mut();
    }

    let old = (*header).size;
    let new_size = align8(new_requested);
    let new_total = new_size + HEADER_STRIDE;

    if (*header).status == BlockStatus::Mapped || new_total >= MMAP_THRESHOLD {
        return relocate(pointer, old, new_requested);
    }

    if old == new_size {
        return pointer;
    }

    if old > new_size && old > new_total {
        split_for_resize(header, new_size);
        return pointer;
    }

    relocate(pointer, old, new_requested)
}

unsafe fn relocate(pointer: *mut u8, old_size: usize, new_requested: usize) -> *mut u8 {
    let new_pointer = allocate(new_requested);
    if new_pointer.is_null() {
        return ptr::null_mut();
    }
    let copy_len = old_size.min(new_requested);
    ptr::copy_nonoverlapping(pointer, new_pointer, copy_len);
    free(pointer);
    new_pointer
}
