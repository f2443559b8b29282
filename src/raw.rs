//! Thin wrappers around the kernel facilities this allocator consumes:
//! program-break adjustment, anonymous mapping, unmapping, and the page-size
//! query. Each wraps a sentinel-value C call in a `Result` so call sites
//! never compare raw return values against failure sentinels directly.

use std::sync::OnceLock;

use crate::errors::KernelFailure;

/// Advance the program break by `increment` bytes (never negative — this
/// allocator never shrinks the break) and return the *previous* break, i.e.
/// the address of the newly available region.
pub(crate) fn sbrk(increment: usize) -> Result<*mut u8, KernelFailure> {
    let prev = unsafe { libc::sbrk(increment as libc::intptr_t) };
    if prev as isize == -1 {
        Err(KernelFailure::BreakAdjust)
    } else {
        Ok(prev as *mut u8)
    }
}

/// Request `len` bytes, readable and writable, private, not backed by a
/// file.
pub(crate) fn map_anonymous(len: usize) -> Result<*mut u8, KernelFailure> {
    let addr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if addr == libc::MAP_FAILED {
        Err(KernelFailure::Map)
    } else {
        Ok(addr as *mut u8)
    }
}

/// Release a mapping obtained from [`map_anonymous`].
///
/// # Safety
/// `addr` must be the base of a mapping of exactly `len` bytes obtained
/// from this module, not yet unmapped.
pub(crate) unsafe fn unmap(addr: *mut u8, len: usize) -> Result<(), KernelFailure> {
    let rc = libc::munmap(addr as *mut libc::c_void, len);
    if rc == -1 {
        Err(KernelFailure::Unmap)
    } else {
        Ok(())
    }
}

/// Kernel-reported page size, queried once and cached for the process
/// lifetime (it cannot change underneath a running process).
pub(crate) fn page_size() -> usize {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(|| {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        debug_assert!(size > 0, "sysconf(_SC_PAGESIZE) returned a non-positive size");
        size as usize
    })
}
