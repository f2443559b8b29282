//! The one kind of error this allocator ever surfaces internally: a kernel
//! call returned its failure sentinel.
//!
//! Client-invalid input (`allocate(0)`, freeing a free block, …) is never
//! represented as an `Err` — per contract it is non-fatal and collapses to
//! `NULL`/no-op at the call site. Only resource failure from the kernel
//! (program-break adjustment, mapping, unmapping) reaches this type, and it
//! always ends the same way: logged, then the process aborts. There is no
//! safe state to unwind to once one of these calls fails.

use tracing::error;

#[derive(Clone, Copy, Debug)]
pub(crate) enum KernelFailure {
    BreakAdjust,
    Map,
    Unmap,
}

/// Log and terminate. Never returns.
///
/// A partially failed allocator has no safe state to hand back to the
/// client, so this aborts rather than unwinding — `abort` also skips any
/// `Drop`/`atexit` glue that might otherwise touch the now-unreliable heap.
pub(crate) fn fatal(failure: KernelFailure) -> ! {
    error!(?failure, "kernel resource request failed, aborting process");
    std::process::abort();
}
