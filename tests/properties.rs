//! Universal invariants and boundary behaviors from this allocator's
//! design notes (§ testable properties), as independent `#[test]` fns.
//!
//! Unlike `scenarios.rs`, none of these depend on being the first call into
//! the allocator — they hold regardless of what state earlier calls left
//! behind. They still share one process (and so one registry) with each
//! other, and the allocator has no internal synchronization, so every test
//! here serializes behind `GLOBAL_LOCK` before touching the allocator —
//! the same guard pattern used for other single-threaded allocators under
//! test in this corpus.

use std::sync::Mutex;

use umalloc::{allocate, free, resize, zalloc};

static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn allocate_zero_returns_null() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    assert!(allocate(0).is_null());
}

#[test]
fn pointers_are_always_8_aligned() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    // Heap-path sizes only. A mapping-backed size (anything whose aligned
    // footprint exceeds MMAP_THRESHOLD) is deliberately excluded here: its
    // `free` resets the registry head to null (the preserved registry-wipe
    // behavior — see DESIGN.md), which would null-deref the very next
    // heap-path `allocate` in this shared-state binary. See `mapping.rs`
    // for that coverage, isolated in its own test binary.
    for size in [1usize, 7, 8, 9, 63, 64, 65, 4096] {
        let ptr = allocate(size);
        assert!(!ptr.is_null());
        assert_eq!(ptr as usize % 8, 0, "size {size} produced a misaligned pointer");
        unsafe { free(ptr) };
    }
}

#[test]
fn footprint_exactly_at_threshold_takes_the_heap_path() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    // A request whose aligned total footprint equals exactly the mapping
    // threshold must still be serviceable on the heap path — the routing
    // comparison is a strict `>`. 131040 aligns to itself and its total
    // footprint (131040 + 32-byte header) lands on exactly 131072, the
    // default MMAP_THRESHOLD, so this pins the boundary the comparison is
    // actually testing rather than a request that merely comes close.
    let ptr = allocate(131_040);
    assert!(!ptr.is_null());
    unsafe { free(ptr) };
}

#[test]
fn zalloc_zero_fills_the_requested_region() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let count = 16usize;
    let unit = 37usize;
    let ptr = zalloc(count, unit);
    assert!(!ptr.is_null());
    let region = unsafe { std::slice::from_raw_parts(ptr, count * unit) };
    assert!(region.iter().all(|&b| b == 0));
    unsafe { free(ptr) };
}

#[test]
fn zalloc_with_a_zero_factor_returns_null() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    assert!(zalloc(0, 16).is_null());
    assert!(zalloc(16, 0).is_null());
}

#[test]
fn zalloc_overflowing_product_returns_null() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    assert!(zalloc(usize::MAX, 2).is_null());
}

#[test]
fn zalloc_restores_the_default_threshold_afterwards() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    // A tiny zalloc lowers the effective threshold to the page size for
    // its own duration; once it returns, a heap-sized request right after
    // it must still take the heap path rather than being routed to mmap.
    let small = zalloc(1, 16);
    assert!(!small.is_null());
    unsafe { free(small) };

    let after = allocate(4096);
    assert!(!after.is_null());
    unsafe { free(after) };
}

#[test]
fn resize_null_behaves_like_allocate() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let ptr = unsafe { resize(std::ptr::null_mut(), 128) };
    assert!(!ptr.is_null());
    assert_eq!(ptr as usize % 8, 0);
    unsafe { free(ptr) };
}

#[test]
fn resize_to_zero_frees_and_returns_null() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let ptr = allocate(64);
    assert!(!ptr.is_null());
    let result = unsafe { resize(ptr, 0) };
    assert!(result.is_null());
}

#[test]
fn resize_to_current_size_is_a_no_op() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let ptr = allocate(96);
    assert!(!ptr.is_null());
    let same = unsafe { resize(ptr, 96) };
    assert_eq!(same, ptr);
    unsafe { free(same) };
}

#[test]
fn freeing_then_reallocating_the_same_size_reuses_the_block() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let ptr = allocate(256);
    assert!(!ptr.is_null());
    unsafe { free(ptr) };
    let reused = allocate(256);
    assert_eq!(reused, ptr, "a freed block of the exact requested size should be reused as-is");
    unsafe { free(reused) };
}

#[test]
fn double_free_is_a_silent_no_op() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let ptr = allocate(32);
    assert!(!ptr.is_null());
    unsafe {
        free(ptr);
        free(ptr);
    }
}

#[test]
fn resizing_an_already_freed_block_returns_null_without_crashing() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let ptr = allocate(48);
    assert!(!ptr.is_null());
    unsafe { free(ptr) };
    let result = unsafe { resize(ptr, 96) };
    assert!(result.is_null());
}

#[test]
fn free_of_null_is_a_no_op() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    unsafe { free(std::ptr::null_mut()) };
}

#[test]
fn alternating_free_order_still_coalesces_into_one_block() {
    let _guard = GLOBAL_LOCK.lock().unwrap();
    let count = 10;
    let unit = 64usize;
    let mut ptrs = vec![std::ptr::null_mut(); count];

    for slot in ptrs.iter_mut() {
        *slot = allocate(unit);
        assert!(!slot.is_null());
    }

    // Free the even slots first, then the odd ones, so coalescing has to
    // stitch together holes that did not arrive in list order.
    for i in (0..count).step_by(2) {
        unsafe { free(ptrs[i]) };
    }
    for i in (1..count).step_by(2) {
        unsafe { free(ptrs[i]) };
    }

    let merged = allocate(count * unit);
    assert!(!merged.is_null(), "fully freed neighbors should coalesce into one satisfying block");
    unsafe { free(merged) };
}
