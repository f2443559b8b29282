//! A single-threaded, general-purpose dynamic memory allocator backed
//! directly by the kernel: small requests are served from a program-break
//! heap, large ones from private anonymous mappings.
//!
//! Four entry points cover the whole client surface: [`allocate`],
//! [`free`], [`zalloc`], and [`resize`]. Internally, allocations whose
//! aligned footprint is at most 128 KiB are served from an address-ordered
//! intrusive list of block headers using best-fit search with splitting,
//! lazy coalescing, and end-of-heap extension; larger requests go straight
//! to `mmap`.
//!
//! This allocator assumes exclusive single-threaded use — there is no
//! cross-thread synchronization, no per-size-class caching, and heap memory
//! is never returned to the kernel. See each module for the policy that
//! governs it.

mod alloc;
mod errors;
mod global;
mod layout;
mod policy;
mod raw;
mod registry;
mod state;

pub use alloc::{allocate, free, resize, zalloc};
pub use global::AllocatorHandle;
