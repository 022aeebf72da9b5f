//! # mallocator - an explicit free-list allocator with boundary tags
//!
//! This crate provides a single-threaded, `sbrk`-backed dynamic memory
//! allocator. It sits between a client (a `malloc`/`free`-style façade) and
//! the page-grant primitive that can only extend the heap by appending bytes
//! at its tail.
//!
//! ## Design
//!
//! Each block on the heap is bracketed by a boundary tag — a header and a
//! footer word that both pack `(size, allocated_bit)`:
//!
//! ```text
//!   Allocated block:                    Free block:
//!   ┌────────┬───────────────┬────────┐ ┌────────┬──────┬──────┬───┬────────┐
//!   │ header │    payload    │ footer │ │ header │ prev │ next │...│ footer │
//!   └────────┴───────────────┴────────┘ └────────┴──────┴──────┴───┴────────┘
//!    4 bytes     size-8 bytes  4 bytes   4 bytes  4 B    4 B        4 bytes
//! ```
//!
//! Free blocks additionally thread the first two payload words into a
//! doubly-linked, LIFO free-list (`prev_free`/`next_free`), so that
//! allocation can scan only free blocks instead of the whole heap.
//! Permanently-allocated prologue and epilogue sentinels bracket the heap so
//! every "previous block" / "next block" probe in the coalescer and checker
//! is well-defined without special-casing the ends of the heap.
//!
//! ```text
//!   Heap layout:
//!
//!   ┌──────┬────────────┬──────┬──────────────────────┬──────────┐
//!   │ pad  │  prologue  │ ...real blocks...           │ epilogue │
//!   │ 4 B  │ hdr+ftr 8B │                              │ hdr 4B   │
//!   └──────┴────────────┴──────────────────────────────┴──────────┘
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   mallocator
//!   ├── align      - fixed-width constants + the align_up! macro
//!   ├── block      - boundary-tag codec: pack/unpack, header/footer/next/prev
//!   ├── pagegrant  - the sbrk-backed page-grant primitive
//!   ├── heap       - bootstrap + growth (impl Allocator)
//!   ├── freelist   - the doubly-linked free-list (impl Allocator)
//!   ├── coalesce   - the four-case coalescer (impl Allocator)
//!   ├── place      - split-or-consume placement (impl Allocator)
//!   ├── alloc      - alloc/free/realloc front doors (impl Allocator)
//!   └── check      - the six-audit heap checker (impl Allocator)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mallocator::Allocator;
//!
//! let mut heap = Allocator::new();
//! heap.init().expect("page-grant primitive refused initial growth");
//!
//! unsafe {
//!     let p = heap.alloc(64) as *mut u64;
//!     assert!(!p.is_null());
//!     *p = 42;
//!     assert_eq!(*p, 42);
//!     heap.free(p as *mut u8);
//! }
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives; concurrent
//!   entry into one `Allocator` from multiple threads is undefined.
//! - **Grow-only heap**: pages are never returned to the OS individually.
//! - **First-fit only**: no segregated size classes, best-fit, or next-fit.
//! - **Unix-only**: requires `libc` and `sbrk` (POSIX systems).
//!
//! ## Safety
//!
//! This crate is inherently unsafe as it deals with raw memory management.
//! `alloc` and `check` are safe to call directly; `free` and `realloc` are
//! `unsafe fn` because they trust the caller's pointer provenance, exactly
//! as `libc::free`/`realloc` do.

pub mod align;
mod alloc;
mod block;
mod check;
mod coalesce;
mod freelist;
mod heap;
mod pagegrant;
mod place;

use std::fmt;
use std::ptr;

/// Owns one independent heap's bootstrap state: the payload pointer of the
/// prologue block, the head of the free-list, and the header pointer of the
/// current epilogue.
///
/// Per the design note on global mutable state, these three values are
/// instance fields rather than process-wide statics, so more than one
/// `Allocator` can coexist in a process (each still grows the same real OS
/// heap via `sbrk`, but never dereferences an address it didn't itself
/// obtain). No `Send`/`Sync` impls are provided: sharing an `Allocator`
/// across threads is a compile error, not a silent race.
pub struct Allocator {
  pub(crate) heap_base: *mut u8,
  pub(crate) free_list_head: *mut u8,
  pub(crate) epilogue_ptr: *mut u8,
  chunk_size: usize,
}

impl Allocator {
  /// Creates an uninitialized allocator. Call [`Allocator::init`] before
  /// using it; every other method is a no-op or (for `alloc`) returns null
  /// until then.
  pub fn new() -> Self {
    Self {
      heap_base: ptr::null_mut(),
      free_list_head: ptr::null_mut(),
      epilogue_ptr: ptr::null_mut(),
      chunk_size: align::CHUNK,
    }
  }

  /// Creates an uninitialized allocator with a custom growth granularity,
  /// in place of the default [`CHUNK`](align::CHUNK). Useful in tests that
  /// want to exercise growth-on-miss or exhaustion paths without allocating
  /// megabytes of real `sbrk` memory.
  pub fn with_chunk_size(chunk_size: usize) -> Self {
    Self {
      chunk_size: crate::align_up!(chunk_size),
      ..Self::new()
    }
  }
}

impl Default for Allocator {
  fn default() -> Self {
    Self::new()
  }
}

/// Errors surfaced by the one real fallibility boundary in this crate: the
/// page-grant primitive refusing to extend the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// The page-grant primitive (`sbrk`) refused to grow the heap further.
  Exhausted,
}

impl fmt::Display for AllocError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AllocError::Exhausted => write!(f, "page-grant primitive refused to extend the heap"),
    }
  }
}

impl std::error::Error for AllocError {}
