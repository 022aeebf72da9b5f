//! Boundary-tag codec (C1): pack/unpack `(size, allocated)` into header and
//! footer words, and navigate between adjacent blocks.
//!
//! Every function here is a pure address computation over an already-valid
//! heap; none of them allocate, grow the heap, or touch the free-list. They
//! assume invariants 1-3 already hold (contiguous heap, header == footer,
//! size is a multiple of 8 and at least [`MIN_BLOCK`](crate::align::MIN_BLOCK)).
//! Like the donor crate's own alignment arithmetic, addresses are moved
//! around as plain `usize` and cast back to `*mut u8` at the point of use,
//! rather than through `ptr::add`/`ptr::sub`, since this heap is raw `sbrk`
//! memory rather than a single Rust-allocator-owned object.

use std::ptr;

use crate::align::{DSIZE, WSIZE};

/// Packs a block size and allocated-bit into a single header/footer word.
///
/// `size` must already be a multiple of 8; `alloc` must be 0 or 1.
pub fn pack(size: u32, alloc: u32) -> u32 {
  size | alloc
}

/// Extracts the size field from a packed header/footer word.
pub fn get_size(word: u32) -> u32 {
  word & !0x7
}

/// Extracts the allocated-bit from a packed header/footer word.
pub fn get_alloc(word: u32) -> u32 {
  word & 0x1
}

/// Reads the `u32` at `p`.
///
/// # Safety
/// `p` must be valid for reads of 4 bytes and properly aligned.
pub unsafe fn get(p: *mut u8) -> u32 {
  unsafe { ptr::read(p as *mut u32) }
}

/// Writes `val` as a `u32` at `p`.
///
/// # Safety
/// `p` must be valid for writes of 4 bytes and properly aligned.
pub unsafe fn put(p: *mut u8, val: u32) {
  unsafe { ptr::write(p as *mut u32, val) }
}

/// Address of `bp`'s header word, given its payload pointer.
///
/// # Safety
/// `bp` must point 4 bytes past a valid block header.
pub unsafe fn header(bp: *mut u8) -> *mut u8 {
  (bp as usize - WSIZE) as *mut u8
}

/// Address of `bp`'s footer word, given its payload pointer.
///
/// # Safety
/// `bp`'s header must already hold a valid packed size.
pub unsafe fn footer(bp: *mut u8) -> *mut u8 {
  unsafe {
    let size = get_size(get(header(bp))) as usize;
    (bp as usize + size - DSIZE) as *mut u8
  }
}

/// Payload pointer of the block immediately following `bp`.
///
/// # Safety
/// `bp`'s header must hold a valid packed size, and the block it addresses
/// must not be the epilogue (size 0 would make this a no-op step).
pub unsafe fn next_block(bp: *mut u8) -> *mut u8 {
  unsafe {
    let size = get_size(get(header(bp))) as usize;
    (bp as usize + size) as *mut u8
  }
}

/// Payload pointer of the block immediately preceding `bp`, found by reading
/// the previous block's footer.
///
/// # Safety
/// The DSIZE bytes before `bp` must hold a valid previous-block footer word
/// (guaranteed for any real block by the prologue sentinel).
pub unsafe fn prev_block(bp: *mut u8) -> *mut u8 {
  unsafe {
    let prev_size = get_size(get((bp as usize - DSIZE) as *mut u8)) as usize;
    (bp as usize - prev_size) as *mut u8
  }
}
