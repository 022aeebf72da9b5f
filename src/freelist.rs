//! Explicit free-list (C4): a doubly-linked, LIFO list of free blocks
//! threaded through the first two payload words of each free block.
//!
//! Links are stored as 4-byte offsets relative to [`Allocator::heap_base`]
//! rather than raw pointers (see the design note in `SPEC_FULL.md` §9), so
//! the minimum block size stays 16 bytes on 64-bit hosts. An offset of 0
//! means "no link": the prologue permanently occupies that slot, so no real
//! free block's payload can ever land there.

use crate::align::WSIZE;
use crate::block;
use crate::Allocator;

impl Allocator {
  /// Converts an absolute payload pointer to a heap-relative offset.
  ///
  /// # Safety
  /// `bp` must lie within this allocator's heap (or be null, which maps to 0).
  unsafe fn offset_of(&self, bp: *mut u8) -> u32 {
    if bp.is_null() {
      return 0;
    }
    (bp as usize - self.heap_base as usize) as u32
  }

  /// Converts a heap-relative offset back to an absolute payload pointer.
  /// An offset of 0 maps to null.
  ///
  /// # Safety
  /// `self.heap_base` must be initialized.
  unsafe fn ptr_at_offset(&self, off: u32) -> *mut u8 {
    if off == 0 {
      std::ptr::null_mut()
    } else {
      (self.heap_base as usize + off as usize) as *mut u8
    }
  }

  /// Reads the `prev_free` link word out of a free block's payload.
  ///
  /// # Safety
  /// `bp` must point to a free block's payload.
  pub(crate) unsafe fn prev_free(&self, bp: *mut u8) -> *mut u8 {
    unsafe {
      let off = block::get(bp);
      self.ptr_at_offset(off)
    }
  }

  /// Reads the `next_free` link word out of a free block's payload.
  ///
  /// # Safety
  /// `bp` must point to a free block's payload.
  pub(crate) unsafe fn next_free(&self, bp: *mut u8) -> *mut u8 {
    unsafe {
      let off = block::get((bp as usize + WSIZE) as *mut u8);
      self.ptr_at_offset(off)
    }
  }

  /// Writes the `prev_free` link word of a free block's payload.
  ///
  /// # Safety
  /// `bp` must point to a free block's payload with room for two link words.
  unsafe fn set_prev_free(&self, bp: *mut u8, val: *mut u8) {
    unsafe {
      let off = self.offset_of(val);
      block::put(bp, off);
    }
  }

  /// Writes the `next_free` link word of a free block's payload.
  ///
  /// # Safety
  /// `bp` must point to a free block's payload with room for two link words.
  unsafe fn set_next_free(&self, bp: *mut u8, val: *mut u8) {
    unsafe {
      let off = self.offset_of(val);
      block::put((bp as usize + WSIZE) as *mut u8, off);
    }
  }

  /// Inserts `bp` at the head of the free-list (LIFO).
  ///
  /// # Safety
  /// `bp` must point to a free block's payload not already in the list.
  pub(crate) unsafe fn list_add(&mut self, bp: *mut u8) {
    unsafe {
      if self.free_list_head.is_null() {
        self.set_prev_free(bp, std::ptr::null_mut());
        self.set_next_free(bp, std::ptr::null_mut());
      } else {
        self.set_prev_free(self.free_list_head, bp);
        self.set_prev_free(bp, std::ptr::null_mut());
        self.set_next_free(bp, self.free_list_head);
      }
      self.free_list_head = bp;
    }
  }

  /// Removes `bp` from the free-list, splicing its neighbors together.
  ///
  /// # Safety
  /// `bp` must currently be a member of this allocator's free-list.
  pub(crate) unsafe fn list_remove(&mut self, bp: *mut u8) {
    unsafe {
      let prev = self.prev_free(bp);
      let next = self.next_free(bp);

      match (prev.is_null(), next.is_null()) {
        (true, true) => {
          self.free_list_head = std::ptr::null_mut();
        }
        (true, false) => {
          self.free_list_head = next;
          self.set_prev_free(next, std::ptr::null_mut());
        }
        (false, true) => {
          self.set_next_free(prev, std::ptr::null_mut());
        }
        (false, false) => {
          self.set_next_free(prev, next);
          self.set_prev_free(next, prev);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::Allocator;

  #[test]
  fn freed_block_is_reused_by_next_alloc_of_same_size() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    let p = a.alloc(16);
    assert!(!p.is_null());
    unsafe { a.free(p) };
    assert!(!a.free_list_head.is_null());

    let q = a.alloc(16);
    assert_eq!(p, q);
  }

  #[test]
  fn lifo_order_head_is_most_recently_freed() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    let x = a.alloc(16);
    let y = a.alloc(16);
    unsafe {
      a.free(x);
      a.free(y);
    }

    // y was freed last, so it should be handed back first.
    let reused = a.alloc(16);
    assert_eq!(reused, y);
  }
}
