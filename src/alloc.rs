//! Allocation (C7) and deallocation (C8) front doors, plus the naive
//! `realloc` contract from the external interface.

use crate::align::{DSIZE, MIN_BLOCK, WSIZE};
use crate::block;
use crate::Allocator;

impl Allocator {
  /// Allocates a block of at least `size` usable bytes.
  ///
  /// Returns null for a zero-size request (documented success, not an
  /// error) or if the heap is exhausted and the page-grant primitive
  /// refuses to grow it further.
  pub fn alloc(&mut self, size: usize) -> *mut u8 {
    if size == 0 {
      return std::ptr::null_mut();
    }

    let asize = Self::adjusted_size(size);

    unsafe {
      if let Some(bp) = self.find_fit(asize) {
        self.place(bp, asize);
        return bp;
      }

      let extend = (asize as usize).max(self.chunk_size);
      match self.grow(extend / WSIZE) {
        Ok(bp) => {
          self.place(bp, asize);
          bp
        }
        Err(_) => std::ptr::null_mut(),
      }
    }
  }

  /// Frees a block previously returned by [`Allocator::alloc`] and not yet
  /// freed. A null pointer, or an uninitialized allocator, is a no-op.
  ///
  /// # Safety
  /// `ptr` must either be null or have been returned by this allocator's
  /// `alloc`/`realloc` and not yet passed to `free`.
  pub unsafe fn free(&mut self, ptr: *mut u8) {
    if ptr.is_null() || self.heap_base.is_null() {
      return;
    }
    unsafe {
      let size = block::get_size(block::get(block::header(ptr)));
      block::put(block::header(ptr), block::pack(size, 0));
      block::put(block::footer(ptr), block::pack(size, 0));
      self.coalesce(ptr);
    }
  }

  /// Naive reallocation: allocates a new block of `size` bytes, copies
  /// `min(size, old_usable_size)` bytes from `ptr`, frees `ptr`, and returns
  /// the new pointer.
  ///
  /// `ptr == null` behaves as `alloc(size)`. `size == 0` behaves as
  /// `free(ptr)` followed by returning null.
  ///
  /// # Safety
  /// `ptr` must either be null or have been returned by this allocator and
  /// not yet freed.
  pub unsafe fn realloc(&mut self, ptr: *mut u8, size: usize) -> *mut u8 {
    if ptr.is_null() {
      return self.alloc(size);
    }
    if size == 0 {
      unsafe { self.free(ptr) };
      return std::ptr::null_mut();
    }

    unsafe {
      let old_usable = block::get_size(block::get(block::header(ptr))) as usize - DSIZE;
      let new_ptr = self.alloc(size);
      if new_ptr.is_null() {
        return std::ptr::null_mut();
      }
      let copy_len = old_usable.min(size);
      std::ptr::copy_nonoverlapping(ptr, new_ptr, copy_len);
      self.free(ptr);
      new_ptr
    }
  }

  /// Rounds a client-requested size up to the internal block size the
  /// allocator will actually reserve for it.
  fn adjusted_size(size: usize) -> u32 {
    if size <= DSIZE {
      MIN_BLOCK as u32
    } else {
      (DSIZE * ((size + DSIZE + (DSIZE - 1)) / DSIZE)) as u32
    }
  }

  /// First-fit scan of the free-list, forward from the head.
  ///
  /// # Safety
  /// The allocator must already be initialized.
  unsafe fn find_fit(&self, asize: u32) -> Option<*mut u8> {
    unsafe {
      let mut bp = self.free_list_head;
      while !bp.is_null() {
        if block::get_size(block::get(block::header(bp))) >= asize {
          return Some(bp);
        }
        bp = self.next_free(bp);
      }
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_size_request_returns_null_without_growing_heap() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");
    let before = a.epilogue_ptr;
    assert!(a.alloc(0).is_null());
    assert_eq!(a.epilogue_ptr, before);
  }

  #[test]
  fn small_requests_round_up_to_minimum_block() {
    assert_eq!(Allocator::adjusted_size(1), 16);
    assert_eq!(Allocator::adjusted_size(8), 16);
    assert_eq!(Allocator::adjusted_size(9), 24);
  }

  #[test]
  fn size_monotonicity_holds_for_adjusted_sizes() {
    let sizes = [1usize, 2, 7, 8, 9, 16, 17, 100, 4096];
    for w in sizes.windows(2) {
      assert!(Allocator::adjusted_size(w[0]) <= Allocator::adjusted_size(w[1]));
    }
  }

  #[test]
  fn free_of_null_is_a_noop() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");
    unsafe { a.free(std::ptr::null_mut()) };
    assert!(a.check());
  }

  #[test]
  fn free_before_init_is_a_noop() {
    let mut a = Allocator::new();
    unsafe { a.free(std::ptr::null_mut()) };
    // never initialized: heap_base stays null, nothing to check.
    assert!(a.heap_base.is_null());
  }

  #[test]
  fn first_fit_selects_the_lifo_head() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    let x = a.alloc(16);
    let y = a.alloc(16);
    let _z = a.alloc(16);
    unsafe { a.free(y) };

    let reused = a.alloc(16);
    assert_eq!(reused, y);
    assert_ne!(reused, x);
  }

  #[test]
  fn realloc_preserves_bytes_and_may_move() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    unsafe {
      let p = a.alloc(10);
      assert!(!p.is_null());
      for i in 0..10u8 {
        p.add(i as usize).write(i);
      }

      let q = a.realloc(p, 100);
      assert!(!q.is_null());
      for i in 0..10u8 {
        assert_eq!(q.add(i as usize).read(), i);
      }
      assert!(a.check());
    }
  }

  #[test]
  fn realloc_of_null_behaves_as_alloc() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");
    unsafe {
      let p = a.realloc(std::ptr::null_mut(), 32);
      assert!(!p.is_null());
    }
  }

  #[test]
  fn realloc_to_zero_behaves_as_free() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");
    unsafe {
      let p = a.alloc(32);
      let r = a.realloc(p, 0);
      assert!(r.is_null());
      assert!(a.check());
    }
  }

  #[test]
  fn live_allocations_never_overlap() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    let sizes = [8usize, 24, 1, 4096, 17];
    let mut ptrs = Vec::new();
    for s in sizes {
      let p = a.alloc(s);
      assert!(!p.is_null());
      ptrs.push((p, unsafe { block::get_size(block::get(block::header(p))) }));
    }

    for i in 0..ptrs.len() {
      for j in (i + 1)..ptrs.len() {
        let (pi, si) = ptrs[i];
        let (pj, sj) = ptrs[j];
        let (lo_p, lo_s, hi_p) = if (pi as usize) < (pj as usize) {
          (pi, si, pj)
        } else {
          (pj, sj, pi)
        };
        assert!((lo_p as usize) + lo_s as usize <= hi_p as usize);
      }
    }
    assert!(a.check());
  }
}
