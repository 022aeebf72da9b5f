//! Heap checker (C9): six orthogonal, read-only invariant audits.
//!
//! `check` runs them in a fixed order and stops at the first failure,
//! printing a diagnostic to stderr; it never panics or mutates the heap.
//!
//! Two bugs present in the reference this allocator is grounded on are
//! fixed here rather than reproduced: `no_escaped_coalescing` walks the
//! *entire* heap rather than only its first block, and
//! `valid_heap_addresses` tests `size & 7 == 0` rather than the unreachable
//! `== 8`.

use crate::Allocator;
use crate::block;

impl Allocator {
  /// Runs all six audits in order. Returns `true` iff every one passes.
  pub fn check(&self) -> bool {
    self.free_list_blocks_are_free()
      && self.no_escaped_coalescing()
      && self.free_blocks_in_freelist()
      && self.no_overlap()
      && self.valid_heap_addresses()
      && self.free_block_consistency()
  }

  /// A1: every block reachable from the free-list is marked free.
  fn free_list_blocks_are_free(&self) -> bool {
    unsafe {
      let mut bp = self.free_list_head;
      while !bp.is_null() {
        if block::get_alloc(block::get(block::header(bp))) == 1 {
          eprintln!("heap check: block in free list but marked allocated");
          return false;
        }
        bp = self.next_free(bp);
      }
    }
    true
  }

  /// A2: no two adjacent real blocks are both free.
  fn no_escaped_coalescing(&self) -> bool {
    unsafe {
      let mut bp = self.heap_base;
      loop {
        let size = block::get_size(block::get(block::header(bp)));
        if size == 0 {
          break; // reached the epilogue
        }
        let next = block::next_block(bp);
        let this_free = block::get_alloc(block::get(block::header(bp))) == 0;
        let next_free = block::get_alloc(block::get(block::header(next))) == 0;
        if this_free && next_free {
          eprintln!("heap check: two adjacent free blocks escaped coalescing");
          return false;
        }
        bp = next;
      }
    }
    true
  }

  /// A3: every free block in the heap is reachable from the free-list head.
  fn free_blocks_in_freelist(&self) -> bool {
    unsafe {
      let mut bp = self.heap_base;
      loop {
        let size = block::get_size(block::get(block::header(bp)));
        if size == 0 {
          break;
        }
        if block::get_alloc(block::get(block::header(bp))) == 0 {
          let mut cursor = self.free_list_head;
          let mut found = false;
          while !cursor.is_null() {
            if cursor == bp {
              found = true;
              break;
            }
            cursor = self.next_free(cursor);
          }
          if !found {
            eprintln!("heap check: free block not found in freelist");
            return false;
          }
        }
        bp = block::next_block(bp);
      }
    }
    true
  }

  /// A4: no two allocated blocks overlap.
  fn no_overlap(&self) -> bool {
    unsafe {
      let mut bp = self.heap_base;
      loop {
        let size = block::get_size(block::get(block::header(bp)));
        if size == 0 {
          break;
        }
        if block::get_alloc(block::get(block::header(bp))) == 1 {
          let next = block::next_block(bp);
          if (block::header(bp) as usize + size as usize) > block::header(next) as usize {
            eprintln!("heap check: overlapping blocks detected");
            return false;
          }
        }
        bp = block::next_block(bp);
      }
    }
    true
  }

  /// A5: every block's header lies within the heap and is 8-byte aligned.
  fn valid_heap_addresses(&self) -> bool {
    unsafe {
      let first_real = block::next_block(self.heap_base);
      let floor = block::header(first_real);
      let mut bp = first_real;
      loop {
        let size = block::get_size(block::get(block::header(bp)));
        if size == 0 {
          break;
        }
        let hdr = block::header(bp);
        if hdr < floor || hdr >= self.epilogue_ptr || size % 8 != 0 {
          eprintln!("heap check: block does not point to a valid heap address: {hdr:p}");
          return false;
        }
        bp = block::next_block(bp);
      }
    }
    true
  }

  /// A6: every free block's header and footer agree it is unallocated.
  fn free_block_consistency(&self) -> bool {
    unsafe {
      let mut bp = self.free_list_head;
      while !bp.is_null() {
        if block::get_alloc(block::get(block::header(bp))) == 1
          || block::get_alloc(block::get(block::footer(bp))) == 1
        {
          eprintln!("heap check: header and footer are inconsistent in free list");
          return false;
        }
        bp = self.next_free(bp);
      }
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use crate::Allocator;

  #[test]
  fn fresh_heap_passes_every_audit() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");
    assert!(a.check());
  }

  #[test]
  fn check_passes_across_a_mixed_alloc_free_sequence() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    let mut live = Vec::new();
    for s in [16usize, 32, 8, 200, 1, 4096, 64] {
      let p = a.alloc(s);
      assert!(!p.is_null());
      live.push(p);
      assert!(a.check());
    }
    for (i, p) in live.into_iter().enumerate() {
      if i % 2 == 0 {
        unsafe { a.free(p) };
      }
      assert!(a.check());
    }
  }
}
