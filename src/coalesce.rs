//! Coalescer (C5): merges a newly-freed block with its immediate free
//! neighbors, in the four cases the boundary-tag technique makes O(1).
//!
//! The prologue and epilogue sentinels are both permanently allocated, so
//! the "previous" and "next" allocation-bit probes below are always safe
//! even for the very first or very last real block.

use crate::Allocator;
use crate::block;

impl Allocator {
  /// Merges `bp` (whose header/footer are already marked free) with any
  /// free neighbors, and (re-)inserts the resulting block into the
  /// free-list. Returns the payload pointer of the (possibly merged) block.
  ///
  /// # Safety
  /// `bp`'s header and footer must already be packed `(size, 0)`, and `bp`
  /// must not yet be a member of the free-list.
  pub(crate) unsafe fn coalesce(&mut self, bp: *mut u8) -> *mut u8 {
    unsafe {
      let prev = block::prev_block(bp);
      let next = block::next_block(bp);
      let prev_alloc = block::get_alloc(block::get(block::header(prev)));
      let next_alloc = block::get_alloc(block::get(block::header(next)));
      let mut size = block::get_size(block::get(block::header(bp)));

      match (prev_alloc, next_alloc) {
        (1, 1) => {
          self.list_add(bp);
          bp
        }
        (1, 0) => {
          size += block::get_size(block::get(block::header(next)));
          self.list_remove(next);
          block::put(block::header(bp), block::pack(size, 0));
          block::put(block::footer(bp), block::pack(size, 0));
          self.list_add(bp);
          bp
        }
        (0, 1) => {
          size += block::get_size(block::get(block::header(prev)));
          self.list_remove(prev);
          block::put(block::header(prev), block::pack(size, 0));
          block::put(block::footer(bp), block::pack(size, 0));
          self.list_add(prev);
          prev
        }
        _ => {
          size += block::get_size(block::get(block::header(prev)))
            + block::get_size(block::get(block::header(next)));
          self.list_remove(prev);
          self.list_remove(next);
          block::put(block::header(prev), block::pack(size, 0));
          block::put(block::footer(next), block::pack(size, 0));
          self.list_add(prev);
          prev
        }
      }
    }
  }
}
