//! Placement (C6): consumes a free block for an allocation request, splitting
//! off a trailing free remainder when it would still meet the minimum block
//! size.

use crate::Allocator;
use crate::align::MIN_BLOCK;
use crate::block;

impl Allocator {
  /// Places `asize` bytes into the free block at `bp`, which must already be
  /// known to satisfy `size(bp) >= asize`. Splits the block if the
  /// remainder would be at least [`MIN_BLOCK`] bytes, otherwise hands out
  /// the whole block.
  ///
  /// # Safety
  /// `bp` must be a free block currently in the free-list, with
  /// `get_size(header(bp)) >= asize`, and `asize` must already be rounded up
  /// to a multiple of 8 and be at least [`MIN_BLOCK`].
  pub(crate) unsafe fn place(&mut self, bp: *mut u8, asize: u32) {
    unsafe {
      let csize = block::get_size(block::get(block::header(bp)));

      if csize - asize >= MIN_BLOCK as u32 {
        self.list_remove(bp);
        block::put(block::header(bp), block::pack(asize, 1));
        block::put(block::footer(bp), block::pack(asize, 1));

        let remainder = (bp as usize + asize as usize) as *mut u8;
        block::put(block::header(remainder), block::pack(csize - asize, 0));
        block::put(block::footer(remainder), block::pack(csize - asize, 0));
        self.list_add(remainder);
      } else {
        block::put(block::header(bp), block::pack(csize, 1));
        block::put(block::footer(bp), block::pack(csize, 1));
        self.list_remove(bp);
      }
    }
  }
}
