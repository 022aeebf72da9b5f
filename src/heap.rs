//! Heap bootstrap (C2) and growth (C3).
//!
//! Bootstrap lays down the prologue/epilogue sentinels that let C5's
//! neighbor probes and C9's traversals treat every real block uniformly.
//! Growth appends a new free block at the tail, repairs the epilogue, and
//! immediately hands the new block to the coalescer, since the block that
//! used to sit just before the old epilogue might itself be free.

use crate::align::{ALIGNMENT, DSIZE, WSIZE};
use crate::{AllocError, Allocator};
use crate::{block, pagegrant};

impl Allocator {
  /// Lays down the prologue/epilogue sentinels and performs the first
  /// [`CHUNK`](crate::align::CHUNK)-sized growth, so the first real
  /// allocation never sees an empty heap.
  ///
  /// Fails iff the page-grant primitive refuses the initial growth.
  pub fn init(&mut self) -> Result<(), AllocError> {
    unsafe {
      // alignment pad + prologue header + prologue footer + epilogue header
      let base = pagegrant::heap_extend(4 * WSIZE)?;

      let base_addr = base as usize;
      block::put(base, 0);
      block::put((base_addr + WSIZE) as *mut u8, block::pack(DSIZE as u32, 1));
      block::put((base_addr + 2 * WSIZE) as *mut u8, block::pack(DSIZE as u32, 1));
      block::put((base_addr + 3 * WSIZE) as *mut u8, block::pack(0, 1));

      self.heap_base = (base_addr + 2 * WSIZE) as *mut u8;
      self.epilogue_ptr = (base_addr + 3 * WSIZE) as *mut u8;
      self.free_list_head = std::ptr::null_mut();

      self.grow(self.chunk_size / WSIZE)?;
    }
    Ok(())
  }

  /// Requests `words * 4` bytes (rounded up to a multiple of `ALIGNMENT`)
  /// from the page-grant primitive, appends a new free block, repairs the
  /// epilogue, and coalesces the new block with its predecessor if that one
  /// was also free. Returns the (possibly merged) block's payload pointer.
  pub(crate) unsafe fn grow(&mut self, words: usize) -> Result<*mut u8, AllocError> {
    let size = if words % 2 != 0 { words + 1 } else { words } * WSIZE;
    debug_assert_eq!(size % ALIGNMENT, 0);

    unsafe {
      let bp = pagegrant::heap_extend(size)?;

      block::put(block::header(bp), block::pack(size as u32, 0));
      block::put(block::footer(bp), block::pack(size as u32, 0));

      let new_epilogue = block::next_block(bp);
      block::put(new_epilogue, block::pack(0, 1));
      self.epilogue_ptr = new_epilogue;

      Ok(self.coalesce(bp))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn init_establishes_a_usable_heap() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    assert!(!a.heap_base.is_null());
    assert!(!a.free_list_head.is_null());
    assert!(a.check());

    unsafe {
      let head = a.free_list_head;
      let size = block::get_size(block::get(block::header(head)));
      assert_eq!(size as usize, crate::align::CHUNK);
    }
  }

  #[test]
  fn growth_on_miss_extends_the_heap_and_stays_valid() {
    let mut a = Allocator::new();
    a.init().expect("init should succeed");

    let p = a.alloc(5000);
    assert!(!p.is_null());
    assert_eq!((p as usize) % ALIGNMENT, 0);
    assert!(a.check());
  }

  #[test]
  fn small_chunk_heap_grows_repeatedly_under_large_allocations() {
    let mut a = Allocator::with_chunk_size(64);
    a.init().expect("init should succeed");

    let before = a.epilogue_ptr;
    let mut live = Vec::new();
    for _ in 0..20 {
      let p = a.alloc(200);
      assert!(!p.is_null());
      assert_eq!((p as usize) % ALIGNMENT, 0);
      live.push(p);
      assert!(a.check());
    }
    // Every request far exceeds the 64-byte granularity, so the heap must
    // have grown past its initial bootstrap chunk to satisfy them all.
    assert!((a.epilogue_ptr as usize) > (before as usize));

    for p in live {
      unsafe { a.free(p) };
    }
    assert!(a.check());
  }
}
