//! Page-grant primitive (C10): the allocator's only collaborator, able to
//! append raw bytes to the heap tail.
//!
//! This is a thin wrapper over `sbrk(2)`, reached through `libc`, exactly the
//! way the donor crate this workspace grew from reached it for its own bump
//! allocator. Everything above this module deals purely in addresses it has
//! already validated; this is the one real unsafe-FFI boundary.

use libc::{c_void, intptr_t, sbrk};

use crate::AllocError;

/// Requests `n_bytes` freshly appended to the heap tail.
///
/// On success, returns a pointer equal to the old heap tail address (i.e.
/// the base of the newly appended region). Fails if the OS refuses to grow
/// the process break further.
///
/// # Safety
/// Calls into libc; must not be invoked concurrently with another heap
/// mutation (the allocator as a whole is single-threaded, see the crate's
/// concurrency notes).
pub unsafe fn heap_extend(n_bytes: usize) -> Result<*mut u8, AllocError> {
  let raw = unsafe { sbrk(n_bytes as intptr_t) };
  if raw == usize::MAX as *mut c_void {
    return Err(AllocError::Exhausted);
  }
  Ok(raw as *mut u8)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extends_and_returns_a_usable_pointer() {
    unsafe {
      let p = heap_extend(64).expect("sbrk should succeed for 64 bytes");
      assert!(!p.is_null());
      // The returned region must be writable.
      for i in 0..64u8 {
        p.add(i as usize).write(i);
      }
      for i in 0..64u8 {
        assert_eq!(p.add(i as usize).read(), i);
      }
    }
  }
}
