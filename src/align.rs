//! Fixed-width constants and the alignment macro shared by every other module.
//!
//! Unlike a general-purpose alignment helper keyed off `size_of::<usize>()`,
//! the sizes here are fixed by the on-heap wire layout itself: header and
//! footer words are always 4 bytes and blocks are always aligned to 8, on a
//! 32-bit host or a 64-bit one.

/// Size of a header/footer/free-list-link word, in bytes.
pub const WSIZE: usize = 4;

/// Double-word size, in bytes. Header + footer of a zero-payload block.
pub const DSIZE: usize = 8;

/// Required alignment, in bytes, of every block and every payload pointer
/// returned to the client.
pub const ALIGNMENT: usize = 8;

/// Smallest possible block size: header (4) + prev-free (4) + next-free (4)
/// + footer (4).
pub const MIN_BLOCK: usize = 16;

/// Default heap growth granularity requested from the page-grant primitive
/// when the free-list has no fit.
pub const CHUNK: usize = 4096;

/// Rounds `$value` up to the next multiple of [`ALIGNMENT`].
///
/// # Examples
///
/// ```rust
/// use mallocator::align_up;
///
/// assert_eq!(align_up!(1), 8);
/// assert_eq!(align_up!(8), 8);
/// assert_eq!(align_up!(9), 16);
/// ```
#[macro_export]
macro_rules! align_up {
  ($value:expr) => {
    (($value) + $crate::align::ALIGNMENT - 1) & !($crate::align::ALIGNMENT - 1)
  };
}
