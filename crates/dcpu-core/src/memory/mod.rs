//! Word-addressed memory primitives.

/// Program image conversion helpers.
pub mod image;

pub use image::{words_from_bytes, ByteOrder};

/// Number of 16-bit words in the address space.
pub const WORD_COUNT: usize = u16::MAX as usize + 1;

/// Allocates a zeroed 64K-word backing store.
#[must_use]
pub fn new_word_store() -> Box<[u16]> {
    vec![0; WORD_COUNT].into_boxed_slice()
}
