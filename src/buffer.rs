//! Buffer and target-area containment checks.
//!
//! The central safety property of this crate is that every pointer
//! dereference is checked against the buffer's actual extent before a single
//! byte of the target is read. All of that checking funnels through
//! [`Buffer::contains_range`], which rejects an out-of-range `len_words`
//! before any signed cast, so neither a huge claimed offset nor a huge
//! claimed length can wrap around and defeat the check.

use crate::error::DecodeError;

/// A validated view over a message's bytes, addressed in whole words.
///
/// Construction ([`Buffer::new`]) only checks that the byte length is a
/// multiple of 8; it does not look at any pointer. All pointer-specific
/// containment checks happen later, per call, in [`Buffer::contains_range`].
#[derive(Debug, Clone, Copy)]
pub struct Buffer<'a> {
    bytes: &'a [u8],
    n_words: usize,
}

impl<'a> Buffer<'a> {
    /// Wrap a byte slice as a word-addressed buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if `bytes` is empty or its length is not a
    /// multiple of 8.
    pub fn new(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::new("empty input"));
        }
        if bytes.len() % crate::word::WORD_BYTES != 0 {
            return Err(DecodeError::new("truncated input"));
        }
        Ok(Buffer {
            bytes,
            n_words: bytes.len() / crate::word::WORD_BYTES,
        })
    }

    /// Total number of whole words in the buffer.
    pub fn n_words(&self) -> usize {
        self.n_words
    }

    /// The raw underlying bytes.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Check whether the half-open word range `[start, start + len_words)`
    /// lies entirely within the buffer, where `start` comes from
    /// potentially-adversarial signed pointer arithmetic and `len_words` may
    /// be any value a 32-bit or 64-bit field can hold.
    ///
    /// `len_words` above `i64::MAX` is rejected before the `as i64` cast, so
    /// the cast itself can never wrap negative and slip past the
    /// `checked_add` below.
    pub fn contains_range(&self, start: i64, len_words: u64) -> bool {
        if start < 0 {
            return false;
        }
        if len_words > i64::MAX as u64 {
            return false;
        }
        let end = match start.checked_add(len_words as i64) {
            Some(e) => e,
            None => return false,
        };
        end as u64 <= self.n_words as u64
    }

    /// Load the word at `index`, assuming it has already been range-checked.
    ///
    /// Returns `None` if `index` is out of range; callers that have already
    /// validated via [`Buffer::contains_range`] can treat `None` here as
    /// unreachable, but this function re-checks rather than trusting the
    /// caller, since an out-of-bounds read is never an acceptable outcome
    /// for untrusted input.
    pub fn word(&self, index: usize) -> Option<u64> {
        crate::word::load_word(self.bytes, index)
    }
}
