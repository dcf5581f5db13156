//! Root object decoder.
//!
//! Every message is, by convention, a single struct pointer occupying word 0
//! of the buffer. This module ties [`Buffer::new`] and [`structptr::resolve`]
//! together into the one entry point callers need: give it the message
//! bytes, get back the buffer and the root struct's descriptor. Unlike a
//! pointer slot nested inside a struct, the root pointer has no "absent
//! field" reading — an all-zero root word is rejected rather than passed
//! through as `None`.

use crate::buffer::Buffer;
use crate::descriptor::StructDescriptor;
use crate::error::DecodeError;
use crate::{pointer, structptr};

/// A decoded message: its validated buffer, and its root struct.
pub struct RootObject<'a> {
    /// The validated, word-addressed buffer backing this message.
    pub buffer: Buffer<'a>,
    /// The root struct.
    pub root: StructDescriptor,
}

/// Decode the root object of a message.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `bytes` does not form a valid word-addressed
/// buffer, if the root pointer word is null (null is only valid for a field
/// inside a struct, not for the root), or for any error [`structptr::resolve`]
/// can produce if the root pointer itself is malformed.
pub fn decode_root(bytes: &[u8]) -> Result<RootObject<'_>, DecodeError> {
    let buffer = Buffer::new(bytes)?;
    let raw = buffer.word(0).expect("buffer with at least one word");
    let decoded = pointer::decode(raw);
    let root = structptr::resolve(&buffer, 0, decoded)?.ok_or_else(|| DecodeError::new("wrong type tag"))?;
    Ok(RootObject { buffer, root })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_word_rejects_null_root() {
        let bytes = [0u8; 8];
        assert!(decode_root(&bytes).is_err());
    }

    #[test]
    fn nonzero_zero_size_struct_pointer_decodes_to_empty_struct() {
        let bytes: [u8; 8] = [0xFC, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
        let root = decode_root(&bytes).unwrap();
        assert_eq!(root.root.n_data_words, 0);
        assert_eq!(root.root.n_pointers, 0);
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = [0u8; 3];
        assert!(decode_root(&bytes).is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(decode_root(&[]).is_err());
    }
}
