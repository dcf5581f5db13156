//! Pure decomposition of a raw pointer word into its tagged shape.
//!
//! This module never touches a buffer. It takes a `u64` already loaded by
//! [`crate::word::load_word`] and turns it into a [`DecodedPointer`], which
//! downstream validators ([`crate::structptr`], [`crate::listptr`]) then
//! check against the actual buffer extent.

use crate::word::{self, PointerType};

/// The decoded, buffer-independent shape of a pointer word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerShape {
    /// A null pointer: every bit of the word is zero.
    Null,
    /// A struct pointer.
    Struct {
        /// Signed word offset from the word immediately following this
        /// pointer to the first word of the struct's data section.
        offset: i32,
        /// Number of data words in the struct.
        n_data_words: u16,
        /// Number of pointer slots following the data words.
        n_pointers: u16,
    },
    /// A list pointer.
    List {
        /// Signed word offset from the word immediately following this
        /// pointer to the first word of the list's content.
        offset: i32,
        /// Raw 3-bit element type code (0..=7).
        elem_type_code: u8,
        /// Raw element-count field. For composite lists (type code 7) this
        /// is a word count, not an element count; see [`crate::listptr`].
        raw_len: u32,
    },
    /// A far pointer: recognized but not resolved by this crate.
    Far {
        /// Raw offset/landing-pad bits, left undecoded.
        raw: u64,
    },
    /// The reserved "other" pointer type.
    Other {
        /// Raw bits, left undecoded.
        raw: u64,
    },
}

/// A pointer word paired with its decoded shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedPointer {
    /// The original 64-bit word, kept for diagnostics.
    pub raw: u64,
    /// The decoded shape.
    pub shape: PointerShape,
}

/// Decode a raw pointer word into its shape.
///
/// A word of all zero bits is always null, regardless of what its type tag
/// would otherwise imply — this matches every capability-style pointer
/// format's convention that the zero word is the canonical null pointer.
pub fn decode(raw: u64) -> DecodedPointer {
    let shape = if raw == 0 {
        PointerShape::Null
    } else {
        match PointerType::from_raw(raw) {
            PointerType::Struct => PointerShape::Struct {
                offset: word::offset(raw),
                n_data_words: word::struct_n_data_words(raw),
                n_pointers: word::struct_n_pointers(raw),
            },
            PointerType::List => PointerShape::List {
                offset: word::offset(raw),
                elem_type_code: word::list_elem_type_code(raw),
                raw_len: word::list_len(raw),
            },
            PointerType::Far => PointerShape::Far { raw },
            PointerType::Other => PointerShape::Other { raw },
        }
    };
    DecodedPointer { raw, shape }
}
