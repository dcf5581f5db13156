//! Struct-pointer validator.
//!
//! Given a decoded pointer word and the absolute word index it was read
//! from, this module computes the struct's absolute word range and checks it
//! against the buffer before handing back a [`StructDescriptor`]. No data or
//! pointer-slot word is ever read here; this module only establishes that
//! doing so later would be safe.

use crate::buffer::Buffer;
use crate::descriptor::StructDescriptor;
use crate::error::DecodeError;
use crate::pointer::{DecodedPointer, PointerShape};

/// Resolve a struct pointer read from word `pointer_index` of `buffer`.
///
/// Returns `Ok(None)` if the pointer is null.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the pointer's shape is not a struct pointer
/// or null, or if the struct's data-plus-pointer region is not entirely
/// contained in `buffer`.
pub fn resolve(
    buffer: &Buffer<'_>,
    pointer_index: usize,
    pointer: DecodedPointer,
) -> Result<Option<StructDescriptor>, DecodeError> {
    let (offset, n_data_words, n_pointers) = match pointer.shape {
        PointerShape::Null => return Ok(None),
        PointerShape::Struct {
            offset,
            n_data_words,
            n_pointers,
        } => (offset, n_data_words, n_pointers),
        _ => return Err(DecodeError::new("wrong type tag")),
    };

    // The offset is relative to the word immediately following the pointer
    // word itself, never to the pointer word's own index.
    let base = pointer_index as i64 + 1;
    let data_start = base
        .checked_add(offset as i64)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))?;

    let total_words = n_data_words as u64 + n_pointers as u64;
    if !buffer.contains_range(data_start, total_words) {
        return Err(DecodeError::new("out-of-bounds"));
    }

    Ok(Some(StructDescriptor {
        data_start: data_start as usize,
        n_data_words,
        n_pointers,
    }))
}
