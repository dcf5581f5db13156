//! List-pointer validator, including composite lists.
//!
//! Composite lists are the one case where a second word — the "tag word" —
//! must itself be read and validated before the list's true content range is
//! known. Everything else about a list pointer is resolved directly from its
//! own bits.
//!
//! # Composite tag word
//!
//! A composite list pointer's own element-count field holds the *word count*
//! of the list's payload, not an element count. The first word of that
//! payload is a tag word, bit-identical in layout to a struct pointer: its
//! low 2 bits are the struct type tag (always 0 for a valid tag word), and
//! its high 32 bits hold the per-element data-word and pointer-slot counts.
//!
//! The tag word's bits 2–31 (the "offset" field of a struct-pointer-shaped
//! word) are reserved and ignored here: some implementations of this format
//! read that field as the element count directly, but this decoder derives
//! element count from the payload word count the list pointer already
//! declares, divided by the per-element stride. Both numbers come from
//! fields that are independently bounds-checked, so trusting the tag's own
//! offset field would add a second, potentially inconsistent source of
//! truth for no benefit.

use crate::buffer::Buffer;
use crate::descriptor::{ElementType, ListDescriptor};
use crate::error::DecodeError;
use crate::pointer::{DecodedPointer, PointerShape};

/// Resolve a list pointer read from word `pointer_index` of `buffer`.
///
/// Returns `Ok(None)` if the pointer is null.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the pointer's shape is not a list pointer or
/// null, if the content region is not entirely contained in `buffer`, or (for
/// composite lists) if the tag word is malformed or inconsistent with the
/// claimed payload size.
pub fn resolve(
    buffer: &Buffer<'_>,
    pointer_index: usize,
    pointer: DecodedPointer,
) -> Result<Option<ListDescriptor>, DecodeError> {
    let (offset, elem_type_code, raw_len) = match pointer.shape {
        PointerShape::Null => return Ok(None),
        PointerShape::List {
            offset,
            elem_type_code,
            raw_len,
        } => (offset, elem_type_code, raw_len),
        _ => return Err(DecodeError::new("wrong type tag")),
    };

    let base = pointer_index as i64 + 1;
    let content_start = base
        .checked_add(offset as i64)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))?;

    if elem_type_code == 7 {
        resolve_composite(buffer, content_start, raw_len)
    } else {
        resolve_simple(buffer, content_start, elem_type_code, raw_len)
    }
}

fn resolve_simple(
    buffer: &Buffer<'_>,
    content_start: i64,
    elem_type_code: u8,
    n_elements: u32,
) -> Result<Option<ListDescriptor>, DecodeError> {
    let elem_type =
        ElementType::from_code(elem_type_code).ok_or_else(|| DecodeError::new("wrong type tag"))?;

    let descriptor = ListDescriptor {
        content_start: content_start as usize,
        n_elements,
        elem_type,
    };

    let total_words = descriptor.total_content_words() as u64;
    if !buffer.contains_range(content_start, total_words) {
        return Err(DecodeError::new("out-of-bounds"));
    }

    Ok(Some(descriptor))
}

fn resolve_composite(
    buffer: &Buffer<'_>,
    content_start: i64,
    claimed_payload_words: u32,
) -> Result<Option<ListDescriptor>, DecodeError> {
    if !buffer.contains_range(content_start, 1) {
        return Err(DecodeError::new("out-of-bounds"));
    }
    let tag_index = content_start as usize;
    let tag_raw = buffer
        .word(tag_index)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))?;

    if tag_raw & 0b11 != 0 {
        return Err(DecodeError::new("bad composite tag"));
    }

    let n_data_words = crate::word::struct_n_data_words(tag_raw);
    let n_pointers = crate::word::struct_n_pointers(tag_raw);
    let elem_stride = n_data_words as u64 + n_pointers as u64;
    let list_words = claimed_payload_words as u64;

    let n_elements = if elem_stride == 0 {
        if list_words != 0 {
            return Err(DecodeError::new("composite inconsistency"));
        }
        0
    } else {
        if list_words % elem_stride != 0 {
            return Err(DecodeError::new("composite inconsistency"));
        }
        list_words / elem_stride
    };
    let n_elements: u32 = n_elements
        .try_into()
        .map_err(|_| DecodeError::new("composite inconsistency"))?;

    let payload_start = content_start + 1;
    if !buffer.contains_range(payload_start, list_words) {
        return Err(DecodeError::new("out-of-bounds"));
    }

    Ok(Some(ListDescriptor {
        content_start: payload_start as usize,
        n_elements,
        elem_type: ElementType::Composite {
            n_data_words,
            n_pointers,
        },
    }))
}
