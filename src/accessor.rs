//! Bit, datum, and element accessors over a validated struct or list.
//!
//! Every function here assumes its [`crate::descriptor::StructDescriptor`]
//! or [`crate::descriptor::ListDescriptor`] argument has already been
//! produced by [`crate::structptr::resolve`] or [`crate::listptr::resolve`],
//! so the word range it names is known to lie inside the buffer. What these
//! functions add on top is per-element and per-slot index bounds checking,
//! plus the bit- and byte-level addressing a whole-word read does not give
//! you.

use crate::buffer::Buffer;
use crate::descriptor::{ElementType, ListDescriptor, StructDescriptor};
use crate::error::DecodeError;
use crate::pointer::{self, DecodedPointer};

/// Read one data word from a validated struct.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `word_index` is not less than the struct's
/// `n_data_words`.
pub fn struct_data_word(
    buffer: &Buffer<'_>,
    desc: &StructDescriptor,
    word_index: usize,
) -> Result<u64, DecodeError> {
    if word_index >= desc.n_data_words as usize {
        return Err(DecodeError::new("out-of-bounds"));
    }
    buffer
        .word(desc.data_start + word_index)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))
}

/// Read and decode one pointer slot from a validated struct.
///
/// A struct's own accessor contract treats every pointer slot word as
/// something to be copied out and decoded independently — this mirrors the
/// scratch-copy convention of reading a single word before interpreting it,
/// rather than reinterpreting buffer bytes in place.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `slot_index` is not less than the struct's
/// `n_pointers`.
pub fn struct_pointer_slot(
    buffer: &Buffer<'_>,
    desc: &StructDescriptor,
    slot_index: usize,
) -> Result<DecodedPointer, DecodeError> {
    if slot_index >= desc.n_pointers as usize {
        return Err(DecodeError::new("out-of-bounds"));
    }
    let word_index = desc.pointers_start() + slot_index;
    let raw = buffer
        .word(word_index)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))?;
    Ok(pointer::decode(raw))
}

/// Read one bit from a validated bit list, LSB-first within each byte.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `desc` is not a [`ElementType::Bit`] list, or
/// if `index` is not less than the list's element count.
pub fn list_get_bit(
    buffer: &Buffer<'_>,
    desc: &ListDescriptor,
    index: usize,
) -> Result<bool, DecodeError> {
    if desc.elem_type != ElementType::Bit {
        return Err(DecodeError::new("wrong type tag"));
    }
    check_index(index, desc.n_elements)?;
    let bit_offset = desc.content_start * 64 + index;
    let byte_index = bit_offset / 8;
    let bit_in_byte = bit_offset % 8;
    let byte = *buffer
        .bytes()
        .get(byte_index)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))?;
    Ok((byte >> bit_in_byte) & 1 == 1)
}

/// Read one fixed-width numeric element from a void, byte-family, or 8-byte
/// list, zero-extended into a `u64`. A void element has no storage and
/// always reads as `0`.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `desc`'s element type is not one of
/// `Void`/`Byte1`/`Byte2`/`Byte4`/`Byte8`, or if `index` is not less than the
/// list's element count.
pub fn list_get_datum(
    buffer: &Buffer<'_>,
    desc: &ListDescriptor,
    index: usize,
) -> Result<u64, DecodeError> {
    check_index(index, desc.n_elements)?;
    let elem_bytes = match desc.elem_type {
        ElementType::Void => return Ok(0),
        ElementType::Byte1 => 1,
        ElementType::Byte2 => 2,
        ElementType::Byte4 => 4,
        ElementType::Byte8 => 8,
        _ => return Err(DecodeError::new("wrong type tag")),
    };
    let byte_offset = desc.content_start * 8 + index * elem_bytes;
    let slice = buffer
        .bytes()
        .get(byte_offset..byte_offset + elem_bytes)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))?;
    let mut buf = [0u8; 8];
    buf[..elem_bytes].copy_from_slice(slice);
    Ok(u64::from_le_bytes(buf))
}

/// Read and decode one pointer element from a validated pointer list.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `desc` is not a [`ElementType::Pointer`]
/// list, or if `index` is not less than the list's element count.
pub fn list_get_pointer(
    buffer: &Buffer<'_>,
    desc: &ListDescriptor,
    index: usize,
) -> Result<DecodedPointer, DecodeError> {
    if desc.elem_type != ElementType::Pointer {
        return Err(DecodeError::new("wrong type tag"));
    }
    check_index(index, desc.n_elements)?;
    let word_index = desc.content_start + index;
    let raw = buffer
        .word(word_index)
        .ok_or_else(|| DecodeError::new("out-of-bounds"))?;
    Ok(pointer::decode(raw))
}

/// Get the struct descriptor for one element of a validated composite list.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `desc`'s element type is not
/// [`ElementType::Composite`], or if `index` is not less than the list's
/// element count.
pub fn list_get_composite_element(
    desc: &ListDescriptor,
    index: usize,
) -> Result<StructDescriptor, DecodeError> {
    let (n_data_words, n_pointers) = match desc.elem_type {
        ElementType::Composite {
            n_data_words,
            n_pointers,
        } => (n_data_words, n_pointers),
        _ => return Err(DecodeError::new("wrong type tag")),
    };
    check_index(index, desc.n_elements)?;
    let stride = n_data_words as usize + n_pointers as usize;
    Ok(StructDescriptor {
        data_start: desc.content_start + index * stride,
        n_data_words,
        n_pointers,
    })
}

fn check_index(index: usize, n_elements: u32) -> Result<(), DecodeError> {
    if index >= n_elements as usize {
        Err(DecodeError::new("out-of-bounds"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(words: usize) -> Vec<u8> {
        vec![0u8; words * 8]
    }

    #[test]
    fn struct_data_word_reads_in_range() {
        let mut bytes = buf(2);
        bytes[0..8].copy_from_slice(&42u64.to_le_bytes());
        let buffer = Buffer::new(&bytes).unwrap();
        let desc = StructDescriptor {
            data_start: 0,
            n_data_words: 1,
            n_pointers: 1,
        };
        assert_eq!(struct_data_word(&buffer, &desc, 0), Ok(42));
        assert!(struct_data_word(&buffer, &desc, 1).is_err());
    }

    #[test]
    fn struct_pointer_slot_decodes_word() {
        let mut bytes = buf(2);
        bytes[8..16].copy_from_slice(&0u64.to_le_bytes());
        let buffer = Buffer::new(&bytes).unwrap();
        let desc = StructDescriptor {
            data_start: 0,
            n_data_words: 1,
            n_pointers: 1,
        };
        let slot = struct_pointer_slot(&buffer, &desc, 0).unwrap();
        assert_eq!(slot.shape, pointer::PointerShape::Null);
    }

    #[test]
    fn list_get_bit_reads_lsb_first() {
        let mut bytes = buf(1);
        bytes[0] = 0b0000_0101; // bits 0 and 2 set
        let buffer = Buffer::new(&bytes).unwrap();
        let desc = ListDescriptor {
            content_start: 0,
            n_elements: 8,
            elem_type: ElementType::Bit,
        };
        assert_eq!(list_get_bit(&buffer, &desc, 0), Ok(true));
        assert_eq!(list_get_bit(&buffer, &desc, 1), Ok(false));
        assert_eq!(list_get_bit(&buffer, &desc, 2), Ok(true));
    }

    #[test]
    fn list_get_datum_reads_little_endian_u16() {
        let mut bytes = buf(1);
        bytes[0..2].copy_from_slice(&0x1234u16.to_le_bytes());
        let buffer = Buffer::new(&bytes).unwrap();
        let desc = ListDescriptor {
            content_start: 0,
            n_elements: 4,
            elem_type: ElementType::Byte2,
        };
        assert_eq!(list_get_datum(&buffer, &desc, 0), Ok(0x1234));
    }

    #[test]
    fn list_get_datum_reads_void_as_zero() {
        let bytes = buf(1);
        let buffer = Buffer::new(&bytes).unwrap();
        let desc = ListDescriptor {
            content_start: 0,
            n_elements: 5,
            elem_type: ElementType::Void,
        };
        assert_eq!(list_get_datum(&buffer, &desc, 4), Ok(0));
        assert!(list_get_datum(&buffer, &desc, 5).is_err());
    }

    #[test]
    fn list_get_pointer_rejects_wrong_type() {
        let bytes = buf(1);
        let buffer = Buffer::new(&bytes).unwrap();
        let desc = ListDescriptor {
            content_start: 0,
            n_elements: 1,
            elem_type: ElementType::Byte1,
        };
        assert!(list_get_pointer(&buffer, &desc, 0).is_err());
    }

    #[test]
    fn list_get_composite_element_computes_stride() {
        let desc = ListDescriptor {
            content_start: 10,
            n_elements: 3,
            elem_type: ElementType::Composite {
                n_data_words: 2,
                n_pointers: 1,
            },
        };
        let elem1 = list_get_composite_element(&desc, 1).unwrap();
        assert_eq!(elem1.data_start, 10 + 3);
    }
}
