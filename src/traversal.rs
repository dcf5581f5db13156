//! Depth-bounded traversal driver.
//!
//! A message's struct/list pointer graph can be deep, and an untrusted
//! message is under no obligation to bound that depth for you. This module
//! walks the graph produced by [`crate::root::decode_root`] while enforcing
//! two caller-supplied limits: a maximum recursion depth, and a maximum
//! total word budget across every object visited. Either limit being
//! exceeded stops the walk with an error rather than letting it run away.
//!
//! Optional shared-object deduplication (`dedupe_shared`) tracks which
//! struct and list starting words have already been visited, so a graph that
//! legitimately shares a sub-object through two different pointers is only
//! counted once. This is the only place in the crate that allocates: dedupe
//! needs a `HashSet`, which the accessors and validators deliberately do
//! without.

use std::collections::HashSet;

use crate::accessor;
use crate::buffer::Buffer;
use crate::descriptor::{ElementType, ListDescriptor, StructDescriptor};
use crate::error::DecodeError;
use crate::pointer::PointerShape;
use crate::root::RootObject;
use crate::{listptr, structptr};

/// Caller-supplied bounds on a traversal.
#[derive(Debug, Clone, Copy)]
pub struct TraversalLimits {
    max_depth: u32,
    max_words: u64,
    dedupe_shared: bool,
}

impl TraversalLimits {
    /// Build a limit set with shared-object dedupe disabled.
    pub fn new(max_depth: u32, max_words: u64) -> Self {
        TraversalLimits {
            max_depth,
            max_words,
            dedupe_shared: false,
        }
    }

    /// Enable counting each distinct struct or list only once, the first
    /// time it is reached, even if multiple pointers target it.
    pub fn with_dedupe_shared(mut self, dedupe: bool) -> Self {
        self.dedupe_shared = dedupe;
        self
    }
}

/// Summary counters produced by a completed walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraversalReport {
    /// Number of struct and composite-list-element objects visited.
    pub objects_visited: u64,
    /// Sum of the word extents of every object and list visited.
    pub words_visited: u64,
    /// Number of pointer slots that failed struct or list validation. A
    /// failure in one slot does not stop sibling slots from being walked.
    pub failed_pointers: u64,
}

struct WalkState<'a> {
    buffer: Buffer<'a>,
    limits: TraversalLimits,
    report: TraversalReport,
    seen: Option<HashSet<usize>>,
}

impl WalkState<'_> {
    fn charge_words(&mut self, words: u64) -> Result<(), DecodeError> {
        self.report.words_visited += words;
        if self.report.words_visited > self.limits.max_words {
            return Err(DecodeError::new("word budget exceeded"));
        }
        Ok(())
    }

    fn check_depth(&self, depth: u32) -> Result<(), DecodeError> {
        if depth > self.limits.max_depth {
            return Err(DecodeError::new("depth limit exceeded"));
        }
        Ok(())
    }

    /// Returns `true` if this word index has not been seen before (and
    /// records it as seen), or if dedupe is disabled.
    fn mark_seen(&mut self, word_index: usize) -> bool {
        match &mut self.seen {
            Some(set) => set.insert(word_index),
            None => true,
        }
    }
}

/// Walk every struct and list reachable from a decoded message's root.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the configured depth or word-budget limits
/// are exceeded, or if a pointer encountered along the way fails struct or
/// list validation.
pub fn walk(root: &RootObject<'_>, limits: TraversalLimits) -> Result<TraversalReport, DecodeError> {
    let mut state = WalkState {
        buffer: root.buffer,
        limits,
        report: TraversalReport::default(),
        seen: if limits.dedupe_shared {
            Some(HashSet::new())
        } else {
            None
        },
    };
    walk_struct(&mut state, &root.root, 0)?;
    Ok(state.report)
}

fn walk_struct(
    state: &mut WalkState<'_>,
    desc: &StructDescriptor,
    depth: u32,
) -> Result<(), DecodeError> {
    state.check_depth(depth)?;
    if !state.mark_seen(desc.data_start) {
        return Ok(());
    }
    state.report.objects_visited += 1;
    state.charge_words(desc.total_words() as u64)?;

    for slot in 0..desc.n_pointers as usize {
        let pointer_index = desc.pointers_start() + slot;
        match accessor::struct_pointer_slot(&state.buffer, desc, slot) {
            Ok(pointer) => dispatch_pointer(state, pointer.shape, pointer_index, depth)?,
            Err(_) => state.report.failed_pointers += 1,
        }
    }
    Ok(())
}

fn walk_list(
    state: &mut WalkState<'_>,
    desc: &ListDescriptor,
    depth: u32,
) -> Result<(), DecodeError> {
    state.check_depth(depth)?;
    if !state.mark_seen(desc.content_start) {
        return Ok(());
    }
    state.charge_words(desc.total_content_words() as u64)?;

    match desc.elem_type {
        ElementType::Pointer => {
            for i in 0..desc.n_elements as usize {
                let pointer_index = desc.content_start + i;
                match accessor::list_get_pointer(&state.buffer, desc, i) {
                    Ok(pointer) => dispatch_pointer(state, pointer.shape, pointer_index, depth)?,
                    Err(_) => state.report.failed_pointers += 1,
                }
            }
        }
        ElementType::Composite { .. } => {
            for i in 0..desc.n_elements as usize {
                match accessor::list_get_composite_element(desc, i) {
                    Ok(element) => walk_struct(state, &element, depth + 1)?,
                    Err(_) => state.report.failed_pointers += 1,
                }
            }
        }
        ElementType::Void | ElementType::Bit | ElementType::Byte1 | ElementType::Byte2 | ElementType::Byte4 | ElementType::Byte8 => {
            // Leaf data: already accounted for in the word charge above.
        }
    }
    Ok(())
}

/// Dispatch on one outgoing pointer's shape.
///
/// A struct or list that fails its own containment validation is recorded in
/// [`TraversalReport::failed_pointers`] and the walk continues with the
/// pointer's siblings; only resource-limit errors (depth, word budget)
/// propagate out and abort the whole walk.
fn dispatch_pointer(
    state: &mut WalkState<'_>,
    shape: PointerShape,
    pointer_index: usize,
    depth: u32,
) -> Result<(), DecodeError> {
    match shape {
        PointerShape::Null => Ok(()),
        PointerShape::Struct { .. } => {
            let raw = match state.buffer.word(pointer_index) {
                Some(raw) => raw,
                None => {
                    state.report.failed_pointers += 1;
                    return Ok(());
                }
            };
            let decoded = crate::pointer::decode(raw);
            match structptr::resolve(&state.buffer, pointer_index, decoded) {
                Ok(Some(sub)) => walk_struct(state, &sub, depth + 1),
                Ok(None) => Ok(()),
                Err(_) => {
                    state.report.failed_pointers += 1;
                    Ok(())
                }
            }
        }
        PointerShape::List { .. } => {
            let raw = match state.buffer.word(pointer_index) {
                Some(raw) => raw,
                None => {
                    state.report.failed_pointers += 1;
                    return Ok(());
                }
            };
            let decoded = crate::pointer::decode(raw);
            match listptr::resolve(&state.buffer, pointer_index, decoded) {
                Ok(Some(sub)) => walk_list(state, &sub, depth + 1),
                Ok(None) => Ok(()),
                Err(_) => {
                    state.report.failed_pointers += 1;
                    Ok(())
                }
            }
        }
        // Recognized but not followed, per the traversal contract: a far or
        // reserved-type pointer is reported at the CLI layer, not treated as
        // a decode failure.
        PointerShape::Far { .. } | PointerShape::Other { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::root::decode_root;

    #[test]
    fn null_root_is_rejected_before_traversal() {
        let bytes = [0u8; 8];
        assert!(decode_root(&bytes).is_err());
    }

    #[test]
    fn single_empty_struct_counts_as_one_object() {
        let bytes: [u8; 8] = [0xFC, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
        let root = decode_root(&bytes).unwrap();
        let report = walk(&root, TraversalLimits::new(10, 1000)).unwrap();
        assert_eq!(report.objects_visited, 1);
        assert_eq!(report.words_visited, 0);
    }

    #[test]
    fn chain_of_structs_is_counted_and_bounded_by_depth() {
        // root (word 0) -> struct with 1 data word + 1 pointer, pointing to
        // a second, pointer-less struct at word 2.
        let root_ptr = (1u64 << 48) | (1u64 << 32) | (0u64 << 2) | 0b00;
        // Leaf struct is zero-size and self-referential (offset -1 from the
        // slot word that names it), the same backward-pointing trick used
        // for the crate doctest's root.
        let leaf_ptr = 0xFFFF_FFFCu64;
        let mut bytes = vec![0u8; 8 * 3];
        bytes[0..8].copy_from_slice(&root_ptr.to_le_bytes());
        bytes[8..16].copy_from_slice(&0u64.to_le_bytes()); // data word
        bytes[16..24].copy_from_slice(&leaf_ptr.to_le_bytes());
        let root = decode_root(&bytes).unwrap();

        let report = walk(&root, TraversalLimits::new(10, 1000)).unwrap();
        assert_eq!(report.objects_visited, 2);

        let err = walk(&root, TraversalLimits::new(0, 1000)).unwrap_err();
        assert_eq!(err, DecodeError::new("depth limit exceeded"));
    }

    #[test]
    fn word_budget_is_enforced() {
        let bytes: [u8; 8] = [0xFC, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
        let root = decode_root(&bytes).unwrap();
        // empty struct costs zero words, so a budget of 0 should still pass.
        let report = walk(&root, TraversalLimits::new(10, 0)).unwrap();
        assert_eq!(report.objects_visited, 1);
    }

    #[test]
    fn dedupe_shared_counts_shared_struct_once() {
        // Two pointer slots in the root both point at the same struct, word 4.
        let root_ptr = (2u64 << 48) | (0u64 << 32) | (0u64 << 2) | 0b00;
        let mut bytes = vec![0u8; 8 * 5];
        bytes[0..8].copy_from_slice(&root_ptr.to_le_bytes());
        // slot 0 at word 1: offset = 4 - (1 + 1) = 2
        let slot0 = (2u64 << 2) | 0b00;
        bytes[8..16].copy_from_slice(&slot0.to_le_bytes());
        // slot 1 at word 2: offset = 4 - (2 + 1) = 1
        let slot1 = (1u64 << 2) | 0b00;
        bytes[16..24].copy_from_slice(&slot1.to_le_bytes());
        // word 3 unused.
        // word 4: shared target struct, zero-size, encoded non-null via a
        // self-referential backward offset (see the crate doctest).
        bytes[32..40].copy_from_slice(&0xFFFF_FFFCu64.to_le_bytes());

        let root = decode_root(&bytes).unwrap();
        let report = walk(&root, TraversalLimits::new(10, 1000).with_dedupe_shared(true)).unwrap();
        // root + shared target counted once each, despite two slots pointing at it.
        assert_eq!(report.objects_visited, 2);
    }
}
