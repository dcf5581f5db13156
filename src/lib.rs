//! pgraph — a safe, read-only, allocation-free decoder for a capability-style
//! pointer-graph binary wire format.
//!
//! The format organizes a message as a graph of fixed-layout structs and
//! lists connected by signed word-offset pointers, all addressed relative to
//! little-endian 8-byte words. This crate validates such a message against an
//! in-memory byte buffer and lets a caller walk the resulting graph without
//! copying payload bytes and without a single `unsafe` block.
//!
//! # Quick Start
//!
//! ```rust
//! use pgraph::root::decode_root;
//! use pgraph::traversal::{walk, TraversalLimits};
//!
//! // A struct pointer (offset -1, zero data words, zero pointer slots)
//! // whose target is the word immediately before it — itself. An all-zero
//! // word would instead be read as the canonical null pointer, so a real
//! // empty struct needs a nonzero encoding like this one.
//! let message: [u8; 8] = [0xFC, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00];
//! let root = decode_root(&message)?;
//! let limits = TraversalLimits::new(64, 1 << 20);
//! let report = walk(&root, limits)?;
//! assert_eq!(report.objects_visited, 1);
//! # Ok::<(), pgraph::error::DecodeError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  word.rs       raw word load + bitfields    │
//! │  buffer.rs     target-area containment      │
//! │  pointer.rs    raw pointer-word decomposition│
//! │  descriptor.rs struct/list descriptor types │
//! ├────────────────────────────────────────────┤
//! │  structptr.rs  struct-pointer validator      │
//! │  listptr.rs    list-pointer validator        │
//! │  accessor.rs   bit/datum/element accessors   │
//! ├────────────────────────────────────────────┤
//! │  root.rs       root object decoder           │
//! │  traversal.rs  depth-bounded graph walk      │
//! └────────────────────────────────────────────┘
//! ```
//!
//! Every layer only ever reads from the caller's buffer; none of them
//! allocate, and none of them hold a pointer into the buffer longer than the
//! borrow on the `&[u8]` the caller passed in.
//!
//! # Key properties
//!
//! - **Zero `unsafe`**: every byte access goes through a bounds-checked slice
//!   read or a `zerocopy` safe cast.
//! - **Zero allocation**: decoding produces only stack values (offsets,
//!   lengths, descriptors); no `Vec` or `Box` is created by the core crate.
//! - **Depth-bounded traversal**: [`traversal::walk`] always enforces a
//!   caller-supplied recursion limit, so a malicious or cyclic graph cannot
//!   exhaust the stack.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Raw word loads and pointer-word bitfield decoding.
pub mod word;
/// Buffer and target-area containment checks.
pub mod buffer;
/// Pure decomposition of a raw pointer word into its tagged shape.
pub mod pointer;
/// Struct and list descriptor value types.
pub mod descriptor;
/// Struct-pointer validator.
pub mod structptr;
/// List-pointer validator, including composite lists.
pub mod listptr;
/// Bit, datum, and element accessors over a validated struct or list.
pub mod accessor;
/// Root object decoder.
pub mod root;
/// Depth-bounded traversal driver.
pub mod traversal;
/// Error type shared by every module in this crate.
pub mod error;

pub use crate::descriptor::{ListDescriptor, StructDescriptor};
pub use crate::error::{DecodeError, Result};
pub use crate::pointer::{DecodedPointer, PointerShape};
