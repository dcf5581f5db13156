//! Error type returned by every decoding and traversal routine in this crate.
//!
//! A single coarse failure kind covers every way a core validation step can
//! fail: wrong pointer type tag, out-of-bounds target, malformed composite
//! tag word, and so on. This is deliberate, not an oversight — an adversary
//! feeding this crate hostile bytes must not be able to distinguish *why*
//! decoding stopped by inspecting the error, and callers are never expected
//! to build recovery paths keyed on a specific sub-failure. The `hint` field
//! exists purely so a human reading CLI output or a test failure can tell
//! which check tripped; no production code should ever match on it.
//!
//! Following the teacher's pattern in its own binary-format validator, this
//! is a hand-written type with a manual `Display` and `std::error::Error`
//! impl rather than a derive-macro-based error type.

use std::fmt;

/// The sole failure kind this crate produces.
///
/// `hint` is one of a small fixed set of static strings (`"wrong type tag"`,
/// `"out-of-bounds"`, `"bad composite tag"`, `"composite inconsistency"`,
/// and a few others used only by the traversal driver) describing which
/// check failed. Two `DecodeError`s with different hints compare unequal,
/// which is useful in tests, but nothing outside this module should ever
/// branch on the hint's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    hint: &'static str,
}

impl DecodeError {
    pub(crate) const fn new(hint: &'static str) -> Self {
        DecodeError { hint }
    }

    /// The static diagnostic string describing which check failed.
    ///
    /// Intended for human-readable output only; do not match on this in
    /// control flow.
    pub fn hint(&self) -> &'static str {
        self.hint
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pointer: {}", self.hint)
    }
}

impl std::error::Error for DecodeError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_hint() {
        let err = DecodeError::new("out-of-bounds");
        assert_eq!(err.to_string(), "invalid pointer: out-of-bounds");
    }

    #[test]
    fn different_hints_compare_unequal() {
        assert_ne!(DecodeError::new("out-of-bounds"), DecodeError::new("wrong type tag"));
    }

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(DecodeError::new("out-of-bounds"));
        assert_eq!(err.to_string(), "invalid pointer: out-of-bounds");
    }
}
