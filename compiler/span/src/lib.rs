//! Span and symbol handling for the Wisp scripting language.
//!
//! Kept deliberately small: the Language only needs a 1-based source line per
//! token (see the Scanner rules), not byte-offset spans, so [`Span`] is a thin
//! wrapper around a line number rather than a start/end byte range.

mod symbol;

pub use symbol::Symbol;

/// The source location of a token or syntax-tree node.
///
/// Only a line number is tracked; the Scanner never needs to reconstruct a
/// byte range, and diagnostics are always reported as `[line L] ...`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: u32,
}

impl Span {
    pub fn new(line: u32) -> Self {
        Self { line }
    }

    /// A span with no useful source location, for synthesized nodes (e.g. the
    /// desugared `for` loop's `true` condition).
    pub fn dummy() -> Self {
        Self { line: 0 }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)
    }
}
