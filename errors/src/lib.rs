//! Diagnostic reporting for the Wisp scripting language.
//!
//! One [`Handler`] is shared by reference across the scanner, parser,
//! resolver, and interpreter so that every stage reports through the same
//! sink and the same "any error seen" flag, matching the reference
//! implementation's single `ErrorReporter`.

mod diagnostic;
mod handler;
mod marker;

pub use diagnostic::{Diagnostic, Location};
pub use handler::Handler;
pub use marker::{ParseError, RuntimeError};
