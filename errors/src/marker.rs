use thiserror::Error;

/// Raised by the parser when a production can't be completed.
///
/// The diagnostic text itself has already been sent to the [`crate::Handler`]
/// by the time this is raised; the marker only carries control flow back up
/// to the nearest statement boundary, where the parser synchronizes and
/// keeps going.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("parse error (see reported diagnostics)")]
pub struct ParseError;

/// Raised by the interpreter when evaluation can't continue.
///
/// As with [`ParseError`], the human-readable message has already reached
/// the `Handler`; this unwinds the evaluator back to the top-level
/// `interpret` call, which stops running the program.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("runtime error (see reported diagnostics)")]
pub struct RuntimeError;
