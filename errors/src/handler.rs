use crate::diagnostic::Diagnostic;
use colored::Colorize;
use std::cell::RefCell;
use std::io::Write;

/// Shared diagnostic sink used by every pipeline stage.
///
/// A single `Handler` is constructed once per CLI session and passed by
/// reference into the scanner, parser, resolver, and interpreter, exactly as
/// a compiler `Handler` is threaded through every phase of a traditional
/// multi-pass compiler. It is cheap to share: emitting a diagnostic only
/// needs `&self`.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    to_stderr: bool,
}

impl Handler {
    /// Creates a handler. When `to_stderr` is false (the historical default)
    /// diagnostics are interleaved with `print` output on stdout.
    pub fn new(to_stderr: bool) -> Self {
        Self { diagnostics: RefCell::new(Vec::new()), to_stderr }
    }

    /// Records and immediately prints `diagnostic`.
    pub fn emit(&self, diagnostic: Diagnostic) {
        tracing::debug!(line = diagnostic.line, message = %diagnostic.message, "diagnostic emitted");
        let rendered = diagnostic.to_string();
        if self.to_stderr {
            eprintln!("{}", rendered.red());
        } else {
            let mut stdout = std::io::stdout();
            let _ = writeln!(stdout, "{}", rendered.red());
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Returns true if any diagnostic has been emitted since the last
    /// [`Handler::reset`].
    pub fn had_error(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    /// Clears accumulated diagnostics, run between prompt iterations so a
    /// mistake on one REPL line doesn't poison the next.
    pub fn reset(&self) {
        self.diagnostics.borrow_mut().clear();
    }

    /// Returns a snapshot of everything emitted so far (used by tests).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_had_error_and_resets() {
        let handler = Handler::new(true);
        assert!(!handler.had_error());
        handler.emit(Diagnostic::scan(1, "Unexpected character."));
        assert!(handler.had_error());
        handler.reset();
        assert!(!handler.had_error());
    }
}
