use std::fmt;

/// Where, within a line, a diagnostic occurred.
///
/// Mirrors the three cases the reporter ever has to render: a scanner error
/// (no location detail beyond the line), a parser error discovered at EOF, or
/// a parser/runtime error pinned to a specific lexeme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// A scanner diagnostic: no lexeme to point at.
    None,
    /// The error was discovered at the end of input.
    AtEnd,
    /// The error is at a specific lexeme.
    At(String),
}

/// A single diagnostic produced by any pipeline stage.
///
/// Rendered as `[line L] Error[ LOCATION]: MESSAGE`, matching the historical
/// diagnostic format byte-for-byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn scan(line: u32, message: impl Into<String>) -> Self {
        Self { line, location: Location::None, message: message.into() }
    }

    pub fn at_end(line: u32, message: impl Into<String>) -> Self {
        Self { line, location: Location::AtEnd, message: message.into() }
    }

    pub fn at(line: u32, lexeme: impl Into<String>, message: impl Into<String>) -> Self {
        Self { line, location: Location::At(lexeme.into()), message: message.into() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match &self.location {
            Location::None => String::new(),
            Location::AtEnd => " at end".to_string(),
            Location::At(lexeme) => format!(" at `{lexeme}`"),
        };
        write!(f, "[line {}] Error{}: {}", self.line, location, self.message)
    }
}
