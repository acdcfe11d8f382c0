use std::fmt;

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
    Semantic,
}

/// Where on the line the problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Offending token text.
    At(String),
    /// End of input.
    End,
    Unspecified,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::At(text) => write!(f, " at '{}'", text),
            Location::End => f.write_str(" at end"),
            Location::Unspecified => Ok(()),
        }
    }
}

/// One reported problem, rendered as `[line N] Error<location>: <message>`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error{location}: {message}")]
pub struct Diagnostic {
    pub stage: Stage,
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn syntax(line: usize, location: Location, message: impl Into<String>) -> Self {
        Self { stage: Stage::Syntax, line, location, message: message.into() }
    }

    pub fn lexical(line: usize, message: impl Into<String>) -> Self {
        Self { stage: Stage::Lexical, line, location: Location::Unspecified, message: message.into() }
    }

    pub fn semantic(line: usize, message: impl Into<String>) -> Self {
        Self { stage: Stage::Semantic, line, location: Location::Unspecified, message: message.into() }
    }
}
