// error.rs — parse and validation errors.
//
// Both carry a human-readable message plus the exact byte offset into the
// source format string, so callers can point a caret at the bad spot.

use thiserror::Error;

use crate::node::Span;

/// Malformed grammar: unterminated delimiter, bad numeric field, empty pad
/// character, unknown expando name. Parsing stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {position})")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the input where the problem starts.
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self { message: message.into(), position }
    }

    /// Render the source line with a `^` pointer beneath the offending byte.
    pub fn caret(&self, source: &str) -> String {
        let col = source
            .get(..self.position)
            .map(|s| s.chars().count())
            .unwrap_or(self.position);
        format!("{}\n{}^", source, " ".repeat(col))
    }
}

/// Grammatically valid tree containing an expando the active dialect does
/// not permit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at bytes {}..{})", .span.start, .span.end)]
pub struct ValidationError {
    pub message: String,
    /// Span of the offending identifier in the original source.
    pub span: Span,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

/// Either failure mode, for callers that run parse + validate as one step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown format dialect '{0}'")]
    UnknownDialect(String),
}
