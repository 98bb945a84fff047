//! Error types for the beat-annotation pipeline.

use std::fmt;

use super::token::Position;

/// A fatal error raised while tokenizing, parsing or validating beats.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatError {
    pub message: String,
    /// The literal text that caused the failure, where there is one.
    pub literal: Option<String>,
    pub line: usize,
    pub col: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    ParseError,
    ValidationError(Violation),
    /// `unscan` was called while a token was already pushed back.
    PushbackOccupied,
    /// `unscan` was called before anything was scanned.
    NothingToUnscan,
}

/// Structural problems found while reconstructing bars from beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A new bar did not follow the previous one (skipped or repeated).
    BarNotMonotonic,
    /// Beat numbers within a bar did not increase by one.
    BeatNotSequential,
    /// The bar number changed without the beat number wrapping around.
    BarDrift,
    /// The last beat does not belong to the bar being closed.
    FinalBeatInWrongBar,
    TimestampNotIncreasing,
}

impl BeatError {
    pub fn lex(message: impl Into<String>, literal: impl Into<String>, at: Position) -> Self {
        Self {
            message: message.into(),
            literal: Some(literal.into()),
            line: at.line,
            col: at.col,
            kind: ErrorKind::LexError,
        }
    }

    pub fn parse(message: impl Into<String>, literal: Option<String>, at: Position) -> Self {
        Self {
            message: message.into(),
            literal,
            line: at.line,
            col: at.col,
            kind: ErrorKind::ParseError,
        }
    }

    pub fn validation(violation: Violation, message: impl Into<String>, at: Position) -> Self {
        Self {
            message: message.into(),
            literal: None,
            line: at.line,
            col: at.col,
            kind: ErrorKind::ValidationError(violation),
        }
    }

    pub(crate) fn pushback(kind: ErrorKind, at: Position) -> Self {
        let message = match kind {
            ErrorKind::PushbackOccupied => "a token is already pushed back",
            _ => "no token to push back",
        };
        Self {
            message: message.to_string(),
            literal: None,
            line: at.line,
            col: at.col,
            kind,
        }
    }

    /// The validation rule that was broken, if this is a validation error.
    pub fn violation(&self) -> Option<Violation> {
        match self.kind {
            ErrorKind::ValidationError(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for BeatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {:?}: {}", self.line, self.col, self.kind, self.message)?;
        if let Some(lit) = &self.literal {
            write!(f, " (found {lit:?})")?;
        }
        Ok(())
    }
}

impl std::error::Error for BeatError {}
