//! Token types for the beat-annotation tokenizer.

use std::fmt;

/// A token produced by the tokenizer. Positions are tracked by the
/// [`Tokenizer`](super::lexer::Tokenizer), not by the token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal: digits and decimal points, starting with a digit.
    Ident(String),
    /// A run of contiguous whitespace (spaces, tabs, newlines).
    Whitespace(String),
    Eof,
    Illegal(char),
}

impl Token {
    /// The raw source text of this token.
    pub fn text(&self) -> String {
        match self {
            Token::Ident(s) | Token::Whitespace(s) => s.clone(),
            Token::Eof => String::new(),
            Token::Illegal(c) => c.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Token::Ident(_) => "identifier",
            Token::Whitespace(_) => "whitespace",
            Token::Eof => "eof",
            Token::Illegal(_) => "illegal",
        };
        f.write_str(name)
    }
}

/// A cursor position in the source.
///
/// `line` starts at 1. `col` counts the characters consumed on the current
/// line, so a token that opens a line sits at column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const START: Position = Position { line: 1, col: 0 };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.col)
    }
}
