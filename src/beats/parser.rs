//! Record parser for beat annotations.
//!
//! Reads `timestamp beat bar` triples from the tokenizer. Any whitespace,
//! newlines included, separates fields; records are delimited only by the
//! three-field cycle. No cross-record checks happen here.

use tracing::debug;

use super::error::BeatError;
use super::lexer::Tokenizer;
use super::model::Beat;
use super::token::{Position, Token};

/// Which field of the current record the next literal fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Timestamp,
    BeatNumber,
    BarNumber,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::BeatNumber => "beat number",
            Field::BarNumber => "bar number",
        }
    }

    /// Fields still missing when a record stops at this field.
    fn remaining(self) -> usize {
        match self {
            Field::Timestamp => 3,
            Field::BeatNumber => 2,
            Field::BarNumber => 1,
        }
    }
}

pub struct Parser {
    tokenizer: Tokenizer,
}

impl Parser {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Parse every record in the input. Empty input yields no beats.
    pub fn parse(&mut self) -> Result<Vec<Beat>, BeatError> {
        let mut beats = Vec::new();
        let mut field = Field::Timestamp;
        let mut timestamp = 0.0;
        let mut beat = 0;
        let mut record_start = Position::START;

        loop {
            let (tok, lit) = self.scan_ignore_whitespace();
            let at = self.tokenizer.token_position();
            match tok {
                Token::Ident(_) => {}
                Token::Eof => break,
                other => return Err(unexpected(&other, lit, at)),
            }

            match field {
                Field::Timestamp => {
                    timestamp = lit.parse::<f64>().map_err(|e| {
                        BeatError::parse(format!("invalid timestamp: {e}"), Some(lit.clone()), at)
                    })?;
                    record_start = at;
                    field = Field::BeatNumber;
                }
                Field::BeatNumber => {
                    beat = parse_count(&lit, field, at)?;
                    field = Field::BarNumber;
                }
                Field::BarNumber => {
                    let bar = parse_count(&lit, field, at)?;
                    beats.push(Beat::new(timestamp, beat, bar).at(record_start));
                    field = Field::Timestamp;
                }
            }

            // Peek: another literal continues, anything else ends the input.
            let (next, lit) = self.scan_ignore_whitespace();
            match next {
                Token::Ident(_) => self.tokenizer.unscan()?,
                Token::Eof => break,
                other => {
                    return Err(unexpected(&other, lit, self.tokenizer.token_position()));
                }
            }
        }

        if field != Field::Timestamp {
            return Err(BeatError::parse(
                format!(
                    "incomplete record: input ended before the {} ({} field(s) missing)",
                    field.name(),
                    field.remaining()
                ),
                None,
                self.tokenizer.position(),
            ));
        }

        debug!(count = beats.len(), "parsed beat records");
        Ok(beats)
    }

    /// Scan the next token, skipping a single leading whitespace run.
    fn scan_ignore_whitespace(&mut self) -> (Token, String) {
        let (tok, lit) = self.tokenizer.scan();
        if matches!(tok, Token::Whitespace(_)) {
            return self.tokenizer.scan();
        }
        (tok, lit)
    }
}

fn parse_count(lit: &str, field: Field, at: Position) -> Result<u32, BeatError> {
    lit.parse::<u32>().map_err(|e| {
        BeatError::parse(
            format!("invalid {}: {e}", field.name()),
            Some(lit.to_string()),
            at,
        )
    })
}

fn unexpected(tok: &Token, lit: String, at: Position) -> BeatError {
    match tok {
        Token::Illegal(c) => BeatError::lex(format!("unexpected character {c:?}"), lit, at),
        other => BeatError::parse(format!("found {other}, expected field"), Some(lit), at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beats::error::ErrorKind;

    fn parse(src: &str) -> Result<Vec<Beat>, BeatError> {
        Parser::new(Tokenizer::new(src)).parse()
    }

    #[test]
    fn parse_two_records() {
        let beats = parse("55 1 1\n56 2 1\n").unwrap();
        assert_eq!(beats.len(), 2);
        assert_eq!(beats[0].timestamp, 55.0);
        assert_eq!(beats[0].beat, 1);
        assert_eq!(beats[0].bar, 1);
        assert_eq!(beats[1].timestamp, 56.0);
        assert_eq!(beats[1].beat, 2);
        assert_eq!(beats[1].bar, 1);
        assert_eq!(beats[1].position, Position { line: 2, col: 0 });
    }

    #[test]
    fn parse_decimal_timestamps_and_tabs() {
        let beats = parse("0.46\t1\t1\n0.92\t2\t1").unwrap();
        assert_eq!(beats.len(), 2);
        assert_eq!(beats[0].timestamp, 0.46);
        assert_eq!(beats[1].timestamp, 0.92);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse(" \n\t\n").unwrap().is_empty());
    }

    #[test]
    fn newline_does_not_end_parsing() {
        // A newline-terminated whitespace run is a plain separator: a
        // leading blank line does not truncate the input to zero beats.
        let beats = parse("\n55 1 1\n56 2 1").unwrap();
        assert_eq!(beats.len(), 2);
    }

    #[test]
    fn record_may_span_lines() {
        let beats = parse("55 1\n1 56\n2 1\n").unwrap();
        assert_eq!(beats.len(), 2);
        assert_eq!(beats[1].beat, 2);
    }

    #[test]
    fn two_numbers_are_an_incomplete_record() {
        let err = parse("1234\n5678").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.message.contains("incomplete record"));
    }

    #[test]
    fn fourth_field_starts_a_record_that_never_completes() {
        let err = parse("1 1 1 2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.message.contains("beat number"));
    }

    #[test]
    fn illegal_character_is_a_lex_error() {
        let err = parse("55 1 1\n56 2 x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(err.literal.as_deref(), Some("x"));
        assert_eq!((err.line, err.col), (2, 5));
    }

    #[test]
    fn illegal_first_character() {
        let err = parse("abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!((err.line, err.col), (1, 0));
    }

    #[test]
    fn leading_decimal_point_is_rejected() {
        let err = parse(".5 1 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(err.literal.as_deref(), Some("."));
        // With a leading digit the same value is fine.
        assert_eq!(parse("0.5 1 1").unwrap()[0].timestamp, 0.5);
    }

    #[test]
    fn malformed_timestamp_is_a_parse_error() {
        let err = parse("1.2.3 1 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert_eq!(err.literal.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn fractional_beat_number_is_a_parse_error() {
        let err = parse("0 1.5 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert_eq!(err.literal.as_deref(), Some("1.5"));
        assert_eq!((err.line, err.col), (1, 2));
    }

    #[test]
    fn oversized_bar_number_is_a_parse_error() {
        let err = parse("0 1 99999999999").unwrap_err();
        assert!(err.message.contains("bar number"));
    }

    #[test]
    fn trailing_whitespace_is_fine() {
        let beats = parse("1 1 1   \n\n").unwrap();
        assert_eq!(beats.len(), 1);
    }
}
