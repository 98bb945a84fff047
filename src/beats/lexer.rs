//! Tokenizer for beat-annotation files.
//!
//! Converts source text into [`Token`]s one at a time, tracking line and
//! column, with a single-slot pushback for one token of lookahead.

use std::io::{self, Read};

use tracing::trace;

use super::error::{BeatError, ErrorKind};
use super::token::{Position, Token};

/// Index into the source plus the line/column it corresponds to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    pos: usize,
    at: Position,
}

/// A scanned token together with the cursors around it, so pushback can
/// rewind and replay it exactly.
#[derive(Debug, Clone)]
struct Scanned {
    token: Token,
    start: Cursor,
    end: Cursor,
}

pub struct Tokenizer {
    chars: Vec<char>,
    cursor: Cursor,
    /// Cursor before the last character read; cleared after `unread`.
    prev: Option<Cursor>,
    last: Option<Scanned>,
    /// Holds at most one token. Never overwritten while occupied.
    pushback: Option<Scanned>,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        let start = Cursor {
            pos: 0,
            at: Position::START,
        };
        Self {
            chars: source.chars().collect(),
            cursor: start,
            prev: None,
            last: None,
            pushback: None,
        }
    }

    /// Read the whole of `reader` up front and tokenize it.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(Self::new(&source))
    }

    /// The current cursor position.
    pub fn position(&self) -> Position {
        self.cursor.at
    }

    /// Where the most recently scanned token started. Falls back to the
    /// cursor when nothing is outstanding.
    pub fn token_position(&self) -> Position {
        self.last.as_ref().map_or(self.cursor.at, |s| s.start.at)
    }

    /// Advance exactly one token and return it with its raw text.
    pub fn scan(&mut self) -> (Token, String) {
        if let Some(scanned) = self.pushback.take() {
            self.cursor = scanned.end;
            self.prev = None;
            let token = scanned.token.clone();
            self.last = Some(scanned);
            let text = token.text();
            return (token, text);
        }

        let start = self.cursor;
        let token = self.next_token();
        trace!("token {} at {}: {:?}", token, start.at, token.text());

        self.last = Some(Scanned {
            token: token.clone(),
            start,
            end: self.cursor,
        });
        let text = token.text();
        (token, text)
    }

    /// Push the last scanned token back so the next [`scan`](Self::scan)
    /// returns it again. The position rewinds to the token's start.
    ///
    /// Only one token can be held: a second `unscan` without an
    /// intervening `scan` is refused and changes nothing.
    pub fn unscan(&mut self) -> Result<(), BeatError> {
        if self.pushback.is_some() {
            return Err(BeatError::pushback(
                ErrorKind::PushbackOccupied,
                self.cursor.at,
            ));
        }
        let scanned = self
            .last
            .take()
            .ok_or_else(|| BeatError::pushback(ErrorKind::NothingToUnscan, self.cursor.at))?;
        self.cursor = scanned.start;
        self.prev = None;
        self.pushback = Some(scanned);
        Ok(())
    }

    fn next_token(&mut self) -> Token {
        let Some(ch) = self.read() else {
            return Token::Eof;
        };

        if is_whitespace(ch) {
            self.unread();
            return self.scan_whitespace();
        }
        // A literal must start with a digit; ".5" is illegal.
        if ch.is_ascii_digit() {
            self.unread();
            return self.scan_ident();
        }

        Token::Illegal(ch)
    }

    /// Read the next character, or `None` at end of input.
    fn read(&mut self) -> Option<char> {
        let ch = *self.chars.get(self.cursor.pos)?;
        self.prev = Some(self.cursor);
        self.cursor.pos += 1;
        if ch == '\n' {
            self.cursor.at.line += 1;
            self.cursor.at.col = 0;
        } else {
            self.cursor.at.col += 1;
        }
        Some(ch)
    }

    /// Put back the character returned by the last `read`, restoring the
    /// position exactly (including the previous line's column).
    fn unread(&mut self) {
        if let Some(prev) = self.prev.take() {
            self.cursor = prev;
        }
    }

    fn scan_whitespace(&mut self) -> Token {
        let mut buf = String::new();
        while let Some(ch) = self.read() {
            if !is_whitespace(ch) {
                self.unread();
                break;
            }
            buf.push(ch);
        }
        Token::Whitespace(buf)
    }

    /// Digits and decimal points. Whether the point appears once is left
    /// to the numeric parse.
    fn scan_ident(&mut self) -> Token {
        let mut buf = String::new();
        while let Some(ch) = self.read() {
            if !(ch.is_ascii_digit() || is_decimal_point(ch)) {
                self.unread();
                break;
            }
            buf.push(ch);
        }
        Token::Ident(buf)
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_decimal_point(ch: char) -> bool {
    ch == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, col: usize) -> Position {
        Position { line, col }
    }

    #[test]
    fn scan_all_literals() {
        let mut t = Tokenizer::new("1345  135.8\n\t133.7");
        let mut idents = Vec::new();
        loop {
            match t.scan() {
                (Token::Eof, _) => break,
                (Token::Ident(_), lit) => idents.push(lit),
                (Token::Whitespace(_), _) => {}
                (other, _) => panic!("unexpected token {other:?}"),
            }
        }
        assert_eq!(idents, vec!["1345", "135.8", "133.7"]);
    }

    #[test]
    fn whitespace_run_is_one_token() {
        let mut t = Tokenizer::new("1 \t\n \n2");
        assert_eq!(t.scan().0, Token::Ident("1".into()));
        assert_eq!(t.scan(), (Token::Whitespace(" \t\n \n".into()), String::from(" \t\n \n")));
        assert_eq!(t.position(), pos(3, 0));
        assert_eq!(t.scan().0, Token::Ident("2".into()));
        assert_eq!(t.scan().0, Token::Eof);
    }

    #[test]
    fn carriage_return_is_whitespace() {
        let mut t = Tokenizer::new("1\r\n2");
        t.scan();
        assert_eq!(t.scan().0, Token::Whitespace("\r\n".into()));
        assert_eq!(t.scan().0, Token::Ident("2".into()));
    }

    #[test]
    fn malformed_literal_is_a_single_ident() {
        let mut t = Tokenizer::new("1.2.3 ");
        assert_eq!(t.scan(), (Token::Ident("1.2.3".into()), String::from("1.2.3")));
    }

    #[test]
    fn leading_decimal_point_is_illegal() {
        let mut t = Tokenizer::new(".5");
        assert_eq!(t.scan(), (Token::Illegal('.'), String::from(".")));
        assert_eq!(t.scan().0, Token::Ident("5".into()));
    }

    #[test]
    fn trailing_decimal_point_stays_in_literal() {
        let mut t = Tokenizer::new("5.");
        assert_eq!(t.scan().0, Token::Ident("5.".into()));
        assert_eq!(t.scan().0, Token::Eof);
    }

    #[test]
    fn other_characters_are_illegal() {
        let mut t = Tokenizer::new("abc");
        assert_eq!(t.scan(), (Token::Illegal('a'), String::from("a")));
        let mut t = Tokenizer::new("é");
        assert_eq!(t.scan().0, Token::Illegal('é'));
        let mut t = Tokenizer::new("-1");
        assert_eq!(t.scan().0, Token::Illegal('-'));
    }

    #[test]
    fn eof_is_not_illegal() {
        let mut t = Tokenizer::new("");
        assert_eq!(t.scan(), (Token::Eof, String::new()));
        assert_eq!(t.scan().0, Token::Eof);
    }

    #[test]
    fn eof_ends_literal() {
        let mut t = Tokenizer::new("42");
        assert_eq!(t.scan().0, Token::Ident("42".into()));
        assert_eq!(t.position(), pos(1, 2));
    }

    #[test]
    fn read_unread_restores_character_and_position() {
        let mut t = Tokenizer::new("a\nb");
        assert_eq!(t.read(), Some('a'));
        t.unread();
        assert_eq!(t.position(), pos(1, 0));
        assert_eq!(t.read(), Some('a'));
        assert_eq!(t.read(), Some('\n'));
        assert_eq!(t.position(), pos(2, 0));
        t.unread();
        assert_eq!(t.position(), pos(1, 1));
        assert_eq!(t.read(), Some('\n'));
        assert_eq!(t.read(), Some('b'));
        assert_eq!(t.read(), None);
    }

    #[test]
    fn read_counts_every_character() {
        let mut t = Tokenizer::new("abcdef\n123456");
        let mut n = 0;
        while t.read().is_some() {
            n += 1;
        }
        assert_eq!(n, 13);
        assert_eq!(t.position(), pos(2, 6));
    }

    #[test]
    fn unscan_replays_identical_token() {
        let mut t = Tokenizer::new("55 1 1");
        let first = t.scan();
        let after = t.position();
        t.unscan().unwrap();
        assert_eq!(t.position(), pos(1, 0));
        let second = t.scan();
        assert_eq!(first, second);
        assert_eq!(second, (Token::Ident("55".into()), String::from("55")));
        assert_eq!(t.position(), after);
    }

    #[test]
    fn unscan_restores_position_across_newline() {
        let mut t = Tokenizer::new("55 1\n56");
        t.scan(); // 55
        t.scan(); // ' '
        t.scan(); // 1
        let (tok, lit) = t.scan();
        assert_eq!(tok, Token::Whitespace("\n".into()));
        assert_eq!(t.position(), pos(2, 0));

        t.unscan().unwrap();
        assert_eq!(t.position(), pos(1, 4));

        assert_eq!(t.scan(), (tok, lit));
        assert_eq!(t.position(), pos(2, 0));
        assert_eq!(t.scan().0, Token::Ident("56".into()));
        assert_eq!(t.token_position(), pos(2, 0));
    }

    #[test]
    fn second_unscan_is_refused() {
        let mut t = Tokenizer::new("1 2");
        t.scan();
        t.unscan().unwrap();
        let err = t.unscan().unwrap_err();
        assert_eq!(err.kind, ErrorKind::PushbackOccupied);
        // The pushed-back token is still intact.
        assert_eq!(t.scan().0, Token::Ident("1".into()));
        assert_eq!(t.scan().0, Token::Whitespace(" ".into()));
    }

    #[test]
    fn unscan_before_scan_is_refused() {
        let mut t = Tokenizer::new("1");
        let err = t.unscan().unwrap_err();
        assert_eq!(err.kind, ErrorKind::NothingToUnscan);
        assert_eq!(t.scan().0, Token::Ident("1".into()));
    }

    #[test]
    fn unscan_after_replay_is_allowed() {
        let mut t = Tokenizer::new("7 8");
        t.scan();
        t.unscan().unwrap();
        t.scan();
        t.unscan().unwrap();
        assert_eq!(t.scan().0, Token::Ident("7".into()));
    }

    #[test]
    fn tokenizers_track_position_independently() {
        let mut a = Tokenizer::new("1\n2\n3");
        let mut b = Tokenizer::new("4 5");
        while a.scan().0 != Token::Eof {}
        b.scan();
        assert_eq!(a.position(), pos(3, 1));
        assert_eq!(b.position(), pos(1, 1));
    }

    #[test]
    fn from_reader_reads_everything() {
        let mut t = Tokenizer::from_reader("0.5 1 1\n".as_bytes()).unwrap();
        assert_eq!(t.scan().0, Token::Ident("0.5".into()));
    }
}
