//! Beat annotations — characters → tokens → beats → bars and tempo.

pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod token;
pub mod validate;

pub use error::{BeatError, ErrorKind, Violation};
pub use model::*;
pub use validate::{Outcome, Tolerances, Validation, Validator, Warning};

use lexer::Tokenizer;
use parser::Parser;

/// Runs the whole beat-annotation pipeline.
pub struct Analyzer;

impl Analyzer {
    /// Parse annotation text into beats, in input order.
    pub fn parse(source: &str) -> Result<Vec<Beat>, BeatError> {
        Parser::new(Tokenizer::new(source)).parse()
    }

    /// Parse and validate annotation text.
    ///
    /// Input without any beats validates to [`Outcome::NoBars`]; callers
    /// that need to tell "no beats" apart should call [`Analyzer::parse`]
    /// and [`Validator::validate`] themselves.
    pub fn analyze(source: &str, tolerances: &Tolerances) -> Result<Validation, BeatError> {
        let beats = Self::parse(source)?;
        Validator::new(*tolerances).validate(&beats)
    }
}
