use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::token::Token;

/// A recoverable problem found while reading, parsing or evaluating a
/// statement. None of these stop the run; each one is reported and a
/// substitute value or token skip takes its place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("unrecognized character `{0}`")]
    UnrecognizedCharacter(char),
    #[error("invalid number `{0}`, replacing with -1")]
    InvalidNumber(String),
    #[error("invalid variable `{0}`")]
    UndefinedVariable(String),
    #[error("unexpected assignment")]
    UnexpectedAssignment,
    #[error("unexpected {0}")]
    UnexpectedToken(Token),
    #[error("unexpected end of input in expression")]
    UnexpectedEndOfInput,
    #[error("expected {expected}, found {found}")]
    ExpectedToken { expected: &'static str, found: Token },
}

impl Diagnostic {
    /// Short classification string used for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Diagnostic::UnrecognizedCharacter(_) => "lexical",
            Diagnostic::InvalidNumber(_) => "numeric-format",
            Diagnostic::UndefinedVariable(_) => "undefined-variable",
            Diagnostic::UnexpectedAssignment
            | Diagnostic::UnexpectedToken(_)
            | Diagnostic::ExpectedToken { .. } => "syntax",
            Diagnostic::UnexpectedEndOfInput => "end-of-input",
        }
    }
}

/// Ordered collector for diagnostics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!(category = diagnostic.category(), %diagnostic, "diagnostic reported");
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Empties the collector, returning everything reported so far.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }
}

/// Failures that do stop the run.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
