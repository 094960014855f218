//! Error types.
//!
//! Rule and compile errors surface once, when an automaton is built. A scan
//! never returns them; it reports a [`LexicalFailure`] instead, which carries
//! the byte offset where no rule matched so callers can render it with
//! [`miette`] against the scanned input.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::{Diagnostic, SourceSpan};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// An error raised while building a rule set or compiling it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RuleError {
    /// The pattern is not a valid regular expression.
    #[error("rule {rule}: invalid pattern `{pattern}`: {message}")]
    #[diagnostic(code(scanlex::invalid_pattern))]
    InvalidPattern {
        rule: usize,
        pattern: String,
        message: String,
    },

    /// The rule set is valid but cannot be turned into an automaton.
    #[error(transparent)]
    #[diagnostic(code(scanlex::compile))]
    Compile(#[from] CompileError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("rule {rule}: pattern `{pattern}` uses an unsupported {construct}")]
    Unsupported {
        rule: usize,
        pattern: String,
        construct: &'static str,
    },

    #[error("repetition has a maximum below its minimum")]
    InvalidRepeat,

    #[error("rule set is too large for the automaton")]
    StateOverflow,

    #[error("{count} rules given, at most {max} are supported")]
    TooManyRules { count: usize, max: usize },
}

/// No rule matches the input at `at`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("lexical analysis failed at offset {at}")]
#[diagnostic(
    code(scanlex::lexical_failure),
    help("no rule matches the input starting here")
)]
pub struct LexicalFailure {
    /// Byte offset of the first unconsumed character.
    pub at: usize,
    #[label("stopped here")]
    pub span: SourceSpan,
}

impl LexicalFailure {
    /// Builds a failure at `at`, labelling the character found there.
    #[must_use]
    pub fn new(input: &str, at: usize) -> Self {
        let width = input
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        Self {
            at,
            span: SourceSpan::new(at.into(), width),
        }
    }

    /// The unconsumed remainder of `input`, starting at the failure offset.
    #[must_use]
    pub fn remainder<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.at..).unwrap_or_default()
    }
}

/// Reading scanner input from disk failed.
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("could not open file: {}", path.display())]
    #[diagnostic(code(scanlex::source_open))]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read file: {}", path.display())]
    #[diagnostic(code(scanlex::source_read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
