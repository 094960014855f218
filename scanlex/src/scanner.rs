//! Maximal-munch scanning.
//!
//! [`Scanner`] walks an input buffer with an [`Automaton`], yielding one
//! token per step and advancing past it. [`scan`] drives a scanner and hands
//! each token to a [`TokenConsumer`], which decides whether to keep going.

use crate::automaton::Automaton;
use crate::error::LexicalFailure;
use crate::token::Token;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Returned by a [`TokenConsumer`] after each token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Receives tokens synchronously, in input order.
///
/// A consumer owns or exclusively borrows whatever it accumulates. Domain
/// errors are reported by returning [`Flow::Stop`] and recording the problem
/// out of band.
pub trait TokenConsumer {
    fn on_token(&mut self, token: Token<'_>) -> Flow;
}

impl<F> TokenConsumer for F
where
    F: FnMut(Token<'_>) -> Flow,
{
    fn on_token(&mut self, token: Token<'_>) -> Flow {
        self(token)
    }
}

/// Outcome of a complete [`scan`].
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanResult {
    /// The input was consumed, or the consumer asked to stop.
    Completed,
    /// No rule matches at byte offset `at`.
    Failed { at: usize },
}

impl ScanResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn failure_offset(&self) -> Option<usize> {
        match *self {
            Self::Completed => None,
            Self::Failed { at } => Some(at),
        }
    }

    /// The input left unconsumed by a failed scan.
    pub fn remainder<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.failure_offset().and_then(|at| input.get(at..))
    }

    pub fn into_result(self, input: &str) -> Result<(), LexicalFailure> {
        match self {
            Self::Completed => Ok(()),
            Self::Failed { at } => Err(LexicalFailure::new(input, at)),
        }
    }
}

/// Byte offset of the next unscanned character. Only moves forward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanCursor {
    position: usize,
}

impl ScanCursor {
    pub fn position(&self) -> usize {
        self.position
    }

    fn advance(&mut self, len: usize) {
        self.position += len;
    }
}

/// Iterator over the tokens of one input.
///
/// Yields `Err` once, at the first position no rule matches, and nothing
/// after that.
pub struct Scanner<'a, A: ?Sized> {
    automaton: &'a A,
    input: &'a str,
    cursor: ScanCursor,
    failed: bool,
}

impl<'a, A> Scanner<'a, A>
where
    A: Automaton + ?Sized,
{
    pub fn new(automaton: &'a A, input: &'a str) -> Self {
        Self {
            automaton,
            input,
            cursor: ScanCursor::default(),
            failed: false,
        }
    }

    pub fn cursor(&self) -> ScanCursor {
        self.cursor
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// The input not yet consumed.
    pub fn remainder(&self) -> &'a str {
        self.input.get(self.cursor.position()..).unwrap_or_default()
    }

    fn fail(&mut self, at: usize) -> LexicalFailure {
        self.failed = true;
        debug!(offset = at, "no rule matches");
        LexicalFailure::new(self.input, at)
    }
}

impl<'a, A> Iterator for Scanner<'a, A>
where
    A: Automaton + ?Sized,
{
    type Item = Result<Token<'a>, LexicalFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor.position();
        if self.failed || start >= self.input.len() {
            return None;
        }

        let found = self.automaton.match_longest(self.input, start);
        let lexeme = found.and_then(|found| {
            let end = start.checked_add(found.len)?;
            self.input.get(start..end).filter(|lexeme| !lexeme.is_empty())
        });

        match (found, lexeme) {
            (Some(found), Some(lexeme)) => {
                self.cursor.advance(lexeme.len());
                trace!(id = found.token_id, start, len = lexeme.len(), "token");
                Some(Ok(Token {
                    id: found.token_id,
                    rule: found.rule,
                    start,
                    lexeme,
                }))
            }
            _ => Some(Err(self.fail(start))),
        }
    }
}

impl<A> FusedIterator for Scanner<'_, A> where A: Automaton + ?Sized {}

/// Tokenize `input` from the start, handing every token to `consumer`.
///
/// Returns [`ScanResult::Completed`] when the whole input was consumed or
/// the consumer returned [`Flow::Stop`], and [`ScanResult::Failed`] with the
/// offset of the first character no rule matches. Tokens produced before a
/// failure have already been delivered.
pub fn scan<A, C>(automaton: &A, input: &str, consumer: &mut C) -> ScanResult
where
    A: Automaton + ?Sized,
    C: TokenConsumer + ?Sized,
{
    for step in Scanner::new(automaton, input) {
        match step {
            Ok(token) => {
                if consumer.on_token(token) == Flow::Stop {
                    debug!(offset = token.end(), "consumer stopped scan");
                    return ScanResult::Completed;
                }
            }
            Err(failure) => return ScanResult::Failed { at: failure.at },
        }
    }
    ScanResult::Completed
}

/// Collects every token of `input`, or the first failure.
pub fn tokenize<'a, A>(automaton: &'a A, input: &'a str) -> Result<Vec<Token<'a>>, LexicalFailure>
where
    A: Automaton + ?Sized,
{
    Scanner::new(automaton, input).collect()
}
