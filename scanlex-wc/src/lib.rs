//! Line, word and character counting on top of a three-rule lexicon.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use scanlex::{Flow, Lexicon, RuleError, ScanResult, SourceError, Token, TokenConsumer, scan};
use thiserror::Error;

#[derive(Lexicon, Copy, Clone, Debug, PartialEq, Eq)]
pub enum WordCount {
    #[regex(r"[^ \t\n]+")]
    Word = 1000,
    #[token("\n")]
    Eol,
    #[regex(".")]
    Char,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
}

impl TokenConsumer for Counts {
    fn on_token(&mut self, token: Token<'_>) -> Flow {
        match WordCount::classify(&token) {
            Some(WordCount::Word) => {
                self.words += 1;
                self.characters += token.lexeme.chars().count();
            }
            Some(WordCount::Eol) => {
                self.lines += 1;
                self.characters += 1;
            }
            Some(WordCount::Char) => self.characters += 1,
            None => {}
        }
        Flow::Continue
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum WcError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rules(#[from] RuleError),
}

/// Counts `input`, returning the totals reached so far and how the scan
/// ended.
pub fn count(input: &str) -> Result<(Counts, ScanResult), WcError> {
    let dfa = WordCount::compile()?;
    let mut counts = Counts::default();
    let result = scan(&dfa, input, &mut counts);
    Ok((counts, result))
}
