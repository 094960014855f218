#![forbid(unsafe_code)]
#![doc = "scanlex: a longest-match lexical scanner built on a compiled DFA."]

mod automaton;
mod compile;
mod dfa;
mod error;
mod lexicon;
mod nfa;
mod rules;
mod scanner;
mod source;
mod token;

pub use automaton::{Automaton, Match};
pub use compile::{MAX_RULES, compile, compile_nfa};
pub use dfa::Dfa;
pub use error::{CompileError, LexicalFailure, RuleError, SourceError};
pub use lexicon::Lexicon;
pub use nfa::Nfa;
pub use rules::{Rule, RuleSet};
pub use scanlex_compiler::PatternOptions;
pub use scanner::{Flow, ScanCursor, ScanResult, Scanner, TokenConsumer, scan, tokenize};
pub use source::read_source;
pub use token::Token;

#[cfg(feature = "derive")]
pub use scanlex_macros::Lexicon;

pub mod prelude {
    pub use crate::automaton::{Automaton, Match};
    pub use crate::compile::{compile, compile_nfa};
    pub use crate::dfa::Dfa;
    pub use crate::error::{CompileError, LexicalFailure, RuleError, SourceError};
    pub use crate::lexicon::Lexicon;
    pub use crate::nfa::Nfa;
    pub use crate::rules::{Rule, RuleSet};
    pub use crate::scanner::{Flow, ScanResult, Scanner, TokenConsumer, scan, tokenize};
    pub use crate::token::Token;
    pub use scanlex_compiler::PatternOptions;
    #[cfg(feature = "derive")]
    pub use scanlex_macros::Lexicon;
}
