#![no_std]
#![forbid(unsafe_code)]
#![doc = "Automaton construction for scanlex: regex parsing, Thompson NFA, subset construction and minimisation."]

extern crate alloc;

mod bitset;
mod dfa;
mod nfa;
mod pattern;

pub use crate::bitset::Bitset;
pub use crate::dfa::{DfaError, DfaState, DfaTables, DfaTransition, INVALID_TARGET, build_dfa};
pub use crate::nfa::{DynamicNfa, NfaEpsilon, NfaError, NfaSpec, NfaState, NfaTransition, build_nfa};
pub use crate::pattern::{
    ClassAtom, ParsedPattern, PatternError, PatternExpr, PatternOptions, parse_pattern,
};
