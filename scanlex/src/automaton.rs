use std::rc::Rc;
use std::sync::Arc;

/// Longest match found at one input position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Length in bytes, always greater than zero.
    pub len: usize,
    /// Declaration order of the winning rule.
    pub rule: usize,
    pub token_id: u32,
}

/// A compiled matcher the scanner can drive.
///
/// Implementations return the longest non-empty prefix of
/// `input[position..]` matched by any rule, resolving equal lengths in favour
/// of the earliest-declared rule. Matching never looks past the end of
/// `input`. `None` means no rule matches even one character at `position`,
/// including when `position` is at the end of the input or not on a
/// character boundary.
pub trait Automaton {
    fn match_longest(&self, input: &str, position: usize) -> Option<Match>;

    /// Number of rules the automaton was compiled from.
    fn rule_count(&self) -> usize;
}

impl<A: Automaton + ?Sized> Automaton for &A {
    fn match_longest(&self, input: &str, position: usize) -> Option<Match> {
        (**self).match_longest(input, position)
    }

    fn rule_count(&self) -> usize {
        (**self).rule_count()
    }
}

impl<A: Automaton + ?Sized> Automaton for Box<A> {
    fn match_longest(&self, input: &str, position: usize) -> Option<Match> {
        (**self).match_longest(input, position)
    }

    fn rule_count(&self) -> usize {
        (**self).rule_count()
    }
}

impl<A: Automaton + ?Sized> Automaton for Rc<A> {
    fn match_longest(&self, input: &str, position: usize) -> Option<Match> {
        (**self).match_longest(input, position)
    }

    fn rule_count(&self) -> usize {
        (**self).rule_count()
    }
}

impl<A: Automaton + ?Sized> Automaton for Arc<A> {
    fn match_longest(&self, input: &str, position: usize) -> Option<Match> {
        (**self).match_longest(input, position)
    }

    fn rule_count(&self) -> usize {
        (**self).rule_count()
    }
}
