use crate::automaton::{Automaton, Match};
use scanlex_compiler::{Bitset, DynamicNfa};
use std::mem;

/// Thompson NFA simulated one character at a time.
///
/// Produces the same matches as [`crate::Dfa`] for the same rule set.
#[derive(Clone, Debug)]
pub struct Nfa {
    nfa: DynamicNfa,
    token_ids: Vec<u32>,
}

impl Nfa {
    pub(crate) fn new(nfa: DynamicNfa, token_ids: Vec<u32>) -> Self {
        Self { nfa, token_ids }
    }

    pub fn state_count(&self) -> usize {
        self.nfa.states.len()
    }
}

impl Automaton for Nfa {
    fn match_longest(&self, input: &str, position: usize) -> Option<Match> {
        let rest = input.get(position..)?;
        let mut current = self.nfa.start_set();
        let mut next = Bitset::new(self.nfa.states.len());
        let mut best: Option<(usize, u16)> = None;

        for (offset, ch) in rest.char_indices() {
            let code = ch as u32;
            next.clear();
            for state in current.iter() {
                for edge in self.nfa.transitions_from(state) {
                    if edge.start <= code && code <= edge.end {
                        next.insert(edge.to as usize);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            self.nfa.epsilon_closure(&mut next);
            if let Some(rule) = self.nfa.best_accept(&next) {
                best = Some((offset + ch.len_utf8(), rule));
            }
            mem::swap(&mut current, &mut next);
        }

        let (len, rule) = best?;
        Some(Match {
            len,
            rule: rule as usize,
            token_id: *self.token_ids.get(rule as usize)?,
        })
    }

    fn rule_count(&self) -> usize {
        self.token_ids.len()
    }
}
