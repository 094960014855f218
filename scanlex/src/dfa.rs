use crate::automaton::{Automaton, Match};
use scanlex_compiler::DfaTables;

/// Table-driven minimal DFA over Unicode scalar values.
#[derive(Clone, Debug)]
pub struct Dfa {
    tables: DfaTables,
    token_ids: Vec<u32>,
}

impl Dfa {
    pub(crate) fn new(tables: DfaTables, token_ids: Vec<u32>) -> Self {
        Self { tables, token_ids }
    }

    pub fn state_count(&self) -> usize {
        self.tables.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.tables.transitions.len()
    }

    /// Token id of the rule declared at `rule`.
    pub fn token_id(&self, rule: usize) -> Option<u32> {
        self.token_ids.get(rule).copied()
    }
}

impl Automaton for Dfa {
    fn match_longest(&self, input: &str, position: usize) -> Option<Match> {
        let rest = input.get(position..)?;
        let mut state = self.tables.start;
        let mut best: Option<(usize, u16)> = None;

        for (offset, ch) in rest.char_indices() {
            let Some(next) = self.tables.next_state(state, ch as u32) else {
                break;
            };
            state = next;
            if let Some(rule) = self.tables.accept_rule(state) {
                best = Some((offset + ch.len_utf8(), rule));
            }
        }

        let (len, rule) = best?;
        Some(Match {
            len,
            rule: rule as usize,
            token_id: self.token_id(rule as usize)?,
        })
    }

    fn rule_count(&self) -> usize {
        self.token_ids.len()
    }
}
