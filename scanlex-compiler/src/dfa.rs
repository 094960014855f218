use crate::bitset::Bitset;
use crate::nfa::DynamicNfa;
use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp;
use thiserror::Error;

pub const INVALID_TARGET: u16 = u16::MAX;
const DENSE_SPAN_LIMIT: u32 = 128;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DfaState {
    pub first_transition: u32,
    pub transition_len: u32,
    /// Earliest-declared rule accepting in this state.
    pub accept_rule: Option<u16>,
    pub dense_offset: u32,
    pub dense_len: u32,
    pub dense_start: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DfaTransition {
    pub start: u32,
    pub end: u32,
    pub target: u16,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum DfaError {
    #[error("automaton exceeds {max} DFA states", max = INVALID_TARGET - 1)]
    StateOverflow,
}

/// Minimal DFA with per-state transition ranges sorted by `start` and
/// pairwise disjoint.
#[derive(Clone, Debug)]
pub struct DfaTables {
    pub states: Vec<DfaState>,
    pub transitions: Vec<DfaTransition>,
    pub dense: Vec<u16>,
    pub start: u16,
}

impl DfaTables {
    pub fn transitions_for(&self, state: u16) -> &[DfaTransition] {
        let Some(meta) = self.states.get(state as usize) else {
            return &[];
        };
        let start = cmp::min(meta.first_transition as usize, self.transitions.len());
        let end = cmp::min(start + meta.transition_len as usize, self.transitions.len());
        &self.transitions[start..end]
    }

    pub fn accept_rule(&self, state: u16) -> Option<u16> {
        self.states.get(state as usize).and_then(|meta| meta.accept_rule)
    }

    pub fn next_state(&self, state: u16, ch: u32) -> Option<u16> {
        let meta = self.states.get(state as usize)?;
        if meta.dense_len != 0 && ch >= meta.dense_start {
            let rel = ch - meta.dense_start;
            if rel < meta.dense_len {
                let target = *self.dense.get((meta.dense_offset + rel) as usize)?;
                return (target != INVALID_TARGET).then_some(target);
            }
        }
        let transitions = self.transitions_for(state);
        let idx = transitions.partition_point(|tr| tr.end < ch);
        transitions
            .get(idx)
            .filter(|tr| tr.start <= ch)
            .map(|tr| tr.target)
    }
}

pub fn build_dfa(nfa: &DynamicNfa) -> Result<DfaTables, DfaError> {
    let dfa = determinize(nfa)?;
    let mut dfa = minimize(dfa);
    populate_dense_tables(&mut dfa);
    Ok(dfa)
}

fn determinize(nfa: &DynamicNfa) -> Result<DfaTables, DfaError> {
    let mut dfa_states: Vec<DfaState> = Vec::new();
    let mut dfa_transitions: Vec<DfaTransition> = Vec::new();
    let mut subsets: Vec<Bitset> = Vec::new();
    let mut index: BTreeMap<Bitset, u16> = BTreeMap::new();

    let start = nfa.start_set();
    index.insert(start.clone(), 0);
    subsets.push(start);

    let mut cursor = 0;
    while cursor < subsets.len() {
        let subset = subsets[cursor].clone();
        let first = dfa_transitions.len();

        for (start, end, mut target) in partition_moves(nfa, &subset) {
            nfa.epsilon_closure(&mut target);
            let state_id = match index.get(&target) {
                Some(&existing) => existing,
                None => {
                    let new_id = u16::try_from(subsets.len())
                        .ok()
                        .filter(|id| *id != INVALID_TARGET)
                        .ok_or(DfaError::StateOverflow)?;
                    index.insert(target.clone(), new_id);
                    subsets.push(target);
                    new_id
                }
            };
            push_transition(&mut dfa_transitions, first, start, end, state_id);
        }

        dfa_states.push(DfaState {
            first_transition: first as u32,
            transition_len: (dfa_transitions.len() - first) as u32,
            accept_rule: nfa.best_accept(&subset),
            ..DfaState::default()
        });
        cursor += 1;
    }

    Ok(DfaTables {
        states: dfa_states,
        transitions: dfa_transitions,
        dense: Vec::new(),
        start: 0,
    })
}

/// Splits the outgoing edges of `subset` into disjoint ranges, each paired
/// with the NFA states reachable on any symbol of that range.
fn partition_moves(nfa: &DynamicNfa, subset: &Bitset) -> Vec<(u32, u32, Bitset)> {
    let width = nfa.states.len();
    let mut events: Vec<(u32, bool, u16)> = Vec::new();
    for state in subset.iter() {
        for edge in nfa.transitions_from(state) {
            events.push((edge.start, true, edge.to));
            events.push((edge.end.saturating_add(1), false, edge.to));
        }
    }
    events.sort_unstable_by_key(|&(position, _, _)| position);

    let mut counts = vec![0u32; width];
    let mut active = Bitset::new(width);
    let mut moves = Vec::new();
    let mut idx = 0;
    while idx < events.len() {
        let position = events[idx].0;
        while let Some(&(at, opens, target)) = events.get(idx) {
            if at != position {
                break;
            }
            let slot = target as usize;
            if opens {
                counts[slot] += 1;
                active.insert(slot);
            } else {
                counts[slot] -= 1;
                if counts[slot] == 0 {
                    active.remove(slot);
                }
            }
            idx += 1;
        }
        if let Some(&(next, _, _)) = events.get(idx) {
            if !active.is_empty() {
                moves.push((position, next - 1, active.clone()));
            }
        }
    }
    moves
}

fn push_transition(
    transitions: &mut Vec<DfaTransition>,
    first: usize,
    start: u32,
    end: u32,
    target: u16,
) {
    if transitions.len() > first {
        if let Some(last) = transitions.last_mut() {
            if last.target == target && last.end.checked_add(1) == Some(start) {
                last.end = end;
                return;
            }
        }
    }
    transitions.push(DfaTransition { start, end, target });
}

fn minimize(dfa: DfaTables) -> DfaTables {
    let state_count = dfa.states.len();
    if state_count <= 1 {
        return dfa;
    }

    let (mut block_ids, mut block_count) =
        assign_blocks(dfa.states.iter().map(|state| state.accept_rule));

    loop {
        let (refined, refined_count) = assign_blocks((0..state_count).map(|idx| {
            (
                block_ids[idx],
                transition_signature(&dfa, idx as u16, &block_ids),
            )
        }));
        block_ids = refined;
        if refined_count == block_count {
            break;
        }
        block_count = refined_count;
    }

    let mut representative = vec![None::<usize>; block_count];
    for (idx, block) in block_ids.iter().enumerate() {
        representative[*block] = representative[*block].or(Some(idx));
    }

    let mut new_states = Vec::with_capacity(block_count);
    let mut new_transitions = Vec::new();

    for idx in representative.into_iter().flatten() {
        let first = new_transitions.len();
        for trans in dfa.transitions_for(idx as u16) {
            let target = block_ids[trans.target as usize] as u16;
            push_transition(&mut new_transitions, first, trans.start, trans.end, target);
        }
        new_states.push(DfaState {
            first_transition: first as u32,
            transition_len: (new_transitions.len() - first) as u32,
            accept_rule: dfa.states[idx].accept_rule,
            ..DfaState::default()
        });
    }

    DfaTables {
        start: block_ids[dfa.start as usize] as u16,
        states: new_states,
        transitions: new_transitions,
        dense: Vec::new(),
    }
}

/// Numbers keys in order of first appearance.
fn assign_blocks<K: Ord>(keys: impl Iterator<Item = K>) -> (Vec<usize>, usize) {
    let mut seen: BTreeMap<K, usize> = BTreeMap::new();
    let ids = keys
        .map(|key| {
            let next = seen.len();
            *seen.entry(key).or_insert(next)
        })
        .collect();
    (ids, seen.len())
}

fn transition_signature(dfa: &DfaTables, state: u16, block_ids: &[usize]) -> Vec<(u32, u32, usize)> {
    let mut signature: Vec<(u32, u32, usize)> = Vec::new();
    for trans in dfa.transitions_for(state) {
        let block = block_ids[trans.target as usize];
        match signature.last_mut() {
            Some(last) if last.2 == block && last.1.checked_add(1) == Some(trans.start) => {
                last.1 = trans.end;
            }
            _ => signature.push((trans.start, trans.end, block)),
        }
    }
    signature
}

fn populate_dense_tables(dfa: &mut DfaTables) {
    dfa.dense.clear();
    for state in dfa.states.iter_mut() {
        state.dense_offset = 0;
        state.dense_len = 0;
        state.dense_start = 0;

        let start = state.first_transition as usize;
        let len = state.transition_len as usize;
        let Some(transitions) = dfa.transitions.get(start..start + len) else {
            continue;
        };
        let (Some(first), Some(last)) = (transitions.first(), transitions.last()) else {
            continue;
        };

        let min = first.start;
        let max = last.end;
        let span = max - min + 1;
        if max - min >= DENSE_SPAN_LIMIT {
            continue;
        }

        let coverage: u32 = transitions.iter().map(|tr| tr.end - tr.start + 1).sum();
        if coverage * 2 < span {
            continue;
        }

        let offset = dfa.dense.len();
        dfa.dense.resize(offset + span as usize, INVALID_TARGET);
        for tr in transitions {
            for value in tr.start..=tr.end {
                dfa.dense[offset + (value - min) as usize] = tr.target;
            }
        }

        state.dense_offset = offset as u32;
        state.dense_len = span;
        state.dense_start = min;
    }
}
