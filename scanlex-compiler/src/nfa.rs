use crate::bitset::Bitset;
use crate::pattern::{ClassAtom, PatternExpr};
use alloc::vec;
use alloc::vec::Vec;
use thiserror::Error;

/// One rule fed into the NFA builder. `rule` doubles as the priority:
/// lower indices win ties.
#[derive(Clone, Debug)]
pub struct NfaSpec {
    pub pattern: PatternExpr,
    pub rule: u16,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum NfaError {
    #[error("automaton exceeds {max} NFA states", max = u16::MAX)]
    StateOverflow,
    #[error("repetition has a maximum below its minimum")]
    InvalidRepeat,
}

#[derive(Clone, Debug, Default)]
pub struct NfaState {
    pub accept_rule: Option<u16>,
}

#[derive(Clone, Debug)]
pub struct NfaTransition {
    pub from: u16,
    pub to: u16,
    pub start: u32,
    pub end: u32,
}

#[derive(Clone, Debug)]
pub struct NfaEpsilon {
    pub from: u16,
    pub to: u16,
}

/// Thompson NFA over Unicode scalar ranges.
///
/// Edges are grouped by source state once construction finishes, so
/// [`DynamicNfa::transitions_from`] and [`DynamicNfa::epsilons_from`] are
/// slice lookups.
#[derive(Clone, Debug)]
pub struct DynamicNfa {
    pub states: Vec<NfaState>,
    pub transitions: Vec<NfaTransition>,
    pub epsilons: Vec<NfaEpsilon>,
    pub start: u16,
    transition_offsets: Vec<usize>,
    epsilon_offsets: Vec<usize>,
}

pub fn build_nfa(specs: &[NfaSpec]) -> Result<DynamicNfa, NfaError> {
    let mut nfa = DynamicNfa {
        states: Vec::new(),
        transitions: Vec::new(),
        epsilons: Vec::new(),
        start: 0,
        transition_offsets: Vec::new(),
        epsilon_offsets: Vec::new(),
    };

    let start = nfa.add_state()?;
    nfa.start = start;

    for spec in specs {
        let (pat_start, pat_end) = compile_pattern(&mut nfa, &spec.pattern)?;
        nfa.add_epsilon(start, pat_start);
        nfa.mark_accept(pat_end, spec.rule);
    }

    nfa.group_edges();
    Ok(nfa)
}

impl DynamicNfa {
    fn add_state(&mut self) -> Result<u16, NfaError> {
        if self.states.len() >= u16::MAX as usize {
            return Err(NfaError::StateOverflow);
        }
        self.states.push(NfaState::default());
        Ok((self.states.len() - 1) as u16)
    }

    fn mark_accept(&mut self, state: u16, rule: u16) {
        if let Some(entry) = self.states.get_mut(state as usize) {
            entry.accept_rule = Some(entry.accept_rule.map_or(rule, |current| current.min(rule)));
        }
    }

    fn add_transition(&mut self, from: u16, to: u16, start: u32, end: u32) {
        self.transitions.push(NfaTransition {
            from,
            to,
            start,
            end,
        });
    }

    fn add_epsilon(&mut self, from: u16, to: u16) {
        self.epsilons.push(NfaEpsilon { from, to });
    }

    fn group_edges(&mut self) {
        let count = self.states.len();
        self.transitions.sort_by_key(|edge| edge.from);
        self.epsilons.sort_by_key(|edge| edge.from);
        self.transition_offsets = offsets(count, self.transitions.iter().map(|edge| edge.from));
        self.epsilon_offsets = offsets(count, self.epsilons.iter().map(|edge| edge.from));
    }

    pub fn transitions_from(&self, state: usize) -> &[NfaTransition] {
        edge_slice(&self.transitions, &self.transition_offsets, state)
    }

    pub fn epsilons_from(&self, state: usize) -> &[NfaEpsilon] {
        edge_slice(&self.epsilons, &self.epsilon_offsets, state)
    }

    /// Extends `set` in place with every state reachable through ε-edges.
    pub fn epsilon_closure(&self, set: &mut Bitset) {
        let mut stack: Vec<usize> = set.iter().collect();
        while let Some(state) = stack.pop() {
            for eps in self.epsilons_from(state) {
                if set.insert(eps.to as usize) {
                    stack.push(eps.to as usize);
                }
            }
        }
    }

    /// The winning rule among the accepting states of `set`.
    pub fn best_accept(&self, set: &Bitset) -> Option<u16> {
        set.iter()
            .filter_map(|idx| self.states.get(idx).and_then(|state| state.accept_rule))
            .min()
    }

    pub fn start_set(&self) -> Bitset {
        let mut set = Bitset::new(self.states.len());
        set.insert(self.start as usize);
        self.epsilon_closure(&mut set);
        set
    }
}

fn offsets(count: usize, sources: impl Iterator<Item = u16>) -> Vec<usize> {
    let mut offsets = vec![0usize; count + 1];
    for from in sources {
        offsets[from as usize + 1] += 1;
    }
    for idx in 1..offsets.len() {
        offsets[idx] += offsets[idx - 1];
    }
    offsets
}

fn edge_slice<'a, E>(edges: &'a [E], offsets: &[usize], state: usize) -> &'a [E] {
    match (offsets.get(state), offsets.get(state + 1)) {
        (Some(&start), Some(&end)) => &edges[start..end],
        _ => &[],
    }
}

fn compile_pattern(nfa: &mut DynamicNfa, pattern: &PatternExpr) -> Result<(u16, u16), NfaError> {
    match pattern {
        PatternExpr::Empty => {
            let start = nfa.add_state()?;
            let end = nfa.add_state()?;
            nfa.add_epsilon(start, end);
            Ok((start, end))
        }
        PatternExpr::Literal(chars) => {
            let mut prev = nfa.add_state()?;
            let start = prev;
            for &ch in chars {
                let next = nfa.add_state()?;
                nfa.add_transition(prev, next, ch as u32, ch as u32);
                prev = next;
            }
            Ok((start, prev))
        }
        PatternExpr::Class(atoms) => {
            let start = nfa.add_state()?;
            let end = nfa.add_state()?;
            emit_class(nfa, start, end, atoms);
            Ok((start, end))
        }
        PatternExpr::Sequence(parts) => compile_sequence(nfa, parts),
        PatternExpr::Alternate(parts) => compile_alternate(nfa, parts),
        PatternExpr::Repeat { inner, min, max } => compile_repeat(nfa, inner, *min, *max),
    }
}

fn compile_sequence(nfa: &mut DynamicNfa, parts: &[PatternExpr]) -> Result<(u16, u16), NfaError> {
    let mut iter = parts.iter();
    let Some(first) = iter.next() else {
        return compile_pattern(nfa, &PatternExpr::Empty);
    };
    let (start, mut end) = compile_pattern(nfa, first)?;
    for part in iter {
        let (next_start, next_end) = compile_pattern(nfa, part)?;
        nfa.add_epsilon(end, next_start);
        end = next_end;
    }
    Ok((start, end))
}

fn compile_alternate(nfa: &mut DynamicNfa, parts: &[PatternExpr]) -> Result<(u16, u16), NfaError> {
    let start = nfa.add_state()?;
    let end = nfa.add_state()?;
    if parts.is_empty() {
        nfa.add_epsilon(start, end);
        return Ok((start, end));
    }
    for part in parts {
        let (branch_start, branch_end) = compile_pattern(nfa, part)?;
        nfa.add_epsilon(start, branch_start);
        nfa.add_epsilon(branch_end, end);
    }
    Ok((start, end))
}

fn compile_repeat(
    nfa: &mut DynamicNfa,
    pattern: &PatternExpr,
    min: u32,
    max: Option<u32>,
) -> Result<(u16, u16), NfaError> {
    if max.is_some_and(|max| max < min) {
        return Err(NfaError::InvalidRepeat);
    }
    let start = nfa.add_state()?;
    let end = nfa.add_state()?;
    let mut current = start;

    for _ in 0..min {
        let (seg_start, seg_end) = compile_pattern(nfa, pattern)?;
        nfa.add_epsilon(current, seg_start);
        current = seg_end;
    }

    nfa.add_epsilon(current, end);

    match max {
        Some(limit) => {
            let mut prev_end = current;
            for _ in min..limit {
                let (seg_start, seg_end) = compile_pattern(nfa, pattern)?;
                nfa.add_epsilon(prev_end, seg_start);
                nfa.add_epsilon(seg_end, end);
                prev_end = seg_end;
            }
        }
        None => {
            let (seg_start, seg_end) = compile_pattern(nfa, pattern)?;
            nfa.add_epsilon(current, seg_start);
            nfa.add_epsilon(seg_end, current);
            nfa.add_epsilon(seg_end, end);
        }
    }

    Ok((start, end))
}

fn emit_class(nfa: &mut DynamicNfa, from: u16, to: u16, atoms: &[ClassAtom]) {
    for atom in atoms {
        let (start, end) = atom.bounds();
        nfa.add_transition(from, to, start, end);
    }
}
