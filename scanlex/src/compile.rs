use crate::dfa::Dfa;
use crate::error::{CompileError, RuleError};
use crate::nfa::Nfa;
use crate::rules::{Rule, RuleSet};
use scanlex_compiler::{
    DynamicNfa, NfaError, NfaSpec, PatternError, build_dfa as build_dfa_tables, build_nfa,
};
use tracing::{debug, warn};

/// Rule indices are stored as `u16` in the automaton tables.
pub const MAX_RULES: usize = u16::MAX as usize;

/// Compile a rule set into a minimal table-driven DFA.
///
/// The automaton is built once and is read-only afterwards: it holds no
/// per-scan state and can be shared between threads running independent
/// scans.
///
/// Among rules matching the same longest prefix, the one declared first
/// wins. Rules that can match the empty string are accepted, but their empty
/// matches are never reported.
pub fn compile(rules: &RuleSet) -> Result<Dfa, RuleError> {
    let nfa = build_rule_nfa(rules)?;
    let tables = build_dfa_tables(&nfa).map_err(|_| CompileError::StateOverflow)?;
    debug!(
        rules = rules.len(),
        nfa_states = nfa.states.len(),
        dfa_states = tables.states.len(),
        dfa_transitions = tables.transitions.len(),
        "compiled rule set"
    );
    Ok(Dfa::new(tables, token_ids(rules)))
}

/// Compile a rule set into a Thompson NFA simulated at match time.
///
/// Slower than [`compile`] but skips subset construction, which makes it a
/// useful reference matcher.
pub fn compile_nfa(rules: &RuleSet) -> Result<Nfa, RuleError> {
    let nfa = build_rule_nfa(rules)?;
    debug!(
        rules = rules.len(),
        nfa_states = nfa.states.len(),
        "built rule set NFA"
    );
    Ok(Nfa::new(nfa, token_ids(rules)))
}

fn build_rule_nfa(rules: &RuleSet) -> Result<DynamicNfa, RuleError> {
    if rules.len() > MAX_RULES {
        return Err(CompileError::TooManyRules {
            count: rules.len(),
            max: MAX_RULES,
        }
        .into());
    }

    let mut specs = Vec::with_capacity(rules.len());
    for rule in rules.rules() {
        let pattern = rule
            .parsed()
            .lower()
            .map_err(|err| lowering_error(rule, err))?;
        if rule.matches_empty() {
            warn!(
                rule = rule.declaration_order(),
                pattern = rule.pattern(),
                "rule matches the empty string; empty matches are never reported"
            );
        }
        specs.push(NfaSpec {
            pattern,
            rule: rule.declaration_order() as u16,
        });
    }

    build_nfa(&specs).map_err(|err| {
        let err = match err {
            NfaError::StateOverflow => CompileError::StateOverflow,
            NfaError::InvalidRepeat => CompileError::InvalidRepeat,
        };
        RuleError::from(err)
    })
}

fn lowering_error(rule: &Rule, err: PatternError) -> RuleError {
    match err {
        PatternError::Unsupported(construct) => CompileError::Unsupported {
            rule: rule.declaration_order(),
            pattern: rule.pattern().to_owned(),
            construct,
        }
        .into(),
        PatternError::Syntax(message) => RuleError::InvalidPattern {
            rule: rule.declaration_order(),
            pattern: rule.pattern().to_owned(),
            message,
        },
    }
}

fn token_ids(rules: &RuleSet) -> Vec<u32> {
    rules.rules().iter().map(Rule::token_id).collect()
}
