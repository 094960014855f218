//! Ordered pattern rules.
//!
//! A [`RuleSet`] is the input to the automaton compiler. Each rule pairs a
//! regular expression with a caller-chosen token id, and the order rules are
//! added in is the order that breaks ties between equally long matches.
//!
//! ```
//! use scanlex::{Automaton, RuleSet};
//!
//! let mut rules = RuleSet::new();
//! rules.add("[0-9]+", 1).unwrap();
//! rules.add("[a-z]+", 2).unwrap();
//! let dfa = rules.compile().unwrap();
//!
//! let found = dfa.match_longest("abc123", 0).unwrap();
//! assert_eq!((found.len, found.token_id), (3, 2));
//! ```

use crate::compile::{compile, compile_nfa};
use crate::dfa::Dfa;
use crate::error::RuleError;
use crate::nfa::Nfa;
use scanlex_compiler::{ParsedPattern, PatternOptions, parse_pattern};

#[derive(Clone, Debug)]
pub struct Rule {
    pattern: String,
    token_id: u32,
    declaration_order: usize,
    parsed: ParsedPattern,
}

impl Rule {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn token_id(&self) -> u32 {
        self.token_id
    }

    pub fn declaration_order(&self) -> usize {
        self.declaration_order
    }

    /// Whether the pattern also matches the empty string. Such matches are
    /// never reported by a scan.
    pub fn matches_empty(&self) -> bool {
        self.parsed.matches_empty()
    }

    pub(crate) fn parsed(&self) -> &ParsedPattern {
        &self.parsed
    }
}

#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    options: PatternOptions,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty rule set whose patterns are parsed with `options`.
    pub fn with_options(options: PatternOptions) -> Self {
        Self {
            rules: Vec::new(),
            options,
        }
    }

    /// Builds a rule set from `(pattern, token_id)` pairs, in order.
    pub fn from_rules<I, P>(rules: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (P, u32)>,
        P: AsRef<str>,
    {
        let mut set = Self::new();
        for (pattern, token_id) in rules {
            set.add(pattern.as_ref(), token_id)?;
        }
        Ok(set)
    }

    /// Appends a rule. The pattern is parsed immediately; the rule set is
    /// left unchanged when it is invalid.
    pub fn add(&mut self, pattern: &str, token_id: u32) -> Result<(), RuleError> {
        let declaration_order = self.rules.len();
        let parsed =
            parse_pattern(pattern, &self.options).map_err(|err| RuleError::InvalidPattern {
                rule: declaration_order,
                pattern: pattern.to_owned(),
                message: err.to_string(),
            })?;
        self.rules.push(Rule {
            pattern: pattern.to_owned(),
            token_id,
            declaration_order,
            parsed,
        });
        Ok(())
    }

    pub fn options(&self) -> &PatternOptions {
        &self.options
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn compile(&self) -> Result<Dfa, RuleError> {
        compile(self)
    }

    pub fn compile_nfa(&self) -> Result<Nfa, RuleError> {
        compile_nfa(self)
    }
}
