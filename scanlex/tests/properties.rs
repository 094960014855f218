use proptest::prelude::*;
use scanlex::{Automaton, Dfa, Flow, Nfa, RuleSet, ScanResult, Token, scan, tokenize};

fn letter_rules() -> RuleSet {
    RuleSet::from_rules([("[a-c]+", 1), (" ", 2), ("\n", 3)]).expect("rules are valid")
}

fn overlapping_rules() -> RuleSet {
    RuleSet::from_rules([
        ("ab", 1),
        ("a[bc]*", 2),
        ("c|ca", 3),
        ("[a-c]", 4),
        (" +", 5),
        ("é+", 6),
    ])
    .expect("rules are valid")
}

fn compiled(rules: &RuleSet) -> (Dfa, Nfa) {
    (
        rules.compile().expect("rules compile"),
        rules.compile_nfa().expect("rules compile"),
    )
}

proptest! {
    #[test]
    fn tokens_cover_matched_input(input in "[abc \n]{0,48}") {
        let dfa = letter_rules().compile().expect("rules compile");
        let tokens = tokenize(&dfa, &input).expect("alphabet is fully covered");

        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.start, offset);
            prop_assert!(!token.lexeme.is_empty());
            prop_assert!([1, 2, 3].contains(&token.id));
            offset = token.end();
        }
        let rebuilt: String = tokens.iter().map(|token| token.lexeme).collect();
        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn failure_is_first_unmatched_character(input in "[abc !\n]{0,48}") {
        let dfa = letter_rules().compile().expect("rules compile");
        let mut ends = Vec::new();
        let result = scan(&dfa, &input, &mut |token: Token<'_>| {
            ends.push(token.end());
            Flow::Continue
        });

        match input.find('!') {
            Some(at) => {
                prop_assert_eq!(result, ScanResult::Failed { at });
                prop_assert!(ends.iter().all(|&end| end <= at));
                prop_assert_eq!(ends.last().copied().unwrap_or(0), at);
            }
            None => prop_assert_eq!(result, ScanResult::Completed),
        }
    }

    #[test]
    fn dfa_and_nfa_agree(input in "[abcé x]{0,32}") {
        let (dfa, nfa) = compiled(&overlapping_rules());
        for (position, _) in input.char_indices() {
            prop_assert_eq!(
                dfa.match_longest(&input, position),
                nfa.match_longest(&input, position)
            );
        }
        prop_assert_eq!(tokenize(&dfa, &input), tokenize(&nfa, &input));
    }

    #[test]
    fn match_is_longest_available(input in "[abcé ]{1,24}") {
        let (dfa, _) = compiled(&overlapping_rules());
        let rules = overlapping_rules();
        if let Some(found) = dfa.match_longest(&input, 0) {
            // No single rule matches a longer prefix on its own.
            for rule in rules.rules() {
                let alone = RuleSet::from_rules([(rule.pattern(), rule.token_id())])
                    .and_then(|set| set.compile())
                    .expect("rule compiles");
                if let Some(other) = alone.match_longest(&input, 0) {
                    prop_assert!(other.len <= found.len);
                }
            }
        }
    }

    #[test]
    fn stop_after_n_calls(input in "[abc \n]{0,48}", limit in 1usize..8) {
        let dfa = letter_rules().compile().expect("rules compile");
        let total = tokenize(&dfa, &input).expect("alphabet is fully covered").len();
        let mut calls = 0;
        let result = scan(&dfa, &input, &mut |_: Token<'_>| {
            calls += 1;
            if calls == limit { Flow::Stop } else { Flow::Continue }
        });
        prop_assert_eq!(result, ScanResult::Completed);
        prop_assert_eq!(calls, limit.min(total));
    }
}
