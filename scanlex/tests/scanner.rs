use scanlex::{Automaton, Flow, LexicalFailure, RuleSet, ScanResult, Scanner, Token, scan, tokenize};
use std::sync::Arc;
use std::thread;

const WORD: u32 = 1000;
const EOL: u32 = 1001;
const CHAR: u32 = 1002;

fn word_count_rules() -> RuleSet {
    RuleSet::from_rules([("[^ \t\n]+", WORD), ("\n", EOL), (".", CHAR)]).expect("rules are valid")
}

#[test]
fn word_count_scenario() {
    let dfa = word_count_rules().compile().expect("rules compile");
    let mut seen = Vec::new();
    let result = scan(&dfa, "ab c\nd", &mut |token: Token<'_>| {
        seen.push((token.id, token.start, token.lexeme.to_owned()));
        Flow::Continue
    });

    assert_eq!(result, ScanResult::Completed);
    let expected = [
        (WORD, 0, "ab"),
        (CHAR, 2, " "),
        (WORD, 3, "c"),
        (EOL, 4, "\n"),
        (WORD, 5, "d"),
    ]
    .map(|(id, start, lexeme)| (id, start, lexeme.to_owned()));
    assert_eq!(seen, expected);
}

#[test]
fn empty_input_completes_without_tokens() {
    let dfa = word_count_rules().compile().expect("rules compile");
    let mut calls = 0;
    let result = scan(&dfa, "", &mut |_: Token<'_>| {
        calls += 1;
        Flow::Continue
    });
    assert_eq!(result, ScanResult::Completed);
    assert_eq!(calls, 0);
}

#[test]
fn failure_reports_offset_and_remainder() {
    let rules = RuleSet::from_rules([("[a-z]+", 1), (" ", 2)]).expect("rules are valid");
    let dfa = rules.compile().expect("rules compile");
    let input = "abc de!fg";
    let mut lexemes = Vec::new();
    let result = scan(&dfa, input, &mut |token: Token<'_>| {
        lexemes.push(token.lexeme.to_owned());
        Flow::Continue
    });

    assert_eq!(result, ScanResult::Failed { at: 6 });
    assert_eq!(result.remainder(input), Some("!fg"));
    assert_eq!(lexemes, ["abc", " ", "de"]);

    let failure = result.into_result(input).expect_err("scan failed");
    assert_eq!(failure, LexicalFailure::new(input, 6));
}

#[test]
fn failure_on_first_character() {
    let dfa = RuleSet::from_rules([("[0-9]+", 1)])
        .and_then(|rules| rules.compile())
        .expect("rules compile");
    match tokenize(&dfa, "x12") {
        Err(failure) => assert_eq!(failure.at, 0),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn consumer_stop_ends_scan_early() {
    let dfa = word_count_rules().compile().expect("rules compile");
    let mut calls = 0;
    let result = scan(&dfa, "one two three four", &mut |_: Token<'_>| {
        calls += 1;
        if calls == 3 { Flow::Stop } else { Flow::Continue }
    });
    assert_eq!(result, ScanResult::Completed);
    assert_eq!(calls, 3);
}

#[test]
fn stop_before_unmatched_input_is_not_a_failure() {
    let rules = RuleSet::from_rules([("[a-z]+", 1)]).expect("rules are valid");
    let dfa = rules.compile().expect("rules compile");
    let result = scan(&dfa, "abc!", &mut |_: Token<'_>| Flow::Stop);
    assert!(result.is_completed());
}

#[test]
fn longest_match_wins_over_declaration_order() {
    let rules = RuleSet::from_rules([("=", 1), ("==", 2)]).expect("rules are valid");
    let dfa = rules.compile().expect("rules compile");
    let tokens: Vec<(u32, &str)> = tokenize(&dfa, "===")
        .expect("input is covered")
        .iter()
        .map(|token| (token.id, token.lexeme))
        .collect();
    assert_eq!(tokens, [(2, "=="), (1, "=")]);
}

#[test]
fn equal_length_matches_go_to_first_rule() {
    let keyword_first = RuleSet::from_rules([("if", 1), ("[a-z]+", 2)]).expect("rules are valid");
    let ident_first = RuleSet::from_rules([("[a-z]+", 2), ("if", 1)]).expect("rules are valid");

    for _ in 0..3 {
        let dfa = keyword_first.compile().expect("rules compile");
        let found = dfa.match_longest("if", 0).expect("match");
        assert_eq!((found.rule, found.token_id), (0, 1));
    }

    let dfa = ident_first.compile().expect("rules compile");
    let found = dfa.match_longest("if", 0).expect("match");
    assert_eq!((found.rule, found.token_id), (0, 2));
}

#[test]
fn match_cut_off_by_end_of_input_falls_back_to_shorter_rule() {
    let rules = RuleSet::from_rules([("abc", 1), ("[a-z]", 2)]).expect("rules are valid");
    let dfa = rules.compile().expect("rules compile");
    let nfa = rules.compile_nfa().expect("rules compile");

    let mut seen = Vec::new();
    let result = scan(&dfa, "ab", &mut |token: Token<'_>| {
        seen.push((token.id, token.span()));
        Flow::Continue
    });
    assert_eq!(result, ScanResult::Completed);
    assert_eq!(seen, [(2, 0..1), (2, 1..2)]);

    let tokens: Vec<(u32, &str)> = tokenize(&nfa, "ab")
        .expect("input is covered")
        .iter()
        .map(|token| (token.id, token.lexeme))
        .collect();
    assert_eq!(tokens, [(2, "a"), (2, "b")]);
    assert_eq!(dfa.match_longest("abc", 0).map(|found| found.token_id), Some(1));
}

#[test]
fn multibyte_input_uses_byte_offsets() {
    let rules = RuleSet::from_rules([("[^ ]+", 1), (" ", 2)]).expect("rules are valid");
    let dfa = rules.compile().expect("rules compile");
    let tokens = tokenize(&dfa, "héllo → ok").expect("input is covered");
    let spans: Vec<(usize, usize)> = tokens.iter().map(|token| (token.start, token.end())).collect();
    assert_eq!(spans, [(0, 6), (6, 7), (7, 10), (10, 11), (11, 13)]);
}

#[test]
fn scanner_iterator_is_fused_after_failure() {
    let rules = RuleSet::from_rules([("a", 1)]).expect("rules are valid");
    let dfa = rules.compile().expect("rules compile");
    let mut scanner = Scanner::new(&dfa, "aab");
    assert!(matches!(scanner.next(), Some(Ok(token)) if token.lexeme == "a"));
    assert!(matches!(scanner.next(), Some(Ok(_))));
    assert_eq!(scanner.remainder(), "b");
    assert!(matches!(scanner.next(), Some(Err(LexicalFailure { at: 2, .. }))));
    assert!(scanner.next().is_none());
    assert_eq!(scanner.position(), 2);
}

#[test]
fn match_longest_outside_input_is_none() {
    let dfa = word_count_rules().compile().expect("rules compile");
    assert_eq!(dfa.match_longest("ab", 2), None);
    assert_eq!(dfa.match_longest("ab", 7), None);
    assert_eq!(dfa.match_longest("é", 1), None);
}

#[test]
fn compiled_automaton_is_shared_between_threads() {
    let dfa = Arc::new(word_count_rules().compile().expect("rules compile"));
    let handles: Vec<_> = ["ab c\nd", "x y z", "\n\n"]
        .into_iter()
        .map(|input| {
            let dfa = Arc::clone(&dfa);
            thread::spawn(move || tokenize(&dfa, input).map(|tokens| tokens.len()))
        })
        .collect();
    let counts: Vec<usize> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread").expect("input is covered"))
        .collect();
    assert_eq!(counts, [5, 5, 2]);
    assert_eq!(dfa.rule_count(), 3);
}

#[test]
fn nfa_and_dfa_agree_on_scenario() {
    let rules = word_count_rules();
    let dfa = rules.compile().expect("rules compile");
    let nfa = rules.compile_nfa().expect("rules compile");
    let input = "ab c\nd\t  end";
    assert_eq!(tokenize(&dfa, input), tokenize(&nfa, input));
}
