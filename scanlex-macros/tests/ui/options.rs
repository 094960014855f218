use scanlex::{Automaton, Lexicon};

#[derive(Lexicon, Copy, Clone, Debug, PartialEq)]
#[lexicon(case_insensitive, dot_matches_new_line)]
enum Kind {
    #[token("select")]
    Select,
    #[regex("/[*].*[*]/")]
    Comment,
    #[token(" ")]
    Space,
}

fn main() {
    let dfa = Kind::compile().unwrap();
    let found = dfa.match_longest("SeLeCt x", 0).unwrap();
    assert_eq!((found.len, Kind::from_token_id(found.token_id)), (6, Some(Kind::Select)));
    let found = dfa.match_longest("/* a\nb */", 0).unwrap();
    assert_eq!(found.len, 9);
    assert_eq!(Kind::rule_set().unwrap().len(), 3);
}
