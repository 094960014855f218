use scanlex::{Lexicon, tokenize};

#[derive(Lexicon, Copy, Clone, Debug, PartialEq, Eq)]
enum TokenKind {
    #[token("let")]
    Let = 1,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[ \t\n]+")]
    Whitespace,
    #[token("=")]
    Assign,
    #[regex(r"[0-9]+")]
    Number,
}

fn main() {
    let dfa = TokenKind::compile().unwrap();
    let kinds: Vec<TokenKind> = tokenize(&dfa, "let answer = 42")
        .unwrap()
        .iter()
        .filter_map(TokenKind::classify)
        .filter(|kind| *kind != TokenKind::Whitespace)
        .collect();
    assert_eq!(
        kinds,
        [TokenKind::Let, TokenKind::Ident, TokenKind::Assign, TokenKind::Number]
    );
    assert_eq!(TokenKind::Ident.token_id(), 2);
    assert_eq!(TokenKind::from_token_id(5), Some(TokenKind::Number));
}
