use crate::dfa::Dfa;
use crate::error::RuleError;
use crate::rules::RuleSet;
use crate::token::Token;

/// A token enum that knows its own rules.
///
/// Usually derived with `#[derive(Lexicon)]` (feature `derive`): every
/// variant carries `#[regex("...")]` or `#[token("...")]` attributes, its
/// discriminant is its token id, and variant order is declaration order.
///
/// ```
/// # #[cfg(feature = "derive")]
/// # fn main() {
/// use scanlex::{Lexicon, tokenize};
///
/// #[derive(Lexicon, Copy, Clone, Debug, PartialEq)]
/// enum Word {
///     #[regex("[a-z]+")]
///     Lower = 10,
///     #[regex("[A-Z]+")]
///     Upper,
///     #[token(" ")]
///     Space,
/// }
///
/// let dfa = Word::compile().unwrap();
/// let kinds: Vec<Option<Word>> = tokenize(&dfa, "abc DEF")
///     .unwrap()
///     .iter()
///     .map(Word::classify)
///     .collect();
/// assert_eq!(kinds, [Some(Word::Lower), Some(Word::Space), Some(Word::Upper)]);
/// assert_eq!(Word::Upper.token_id(), 11);
/// # }
/// # #[cfg(not(feature = "derive"))]
/// # fn main() {}
/// ```
pub trait Lexicon: Sized + Copy {
    fn rule_set() -> Result<RuleSet, RuleError>;

    fn token_id(self) -> u32;

    fn from_token_id(id: u32) -> Option<Self>;

    fn compile() -> Result<Dfa, RuleError> {
        Self::rule_set()?.compile()
    }

    fn classify(token: &Token<'_>) -> Option<Self> {
        Self::from_token_id(token.id)
    }
}
