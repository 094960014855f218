use std::ops::Range;

/// One classified slice of the scanned input.
///
/// A token borrows the caller's buffer; copy `lexeme` out if it must outlive
/// the consumer call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    /// Token id of the rule that matched.
    pub id: u32,
    /// Declaration order of the rule that matched.
    pub rule: usize,
    /// Byte offset of the lexeme in the input.
    pub start: usize,
    pub lexeme: &'a str,
}

impl Token<'_> {
    pub fn end(&self) -> usize {
        self.start + self.lexeme.len()
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end()
    }
}
