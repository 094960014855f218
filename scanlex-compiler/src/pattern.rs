//! Pattern parsing and lowering.
//!
//! Patterns are parsed with `regex-syntax` into its high-level IR and then
//! lowered into [`PatternExpr`], the small regular algebra the NFA builder
//! understands. Parsing and lowering are separate steps: a pattern can be
//! syntactically valid and still use a construct a tokenizer cannot
//! represent, such as an anchor or a word boundary.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use regex_syntax::ParserBuilder;
use regex_syntax::hir::{self, Hir, HirKind};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternExpr {
    Empty,
    Literal(Vec<char>),
    Class(Vec<ClassAtom>),
    Sequence(Vec<PatternExpr>),
    Alternate(Vec<PatternExpr>),
    Repeat {
        inner: Box<PatternExpr>,
        min: u32,
        max: Option<u32>,
    },
}

/// Inclusive range of Unicode scalar values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClassAtom {
    Char(u32),
    Range { start: u32, end: u32 },
}

impl ClassAtom {
    pub const fn bounds(&self) -> (u32, u32) {
        match *self {
            Self::Char(ch) => (ch, ch),
            Self::Range { start, end } => (start, end),
        }
    }
}

/// Dialect flags applied to every pattern of a rule set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PatternOptions {
    /// `(?i)` for every pattern.
    pub case_insensitive: bool,
    /// Let `.` match `\n` as well.
    pub dot_matches_new_line: bool,
    /// Unicode-aware classes and case folding. When off, `\w`, `\d`, `\s`
    /// and case folding are ASCII only, and constructs that could match a
    /// non-ASCII byte (such as `.`) are rejected.
    pub unicode: bool,
    /// `(?x)`: insignificant whitespace and `#` comments.
    pub ignore_whitespace: bool,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            dot_matches_new_line: false,
            unicode: true,
            ignore_whitespace: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("{0}")]
    Syntax(String),
    #[error("unsupported construct: {0}")]
    Unsupported(&'static str),
}

/// A syntactically valid pattern that has not been lowered yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPattern {
    hir: Hir,
}

impl ParsedPattern {
    /// Whether the pattern's language contains the empty string.
    pub fn matches_empty(&self) -> bool {
        self.hir.properties().minimum_len() == Some(0)
    }

    pub fn lower(&self) -> Result<PatternExpr, PatternError> {
        lower_hir(&self.hir)
    }
}

pub fn parse_pattern(pattern: &str, options: &PatternOptions) -> Result<ParsedPattern, PatternError> {
    let hir = ParserBuilder::new()
        .case_insensitive(options.case_insensitive)
        .dot_matches_new_line(options.dot_matches_new_line)
        .unicode(options.unicode)
        .ignore_whitespace(options.ignore_whitespace)
        .build()
        .parse(pattern)
        .map_err(|err| PatternError::Syntax(err.to_string()))?;
    Ok(ParsedPattern { hir })
}

fn lower_hir(hir: &Hir) -> Result<PatternExpr, PatternError> {
    match hir.kind() {
        HirKind::Empty => Ok(PatternExpr::Empty),
        HirKind::Literal(hir::Literal(bytes)) => core::str::from_utf8(bytes)
            .map(|text| PatternExpr::Literal(text.chars().collect()))
            .map_err(|_| PatternError::Unsupported("literal that is not valid UTF-8")),
        HirKind::Class(class) => Ok(PatternExpr::Class(lower_class(class))),
        HirKind::Look(_) => Err(PatternError::Unsupported("anchor or word boundary")),
        HirKind::Capture(capture) => lower_hir(&capture.sub),
        HirKind::Repetition(rep) => Ok(PatternExpr::Repeat {
            inner: Box::new(lower_hir(&rep.sub)?),
            min: rep.min,
            max: rep.max,
        }),
        HirKind::Concat(parts) => parts
            .iter()
            .map(lower_hir)
            .collect::<Result<_, _>>()
            .map(PatternExpr::Sequence),
        HirKind::Alternation(parts) => parts
            .iter()
            .map(lower_hir)
            .collect::<Result<_, _>>()
            .map(PatternExpr::Alternate),
        #[allow(unreachable_patterns)]
        _ => Err(PatternError::Unsupported("unrecognised regex construct")),
    }
}

fn lower_class(class: &hir::Class) -> Vec<ClassAtom> {
    match class {
        hir::Class::Unicode(unicode) => unicode
            .iter()
            .map(|range| atom(range.start() as u32, range.end() as u32))
            .collect(),
        hir::Class::Bytes(bytes) => bytes
            .iter()
            .map(|range| atom(range.start() as u32, range.end() as u32))
            .collect(),
    }
}

fn atom(start: u32, end: u32) -> ClassAtom {
    if start == end {
        ClassAtom::Char(start)
    } else {
        ClassAtom::Range { start, end }
    }
}
