//! Pattern tree produced by the parser.
//!
//! The tree is immutable once built. Every node carries a [`Span`] of byte
//! offsets into the pattern source so analyses can point back at the text
//! that produced a finding.

use serde::Serialize;

/// Byte range into the pattern source (`start..end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Root of a parsed pattern: the top-level alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub span: Span,
    pub alternatives: Vec<Alternative>,
}

/// One branch of an alternation: an ordered sequence of elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub span: Span,
    pub elements: Vec<Element>,
}

/// A single element inside an [`Alternative`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub span: Span,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// A single literal code point.
    Character { value: char },
    /// A built-in set such as `.`, `\d` or `\p{L}`.
    CharacterSet(CharacterSet),
    /// A bracket expression `[...]`.
    CharacterClass(CharacterClass),
    Group(Group),
    Quantifier(Quantifier),
    Assertion(Assertion),
    Backreference(Backreference),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSet {
    pub kind: SetKind,
    pub negate: bool,
}

impl CharacterSet {
    pub fn dot() -> Self {
        Self {
            kind: SetKind::Dot,
            negate: false,
        }
    }

    pub fn is_dot(&self) -> bool {
        matches!(self.kind, SetKind::Dot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Dot,
    Digit,
    Word,
    Space,
    Property { name: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterClass {
    pub negate: bool,
    pub members: Vec<ClassMember>,
}

/// A member of a bracket expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMember {
    pub span: Span,
    pub kind: ClassMemberKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassMemberKind {
    Character { value: char },
    Range { min: char, max: char },
    Set(CharacterSet),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// `None` for non-capturing groups.
    pub capture: Option<Capture>,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    /// 1-based group number.
    pub index: u32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantifier {
    pub min: u32,
    /// `None` means unbounded.
    pub max: Option<u32>,
    pub greedy: bool,
    pub element: Box<Element>,
}

impl Quantifier {
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assertion {
    Start,
    End,
    WordBoundary,
    NonWordBoundary,
    Lookaround(Lookaround),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookDirection {
    Ahead,
    Behind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookaround {
    pub direction: LookDirection,
    pub negate: bool,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backreference {
    Index(u32),
    Name(String),
}

impl Element {
    /// Character set carried directly by this element, if any.
    pub fn as_set(&self) -> Option<&CharacterSet> {
        match &self.kind {
            ElementKind::CharacterSet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_quantifier(&self) -> Option<&Quantifier> {
        match &self.kind {
            ElementKind::Quantifier(q) => Some(q),
            _ => None,
        }
    }

    pub fn is_start_anchor(&self) -> bool {
        matches!(self.kind, ElementKind::Assertion(Assertion::Start))
    }

    pub fn is_end_anchor(&self) -> bool {
        matches!(self.kind, ElementKind::Assertion(Assertion::End))
    }
}
