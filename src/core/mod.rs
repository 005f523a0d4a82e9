//! Shared data model: the pattern tree, flags, the walker and result types.

pub mod ast;
pub mod flags;
pub mod types;
pub mod walk;

pub use ast::{
    Alternative, Assertion, Backreference, Capture, CharacterClass, CharacterSet, ClassMember,
    ClassMemberKind, Element, ElementKind, Group, LookDirection, Lookaround, Pattern, Quantifier,
    SetKind, Span,
};
pub use flags::{Flags, InvalidFlags};
pub use types::{
    CaptureRecord, Evidence, ExampleFinding, Explanation, FpFnReport, IntentLabel, IntentResult,
    MatchRecord, Severity, Warning, WarningId,
};
pub use walk::{elements, walk, NodeRef, Walk};
