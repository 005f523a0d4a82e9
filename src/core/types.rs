use super::ast::Span;
use serde::Serialize;
use std::fmt;

/// One capture group value inside a [`MatchRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRecord {
    pub index: u32,
    pub name: Option<String>,
    /// Empty when the group did not participate in the match.
    pub value: String,
    pub span: Option<(usize, usize)>,
}

/// One successful match occurrence in the sample text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Byte offsets into the sample text.
    pub span: (usize, usize),
    pub text: String,
    /// 1-based line of the match start.
    pub line: usize,
    pub groups: Vec<CaptureRecord>,
}

/// Structural explanation of a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub summary: Vec<String>,
    pub components: Vec<String>,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{}", label)
    }
}

/// Stable machine-readable warning identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningId {
    NestedQuantifiers,
    PotentialBacktracking,
    AmbiguousWildcard,
    UnanchoredMismatch,
    DotallExpected,
    MultilineAnchors,
    EmptyAlternation,
    OverbroadClass,
    RedundantQuantifier,
    LookaroundComplexity,
    StickyGlobal,
    UnicodeFlagMismatch,
}

impl WarningId {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningId::NestedQuantifiers => "NESTED_QUANTIFIERS",
            WarningId::PotentialBacktracking => "POTENTIAL_BACKTRACKING",
            WarningId::AmbiguousWildcard => "AMBIGUOUS_WILDCARD",
            WarningId::UnanchoredMismatch => "UNANCHORED_MISMATCH",
            WarningId::DotallExpected => "DOTALL_EXPECTED",
            WarningId::MultilineAnchors => "MULTILINE_ANCHORS",
            WarningId::EmptyAlternation => "EMPTY_ALTERNATION",
            WarningId::OverbroadClass => "OVERBROAD_CLASS",
            WarningId::RedundantQuantifier => "REDUNDANT_QUANTIFIER",
            WarningId::LookaroundComplexity => "LOOKAROUND_COMPLEXITY",
            WarningId::StickyGlobal => "STICKY_GLOBAL",
            WarningId::UnicodeFlagMismatch => "UNICODE_FLAG_MISMATCH",
        }
    }
}

impl fmt::Display for WarningId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub spans: Vec<Span>,
    pub examples: Vec<String>,
    pub note: Option<String>,
}

/// A heuristic finding. Wording is always hedged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub id: WarningId,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub evidence: Option<Evidence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentLabel {
    General,
    EmailLike,
    UrlLike,
    Uuid,
    Ipv4,
    Ipv6,
    IsoDate,
    Time24h,
    Timestamp,
    Semver,
    HexString,
    AlphanumericId,
    LogLevel,
    PhoneLike,
    FilePath,
}

impl IntentLabel {
    pub fn display_name(&self) -> &'static str {
        match self {
            IntentLabel::General => "general pattern",
            IntentLabel::EmailLike => "email-like address",
            IntentLabel::UrlLike => "URL-like string",
            IntentLabel::Uuid => "UUID",
            IntentLabel::Ipv4 => "IPv4 address",
            IntentLabel::Ipv6 => "IPv6 address",
            IntentLabel::IsoDate => "ISO date",
            IntentLabel::Time24h => "24-hour time",
            IntentLabel::Timestamp => "timestamp",
            IntentLabel::Semver => "semantic version",
            IntentLabel::HexString => "hex string",
            IntentLabel::AlphanumericId => "alphanumeric identifier",
            IntentLabel::LogLevel => "log-level token",
            IntentLabel::PhoneLike => "phone-like number",
            IntentLabel::FilePath => "file path",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentResult {
    pub label: IntentLabel,
    pub confidence: f64,
    pub rationale: Vec<String>,
}

/// A generated string the pattern likely mishandles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleFinding {
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FpFnReport {
    pub likely_false_positives: Vec<ExampleFinding>,
    pub likely_false_negatives: Vec<ExampleFinding>,
    pub notes: Vec<String>,
    /// Number of variant tests actually run.
    pub attempts: usize,
}
