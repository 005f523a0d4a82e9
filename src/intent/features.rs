//! Feature extraction for intent scoring.
//!
//! Structural signals come from a single walk of the tree. Shape hints (UUID
//! grouping, semver, IPv4, dates) are regexes over the pattern source text:
//! they are pattern-text heuristics, not proofs of what the pattern accepts.

use crate::core::ast::*;
use crate::core::walk::NodeRef;
use crate::parser::ParsedPattern;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static UUID_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{8\}\\?-.*\{4\}\\?-.*\{12\}").unwrap());
static SEMVER_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\\d|\[0-9\])[+*]\\\.(?:\\d|\[0-9\])[+*]\\\.(?:\\d|\[0-9\])[+*]").unwrap()
});
static IPV4_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\d\{1,3\}\\\.\\d\{1,3\}|\\\.\\d\{1,3\}\)\{3\}|\\d\{1,3\}\\\.\)\{3\}|25\[0-5\]")
        .unwrap()
});
static ISO_DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\\d|\[0-9\])\{4\}\\?-.*\\?-").unwrap()
});
static TIME_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\\d\{2\}|\\d\\d|2\[0-3\]|\[01\]\\d|\[0-1\]\[0-9\]):(?:\\d\{2\}|\\d\\d|\[0-5\]\\d|\[0-5\]\[0-9\])")
        .unwrap()
});
static LOG_LEVEL_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:trace|debug|info|notice|warn(?:ing)?|error|err|fatal|critical|crit)\b")
        .unwrap()
});

/// Signals gathered from one pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    pub start_anchor: bool,
    pub end_anchor: bool,
    pub word_boundary: bool,
    pub alternation: bool,
    pub lookaround: bool,
    pub capture_groups: usize,
    pub named_groups: usize,

    pub at_sign: bool,
    pub colon: bool,
    /// `:` characters in the source text, non-capturing group markers excluded.
    pub colon_count: usize,
    pub slash: bool,
    pub backslash: bool,
    pub escaped_dot: bool,
    pub hyphen: bool,
    pub underscore: bool,
    pub plus: bool,
    pub question: bool,
    pub open_paren: bool,
    pub letter_t: bool,
    pub zone_marker: bool,

    pub digit_class: bool,
    pub hex_class: bool,
    pub word_class: bool,
    pub quantified: bool,
    pub brace_quantifier: bool,
    /// Exact repetition counts seen in `{n}` quantifiers.
    pub exact_counts: BTreeSet<u32>,

    pub http: bool,
    pub uuid_shape: bool,
    pub semver_shape: bool,
    pub ipv4_shape: bool,
    pub iso_date_shape: bool,
    pub time_shape: bool,
    pub log_level_words: usize,
    pub unicode_property: bool,
}

impl Features {
    pub fn fully_anchored(&self) -> bool {
        self.start_anchor && self.end_anchor
    }

    pub fn has_count(&self, n: u32) -> bool {
        self.exact_counts.contains(&n)
    }
}

pub fn extract(parsed: &ParsedPattern) -> Features {
    let mut features = Features::default();

    for node in NodeRef::Pattern(&parsed.pattern).walk() {
        if node.is_alternation() {
            features.alternation = true;
        }
        match node {
            NodeRef::Element(element) => element_signals(parsed, element, &mut features),
            NodeRef::ClassMember(member) => member_signals(member, &mut features),
            NodeRef::Pattern(_) | NodeRef::Alternative(_) => {}
        }
    }

    text_signals(&parsed.source, &mut features);
    features
}

fn element_signals(parsed: &ParsedPattern, element: &Element, f: &mut Features) {
    match &element.kind {
        ElementKind::Character { value } => {
            literal_signal(*value, parsed.raw(element.span).starts_with('\\'), f);
        }
        ElementKind::CharacterSet(set) => set_signal(set, f),
        ElementKind::CharacterClass(class) => {
            let ranges: Vec<(char, char)> = class
                .members
                .iter()
                .filter_map(|m| match m.kind {
                    ClassMemberKind::Range { min, max } => Some((min, max)),
                    _ => None,
                })
                .collect();
            let has = |lo: char, hi: char| ranges.iter().any(|&(a, b)| a <= lo && hi <= b);
            if !class.negate {
                let digits = has('0', '9');
                let hex_letters = (has('a', 'f') || has('A', 'F')) && !has('a', 'z') && !has('A', 'Z');
                if digits {
                    f.digit_class = true;
                }
                if digits && hex_letters {
                    f.hex_class = true;
                }
                if digits && (has('a', 'z') || has('A', 'Z')) {
                    f.word_class = true;
                }
            }
        }
        ElementKind::Group(group) => {
            if let Some(capture) = &group.capture {
                f.capture_groups += 1;
                if capture.name.is_some() {
                    f.named_groups += 1;
                }
            }
        }
        ElementKind::Quantifier(q) => {
            f.quantified = true;
            let suffix = parsed
                .source
                .get(q.element.span.end..element.span.end)
                .unwrap_or("");
            if suffix.starts_with('{') {
                f.brace_quantifier = true;
                if Some(q.min) == q.max {
                    f.exact_counts.insert(q.min);
                }
            }
        }
        ElementKind::Assertion(assertion) => match assertion {
            Assertion::Start => f.start_anchor = true,
            Assertion::End => f.end_anchor = true,
            Assertion::WordBoundary | Assertion::NonWordBoundary => f.word_boundary = true,
            Assertion::Lookaround(_) => f.lookaround = true,
        },
        ElementKind::Backreference(_) => {}
    }
}

fn member_signals(member: &ClassMember, f: &mut Features) {
    match &member.kind {
        ClassMemberKind::Character { value } => literal_signal(*value, *value == '.', f),
        ClassMemberKind::Set(set) => set_signal(set, f),
        ClassMemberKind::Range { .. } => {}
    }
}

/// `escaped` marks a dot that stands for itself (`\.` or `.` inside a class).
fn literal_signal(c: char, escaped: bool, f: &mut Features) {
    match c {
        '@' => f.at_sign = true,
        ':' => f.colon = true,
        '/' => f.slash = true,
        '\\' => f.backslash = true,
        '.' if escaped => f.escaped_dot = true,
        '-' => f.hyphen = true,
        '_' => f.underscore = true,
        '+' => f.plus = true,
        '?' => f.question = true,
        '(' => f.open_paren = true,
        'T' => f.letter_t = true,
        'Z' => f.zone_marker = true,
        _ => {}
    }
}

fn set_signal(set: &CharacterSet, f: &mut Features) {
    if set.negate {
        return;
    }
    match &set.kind {
        SetKind::Digit => f.digit_class = true,
        SetKind::Word => f.word_class = true,
        SetKind::Property { name, .. } if name == "ASCII_Hex_Digit" || name == "AHex" => {
            f.hex_class = true
        }
        _ => {}
    }
}

fn text_signals(source: &str, f: &mut Features) {
    f.http = source.to_ascii_lowercase().contains("http");
    f.uuid_shape = UUID_SHAPE.is_match(source);
    f.semver_shape = SEMVER_SHAPE.is_match(source);
    f.ipv4_shape = IPV4_SHAPE.is_match(source);
    f.iso_date_shape = ISO_DATE_SHAPE.is_match(source);
    f.time_shape = TIME_SHAPE.is_match(source);
    f.unicode_property = source.contains("\\p{") || source.contains("\\P{");
    f.colon_count = source.replace("(?:", "").matches(':').count();

    // `\b` escapes would otherwise glue onto the words they guard
    let plain = source.replace("\\b", " ");
    let words: BTreeSet<String> = LOG_LEVEL_WORD
        .find_iter(&plain)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect();
    f.log_level_words = words.len();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pattern;

    fn features(source: &str) -> Features {
        extract(&parse_pattern(source, "").unwrap())
    }

    #[test]
    fn test_structural_signals() {
        let f = features("^(?<user>[^\\s@]+)@([^\\s@]+)\\.com$");
        assert!(f.fully_anchored());
        assert!(f.at_sign);
        assert!(f.escaped_dot);
        assert_eq!(f.capture_groups, 2);
        assert_eq!(f.named_groups, 1);
        assert!(!f.alternation);
    }

    #[test]
    fn test_unescaped_dot_is_not_literal() {
        assert!(!features("a.b").escaped_dot);
        assert!(features("a[.]b").escaped_dot);
    }

    #[test]
    fn test_counts_only_from_braces() {
        let f = features("\\d{3}-\\d{2,4}x?");
        assert!(f.brace_quantifier);
        assert_eq!(f.exact_counts.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert!(f.digit_class);
        assert!(f.hyphen);
    }

    #[test]
    fn test_hex_and_word_classes() {
        let hex = features("[0-9a-f]+");
        assert!(hex.hex_class);
        assert!(!hex.word_class);
        let word = features("[A-Za-z0-9]+");
        assert!(word.word_class);
        assert!(!word.hex_class);
    }

    #[test]
    fn test_text_shape_hints() {
        assert!(features("[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").uuid_shape);
        assert!(features("\\d+\\.\\d+\\.\\d+").semver_shape);
        assert!(features("\\d{1,3}\\.\\d{1,3}\\.\\d{1,3}\\.\\d{1,3}").ipv4_shape);
        assert!(features("\\d{4}-\\d{2}-\\d{2}").iso_date_shape);
        assert!(features("\\d{2}:\\d{2}").time_shape);
        assert_eq!(features("\\b(INFO|WARN|ERROR)\\b").log_level_words, 3);
        assert!(!features("cat").uuid_shape);
    }
}
