//! Human-readable explanation of a pattern tree.
//!
//! Produces three lists: a short summary, one component line per top-level
//! element (or per alternative), and the constraints implied by flags and
//! anchoring. Descriptions are table-driven so the same tree always yields
//! the same text.

use crate::core::ast::*;
use crate::core::flags::Flags;
use crate::core::types::Explanation;

/// Nested groups and lookarounds list at most this many inner items.
const MAX_INNER_ITEMS: usize = 3;

pub fn explain(pattern: &Pattern, flags: Flags) -> Explanation {
    let describer = Describer { flags };
    Explanation {
        summary: summary(pattern, flags),
        components: describer.components(pattern),
        constraints: constraints(pattern, flags),
    }
}

fn summary(pattern: &Pattern, flags: Flags) -> Vec<String> {
    let mut lines = Vec::new();
    let alternatives = &pattern.alternatives;
    let framing = match alternatives.as_slice() {
        [] => "Matches the empty string.".to_string(),
        [only] if only.elements.is_empty() => "Matches the empty string.".to_string(),
        [only] => format!(
            "Matches a single sequence of {} element{}.",
            only.elements.len(),
            plural(only.elements.len())
        ),
        many => format!("Matches any one of {} alternatives.", many.len()),
    };
    lines.push(framing);
    if flags.ignore_case {
        lines.push("Letters are matched without regard to case.".to_string());
    }
    if flags.global {
        lines.push("Searches for every match in the input, not just the first.".to_string());
    }
    lines
}

fn constraints(pattern: &Pattern, flags: Flags) -> Vec<String> {
    let mut lines: Vec<String> = flags
        .entries()
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(letter, _)| flag_line(*letter).to_string())
        .collect();

    if let Some(first) = pattern.alternatives.first() {
        let starts = first.elements.first().is_some_and(Element::is_start_anchor);
        let ends = first.elements.last().is_some_and(Element::is_end_anchor);
        let anchoring = match (starts, ends) {
            (true, true) => Some("Anchored: the match must cover the whole input"),
            (true, false) => Some("Start-anchored: the match must begin at the start"),
            (false, true) => Some("End-anchored: the match must finish at the end"),
            (false, false) => None,
        };
        lines.extend(anchoring.map(str::to_string));
    }
    lines
}

fn flag_line(letter: char) -> &'static str {
    match letter {
        'g' => "Global (g): finds all matches instead of stopping at the first",
        'i' => "Case-insensitive (i): upper and lower case letters are treated alike",
        'm' => "Multiline (m): ^ and $ match at line boundaries",
        's' => "Dot-all (s): . also matches line terminators",
        'u' => "Unicode (u): enables code point escapes and property classes",
        _ => "Sticky (y): matching starts exactly at the current position",
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

struct Describer {
    flags: Flags,
}

impl Describer {
    fn components(&self, pattern: &Pattern) -> Vec<String> {
        match pattern.alternatives.as_slice() {
            [] => vec!["Empty pattern".to_string()],
            [only] if only.elements.is_empty() => vec!["Empty pattern".to_string()],
            [only] => self.sequence(&only.elements),
            many => {
                let mut lines = vec![format!("Matches one of {} alternatives:", many.len())];
                lines.extend(
                    many.iter()
                        .enumerate()
                        .map(|(i, alt)| format!("{}. {}", i + 1, self.alternative_line(alt))),
                );
                lines
            }
        }
    }

    fn alternative_line(&self, alternative: &Alternative) -> String {
        if alternative.elements.is_empty() {
            "Empty string".to_string()
        } else {
            self.sequence(&alternative.elements).join(", ")
        }
    }

    /// One description per element, with runs of literal characters merged.
    fn sequence(&self, elements: &[Element]) -> Vec<String> {
        let mut out = Vec::new();
        let mut literal = String::new();
        for element in elements {
            if let ElementKind::Character { value } = element.kind {
                literal.push(value);
                continue;
            }
            if !literal.is_empty() {
                out.push(describe_literal(&literal));
                literal.clear();
            }
            out.push(self.element(element));
        }
        if !literal.is_empty() {
            out.push(describe_literal(&literal));
        }
        out
    }

    fn element(&self, element: &Element) -> String {
        match &element.kind {
            ElementKind::Character { value } => describe_literal(&value.to_string()),
            ElementKind::CharacterSet(set) => self.set(set),
            ElementKind::CharacterClass(class) => self.class(class),
            ElementKind::Group(group) => self.group(group),
            ElementKind::Quantifier(q) => self.quantifier(q),
            ElementKind::Assertion(assertion) => self.assertion(assertion),
            ElementKind::Backreference(reference) => match reference {
                Backreference::Index(index) => {
                    format!("Matches same text as Capturing Group #{}", index)
                }
                Backreference::Name(name) => {
                    format!("Matches same text as Capturing Group '{}'", name)
                }
            },
        }
    }

    fn set(&self, set: &CharacterSet) -> String {
        match (&set.kind, set.negate) {
            (SetKind::Dot, _) if self.flags.dot_all => "Any character".to_string(),
            (SetKind::Dot, _) => "Any character except line breaks".to_string(),
            (SetKind::Digit, false) => "Digit (0-9)".to_string(),
            (SetKind::Digit, true) => "Non-digit character".to_string(),
            (SetKind::Word, false) => "Word character (letter, digit, underscore)".to_string(),
            (SetKind::Word, true) => "Non-word character".to_string(),
            (SetKind::Space, false) => "Whitespace character".to_string(),
            (SetKind::Space, true) => "Non-whitespace character".to_string(),
            (SetKind::Property { name, value }, negate) => {
                let property = match value {
                    Some(value) => format!("{}={}", name, value),
                    None => name.clone(),
                };
                if negate {
                    format!("Character without Unicode property {}", property)
                } else {
                    format!("Character with Unicode property {}", property)
                }
            }
        }
    }

    fn class(&self, class: &CharacterClass) -> String {
        let members: Vec<String> = class
            .members
            .iter()
            .map(|member| match &member.kind {
                ClassMemberKind::Character { value } => escape_char(*value),
                ClassMemberKind::Range { min, max } => {
                    format!("{}-{}", escape_char(*min), escape_char(*max))
                }
                ClassMemberKind::Set(set) => self.set(set).to_lowercase(),
            })
            .collect();
        match (class.negate, members.is_empty()) {
            (false, true) => "Nothing (empty class never matches)".to_string(),
            (true, true) => "Any character".to_string(),
            (false, false) => format!("One of: {}", members.join(", ")),
            (true, false) => format!("Any character except: {}", members.join(", ")),
        }
    }

    /// Short inner description shared by groups and lookarounds.
    fn inner(&self, alternatives: &[Alternative]) -> String {
        let mut items: Vec<String> = match alternatives {
            [] => Vec::new(),
            [only] => self.sequence(&only.elements),
            many => many.iter().map(|alt| self.alternative_line(alt)).collect(),
        };
        if items.is_empty() {
            return "Empty string".to_string();
        }
        let separator = if alternatives.len() > 1 { " | " } else { ", " };
        if items.len() > MAX_INNER_ITEMS {
            items.truncate(MAX_INNER_ITEMS);
            items.push("…".to_string());
        }
        items.join(separator)
    }

    fn group(&self, group: &Group) -> String {
        let inner = self.inner(&group.alternatives);
        match &group.capture {
            Some(Capture {
                name: Some(name), ..
            }) => format!("Capturing Group '{}' ({})", name, inner),
            Some(capture) => format!("Capturing Group #{} ({})", capture.index, inner),
            None => format!("Non-capturing group ({})", inner),
        }
    }

    fn quantifier(&self, q: &Quantifier) -> String {
        let subject = self.element(&q.element);
        let times = match (q.min, q.max) {
            (0, Some(1)) => "optionally".to_string(),
            (0, None) => "zero or more times".to_string(),
            (1, None) => "one or more times".to_string(),
            (min, Some(max)) if min == max => format!("exactly {} times", min),
            (min, None) => format!("between {} and unlimited times", min),
            (min, Some(max)) => format!("between {} and {} times", min, max),
        };
        let lazy = if q.greedy { "" } else { " (lazy)" };
        format!("{}, {}{}", subject, times, lazy)
    }

    fn assertion(&self, assertion: &Assertion) -> String {
        let scope = if self.flags.multiline { "line" } else { "string" };
        match assertion {
            Assertion::Start => format!("Start of {} anchor", scope),
            Assertion::End => format!("End of {} anchor", scope),
            Assertion::WordBoundary => "Word boundary".to_string(),
            Assertion::NonWordBoundary => "Non-word boundary".to_string(),
            Assertion::Lookaround(look) => {
                let polarity = if look.negate { "Negative" } else { "Positive" };
                let direction = match look.direction {
                    LookDirection::Ahead => "look-ahead",
                    LookDirection::Behind => "look-behind",
                };
                format!(
                    "{} {} ({})",
                    polarity,
                    direction,
                    self.inner(&look.alternatives)
                )
            }
        }
    }
}

fn describe_literal(text: &str) -> String {
    let escaped: String = text.chars().map(escape_char).collect();
    format!("Literal \"{}\"", escaped)
}

fn escape_char(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\u{0C}' => "\\f".to_string(),
        '\u{0B}' => "\\v".to_string(),
        '\0' => "\\0".to_string(),
        c if c.is_control() => format!("\\u{{{:04X}}}", c as u32),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pattern;
    use pretty_assertions::assert_eq;

    fn explain_str(source: &str, flags: &str) -> Explanation {
        let parsed = parse_pattern(source, flags).unwrap();
        explain(&parsed.pattern, parsed.flags)
    }

    #[test]
    fn test_literal_run_is_merged() {
        let explanation = explain_str("cat", "");
        assert_eq!(explanation.components, vec!["Literal \"cat\"".to_string()]);
        assert_eq!(
            explanation.summary,
            vec!["Matches a single sequence of 3 elements.".to_string()]
        );
        assert!(explanation.constraints.is_empty());
    }

    #[test]
    fn test_phone_components_and_anchoring() {
        let explanation = explain_str("^\\d{3}-\\d{4}$", "");
        assert_eq!(
            explanation.components,
            vec![
                "Start of string anchor",
                "Digit (0-9), exactly 3 times",
                "Literal \"-\"",
                "Digit (0-9), exactly 4 times",
                "End of string anchor",
            ]
        );
        assert_eq!(
            explanation.constraints,
            vec!["Anchored: the match must cover the whole input"]
        );
    }

    #[test]
    fn test_alternatives_are_numbered() {
        let explanation = explain_str("cat|dog|", "");
        assert_eq!(
            explanation.components,
            vec![
                "Matches one of 3 alternatives:",
                "1. Literal \"cat\"",
                "2. Literal \"dog\"",
                "3. Empty string",
            ]
        );
    }

    #[test]
    fn test_empty_pattern() {
        let explanation = explain_str("", "");
        assert_eq!(explanation.components, vec!["Empty pattern"]);
    }

    #[test]
    fn test_flags_drive_constraints_and_summary() {
        let explanation = explain_str("^a", "gim");
        assert_eq!(explanation.constraints.len(), 4);
        assert!(explanation.constraints[3].starts_with("Start-anchored"));
        assert_eq!(explanation.summary.len(), 3);
        assert_eq!(explanation.components[0], "Start of line anchor");
    }

    #[test]
    fn test_groups_classes_and_quantifiers() {
        let explanation = explain_str("(?<word>[a-z_\\d]+?)\\k<word>(?:abcd|e){2,}", "");
        assert_eq!(
            explanation.components,
            vec![
                "Capturing Group 'word' (One of: a-z, _, digit (0-9), one or more times (lazy))",
                "Matches same text as Capturing Group 'word'",
                "Non-capturing group (Literal \"abcd\" | Literal \"e\"), between 2 and unlimited times",
            ]
        );
    }

    #[test]
    fn test_group_truncates_inner_items() {
        let explanation = explain_str("(\\d\\s\\w.)", "");
        assert_eq!(
            explanation.components,
            vec![
                "Capturing Group #1 (Digit (0-9), Whitespace character, Word character (letter, digit, underscore), …)"
            ]
        );
    }

    #[test]
    fn test_lookaround_and_control_escapes() {
        let explanation = explain_str("(?<!\\$)\\n\\t", "");
        assert_eq!(
            explanation.components,
            vec!["Negative look-behind (Literal \"$\")", "Literal \"\\n\\t\""]
        );
    }
}
