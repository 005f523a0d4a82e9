//! Risk detection: conservative, heuristic warnings about a pattern.
//!
//! Rules run in a fixed order and each emits at most one warning, possibly
//! with several evidence spans. Nested quantifiers are checked first because
//! they escalate the backtracking warning. Messages are hedged throughout:
//! none of these checks is sound or complete.

pub mod probe;

use crate::config::ProbeConfig;
use crate::core::ast::*;
use crate::core::types::{Evidence, Severity, Warning, WarningId};
use crate::core::walk::NodeRef;
use crate::parser::ParsedPattern;
use log::debug;

/// Optional inputs beyond the parsed pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskContext<'a> {
    pub sample: Option<&'a str>,
    /// Settings for the timing probe; `None` skips it.
    pub probe: Option<&'a ProbeConfig>,
}

const OVERBROAD_PAIRS: [&str; 6] = ["\\s\\S", "\\S\\s", "\\d\\D", "\\D\\d", "\\w\\W", "\\W\\w"];
const UNICODE_ESCAPES: [&str; 3] = ["\\p{", "\\P{", "\\u{"];

pub fn detect_risks(parsed: &ParsedPattern, ctx: &RiskContext<'_>) -> Vec<Warning> {
    let detector = Detector { parsed, ctx };
    let mut warnings = Vec::new();

    let nested = detector.nested_quantifiers();
    let escalate = nested.is_some();
    warnings.extend(nested);
    warnings.extend(detector.potential_backtracking(escalate));
    warnings.extend(detector.ambiguous_wildcard());
    warnings.extend(detector.unanchored_mismatch());
    warnings.extend(detector.dotall_expected());
    warnings.extend(detector.multiline_anchors());
    warnings.extend(detector.empty_alternation());
    warnings.extend(detector.overbroad_class());
    warnings.extend(detector.redundant_quantifier());
    warnings.extend(detector.lookaround_complexity());
    warnings.extend(detector.sticky_global());
    warnings.extend(detector.unicode_flag_mismatch());

    debug!(
        "{} risk warning(s) for /{}/{}",
        warnings.len(),
        parsed.source,
        parsed.flags
    );
    warnings
}

fn warning(
    id: WarningId,
    severity: Severity,
    title: &str,
    message: impl Into<String>,
    evidence: Option<Evidence>,
) -> Warning {
    Warning {
        id,
        severity,
        title: title.to_string(),
        message: message.into(),
        evidence,
    }
}

fn span_evidence(spans: Vec<Span>) -> Option<Evidence> {
    if spans.is_empty() {
        None
    } else {
        Some(Evidence {
            spans,
            ..Evidence::default()
        })
    }
}

fn is_dot_quantifier(q: &Quantifier) -> bool {
    q.element.as_set().is_some_and(CharacterSet::is_dot)
}

fn greedy_unbounded(q: &Quantifier) -> bool {
    q.greedy && q.is_unbounded()
}

struct Detector<'a> {
    parsed: &'a ParsedPattern,
    ctx: &'a RiskContext<'a>,
}

impl<'a> Detector<'a> {
    fn nodes(&self) -> impl Iterator<Item = NodeRef<'a>> {
        NodeRef::Pattern(&self.parsed.pattern).walk()
    }

    fn quantifiers(&self) -> impl Iterator<Item = (&'a Element, &'a Quantifier)> {
        self.nodes()
            .filter_map(|n| n.as_element())
            .filter_map(|e| e.as_quantifier().map(|q| (e, q)))
    }

    fn assertions(&self) -> impl Iterator<Item = (&'a Element, &'a Assertion)> {
        self.nodes().filter_map(|n| n.as_element()).filter_map(|e| match &e.kind {
            ElementKind::Assertion(a) => Some((e, a)),
            _ => None,
        })
    }

    /// Quantifiers strictly inside the quantified element.
    fn inner_quantifiers(q: &'a Quantifier) -> impl Iterator<Item = &'a Quantifier> {
        NodeRef::Element(&q.element)
            .walk()
            .filter_map(|n| n.as_element())
            .filter_map(Element::as_quantifier)
    }

    fn nested_quantifiers(&self) -> Option<Warning> {
        let spans: Vec<Span> = self
            .quantifiers()
            .filter(|(_, q)| Self::inner_quantifiers(q).next().is_some())
            .map(|(e, _)| e.span)
            .collect();
        if spans.is_empty() {
            return None;
        }
        Some(warning(
            WarningId::NestedQuantifiers,
            Severity::High,
            "Nested quantifiers",
            "A repeated group contains another quantifier. Inputs that almost match can \
             trigger heavy backtracking.",
            span_evidence(spans),
        ))
    }

    fn potential_backtracking(&self, escalate: bool) -> Option<Warning> {
        let spans: Vec<Span> = self
            .quantifiers()
            .filter(|(_, q)| greedy_unbounded(q))
            .filter(|(_, q)| {
                let wildcard = Self::inner_quantifiers(q)
                    .any(|iq| greedy_unbounded(iq) && is_dot_quantifier(iq));
                let unbounded = Self::inner_quantifiers(q).any(Quantifier::is_unbounded);
                let alternation = NodeRef::Element(&q.element)
                    .walk()
                    .any(|n| n.is_alternation());
                let quantified = Self::inner_quantifiers(q).next().is_some();
                wildcard || unbounded || (alternation && quantified)
            })
            .map(|(e, _)| e.span)
            .collect();
        if spans.is_empty() {
            return None;
        }

        let mut evidence = span_evidence(spans).unwrap_or_default();
        if let Some(config) = self.ctx.probe {
            evidence.note = probe::slow_probe_note(&self.parsed.source, self.parsed.flags, config);
        }

        Some(warning(
            WarningId::PotentialBacktracking,
            if escalate {
                Severity::High
            } else {
                Severity::Medium
            },
            "Potential catastrophic backtracking",
            "An unbounded repetition wraps a sub-pattern that can match the same text in \
             several ways, so inputs that fail to match may take exponential time.",
            Some(evidence),
        ))
    }

    fn ambiguous_wildcard(&self) -> Option<Warning> {
        let spans: Vec<Span> = self
            .quantifiers()
            .filter(|(_, q)| q.greedy && is_dot_quantifier(q))
            .filter(|(_, q)| q.max.is_none_or(|max| max > q.min))
            .map(|(e, _)| e.span)
            .collect();
        if spans.is_empty() {
            return None;
        }
        Some(warning(
            WarningId::AmbiguousWildcard,
            Severity::Medium,
            "Ambiguous wildcard",
            "A greedy '.' repetition can consume more text than intended and may run past \
             the field you expect. A narrower class or a lazy quantifier is often safer.",
            span_evidence(spans),
        ))
    }

    fn unanchored_mismatch(&self) -> Option<Warning> {
        if self.parsed.flags.global {
            return None;
        }
        let starts: Vec<Span> = self
            .assertions()
            .filter(|(_, a)| matches!(a, Assertion::Start))
            .map(|(e, _)| e.span)
            .collect();
        let ends: Vec<Span> = self
            .assertions()
            .filter(|(_, a)| matches!(a, Assertion::End))
            .map(|(e, _)| e.span)
            .collect();
        if starts.is_empty() == ends.is_empty() {
            return None;
        }
        let (spans, message) = if ends.is_empty() {
            (
                starts,
                "The pattern is anchored at the start but not at the end, so trailing text \
                 can still be accepted. If the whole value is meant to be validated, a '$' is \
                 likely missing.",
            )
        } else {
            (
                ends,
                "The pattern is anchored at the end but not at the start, so leading text can \
                 still be accepted. If the whole value is meant to be validated, a '^' is likely \
                 missing.",
            )
        };
        Some(warning(
            WarningId::UnanchoredMismatch,
            Severity::Low,
            "Partial anchoring",
            message,
            span_evidence(spans),
        ))
    }

    fn dotall_expected(&self) -> Option<Warning> {
        if self.parsed.flags.dot_all {
            return None;
        }
        if !self.ctx.sample.is_some_and(|s| s.contains('\n')) {
            return None;
        }
        let spans: Vec<Span> = self
            .nodes()
            .filter_map(|n| n.as_element())
            .filter(|e| e.as_set().is_some_and(CharacterSet::is_dot))
            .map(|e| e.span)
            .collect();
        if spans.is_empty() {
            return None;
        }
        Some(warning(
            WarningId::DotallExpected,
            Severity::Low,
            "Dot-all flag may be expected",
            "The sample contains line breaks, but '.' does not match them unless the s flag \
             is set. Matches may stop at the end of a line.",
            span_evidence(spans),
        ))
    }

    fn multiline_anchors(&self) -> Option<Warning> {
        if !self.parsed.flags.multiline {
            return None;
        }
        let spans: Vec<Span> = self
            .assertions()
            .filter(|(_, a)| matches!(a, Assertion::Start | Assertion::End))
            .map(|(e, _)| e.span)
            .collect();
        if spans.is_empty() {
            return None;
        }
        Some(warning(
            WarningId::MultilineAnchors,
            Severity::Info,
            "Multiline anchors",
            "With the m flag, ^ and $ match at every line boundary. A multi-line input can \
             pass even if only one of its lines matches.",
            span_evidence(spans),
        ))
    }

    fn empty_alternation(&self) -> Option<Warning> {
        let spans: Vec<Span> = self
            .nodes()
            .filter(|n| {
                n.alternatives()
                    .is_some_and(|alts| alts.len() > 1 && alts.iter().any(|a| a.elements.is_empty()))
            })
            .map(|n| n.span())
            .collect();
        if spans.is_empty() {
            return None;
        }
        Some(warning(
            WarningId::EmptyAlternation,
            Severity::Medium,
            "Empty alternative",
            "One branch of an alternation is empty, so the alternation can match the empty \
             string. This is likely a stray '|'.",
            span_evidence(spans),
        ))
    }

    fn overbroad_class(&self) -> Option<Warning> {
        let mut examples = Vec::new();
        let spans: Vec<Span> = self
            .nodes()
            .filter_map(|n| n.as_element())
            .filter(|e| matches!(e.kind, ElementKind::CharacterClass(_)))
            .filter(|e| {
                let raw = self.parsed.raw(e.span);
                match OVERBROAD_PAIRS.iter().find(|pair| raw.contains(*pair)) {
                    Some(pair) => {
                        examples.push(format!("[{}]", pair));
                        true
                    }
                    None => false,
                }
            })
            .map(|e| e.span)
            .collect();
        if spans.is_empty() {
            return None;
        }
        examples.dedup();
        Some(warning(
            WarningId::OverbroadClass,
            Severity::Info,
            "Overbroad character class",
            "A class combines a set with its complement, so it likely matches any character, \
             line breaks included.",
            Some(Evidence {
                spans,
                examples,
                note: None,
            }),
        ))
    }

    fn redundant_quantifier(&self) -> Option<Warning> {
        let mut examples = Vec::new();
        let mut spans = Vec::new();
        for (element, q) in self.quantifiers() {
            let suffix = self
                .parsed
                .source
                .get(q.element.span.end..element.span.end)
                .unwrap_or("");
            let counted = suffix.strip_suffix('?').unwrap_or(suffix);
            let shorthand = match counted {
                "{0,}" => "*",
                "{1,}" => "+",
                "{0,1}" => "?",
                _ => continue,
            };
            examples.push(format!("{} → {}", counted, shorthand));
            spans.push(element.span);
        }
        if spans.is_empty() {
            return None;
        }
        examples.dedup();
        Some(warning(
            WarningId::RedundantQuantifier,
            Severity::Info,
            "Redundant quantifier",
            "A counted quantifier is equivalent to a shorter form (*, + or ?), which may be \
             easier to read.",
            Some(Evidence {
                spans,
                examples,
                note: None,
            }),
        ))
    }

    fn lookaround_complexity(&self) -> Option<Warning> {
        let spans: Vec<Span> = self
            .assertions()
            .filter(|(_, a)| matches!(a, Assertion::Lookaround(_)))
            .map(|(e, _)| e.span)
            .collect();
        if spans.is_empty() {
            return None;
        }
        Some(warning(
            WarningId::LookaroundComplexity,
            Severity::Info,
            "Lookaround",
            "Lookarounds can make a pattern harder to read, and lookbehind may not be \
             supported by every regex engine.",
            span_evidence(spans),
        ))
    }

    fn sticky_global(&self) -> Option<Warning> {
        let flags = self.parsed.flags;
        if !(flags.sticky && flags.global) {
            return None;
        }
        Some(warning(
            WarningId::StickyGlobal,
            Severity::Info,
            "Sticky and global flags combined",
            "With both y and g set, repeated matching can stop at the first position that \
             does not match, which may skip later matches.",
            None,
        ))
    }

    fn unicode_flag_mismatch(&self) -> Option<Warning> {
        if self.parsed.flags.unicode {
            return None;
        }
        let source = &self.parsed.source;
        let examples: Vec<String> = UNICODE_ESCAPES
            .iter()
            .filter(|escape| source.contains(*escape))
            .map(|escape| format!("{}…}}", escape))
            .collect();
        if examples.is_empty() {
            return None;
        }
        Some(warning(
            WarningId::UnicodeFlagMismatch,
            Severity::Low,
            "Unicode escapes without the u flag",
            "Property or code point escapes are likely read as plain characters unless the \
             u flag is set.",
            Some(Evidence {
                examples,
                ..Evidence::default()
            }),
        ))
    }
}
