//! Property-based tests for the analysis pipeline.
//!
//! These tests verify invariants that should hold for all inputs:
//! - The tree parser and the engine agree on which patterns are valid
//! - Risk messages stay hedged
//! - Intent confidence stays within its bounds
//! - The estimator respects its caps and never guesses without a match

use proptest::prelude::*;
use regexplain::config::EstimatorConfig;
use regexplain::core::walk::walk;
use regexplain::engine::exec::collect_matches;
use regexplain::estimate::MAX_FINDINGS;
use regexplain::intent::{FALLBACK_CONFIDENCE, MAX_CONFIDENCE};
use regexplain::{
    detect_risks, estimate, infer_intent, parse_pattern, EstimateInput, Flags, IntentLabel, Regex,
    RiskContext,
};

/// Small patterns over a syntax-heavy alphabet, valid or not
fn pattern_text() -> impl Strategy<Value = String> {
    "[ab0-9()|*+?.^$\\[\\]{},:@\\\\dws-]{0,12}"
}

fn flag_text() -> impl Strategy<Value = String> {
    "[gimsuy]{0,3}"
}

proptest! {
    #[test]
    fn prop_parser_agrees_with_engine(source in pattern_text(), flags in flag_text()) {
        let engine = Flags::parse(&flags)
            .ok()
            .map(|f| Regex::new(&source, f).is_ok());
        let parsed = parse_pattern(&source, &flags);
        match engine {
            Some(compiles) => prop_assert_eq!(parsed.is_ok(), compiles),
            None => prop_assert!(parsed.is_err()),
        }
    }

    #[test]
    fn prop_spans_stay_inside_the_source(source in pattern_text()) {
        if let Ok(parsed) = parse_pattern(&source, "") {
            let mut spans = Vec::new();
            walk(&parsed.pattern, |node| spans.push(node.span()));
            prop_assert!(!spans.is_empty());
            for span in spans {
                prop_assert!(span.start <= span.end);
                prop_assert!(span.end <= source.len());
            }
        }
    }

    #[test]
    fn prop_risk_messages_are_hedged(source in pattern_text(), flags in flag_text()) {
        if let Ok(parsed) = parse_pattern(&source, &flags) {
            for warning in detect_risks(&parsed, &RiskContext::default()) {
                let message = warning.message.to_lowercase();
                for word in ["will ", "always", "guaranteed", "definitely"] {
                    prop_assert!(!message.contains(word), "{}: {}", warning.id, warning.message);
                }
            }
        }
    }

    #[test]
    fn prop_intent_confidence_is_bounded(source in pattern_text()) {
        if let Ok(parsed) = parse_pattern(&source, "") {
            let intent = infer_intent(&parsed);
            if intent.label == IntentLabel::General {
                prop_assert!(intent.confidence <= FALLBACK_CONFIDENCE);
            } else {
                prop_assert!(intent.confidence >= 0.35);
                prop_assert!(intent.confidence <= MAX_CONFIDENCE);
            }
            prop_assert!(!intent.rationale.is_empty());
        }
    }

    #[test]
    fn prop_estimator_respects_caps(
        source in "[a-c0-9]{1,3}[+*?]?",
        sample in "[a-c0-9 \\-]{0,40}",
        max_total_work in 1usize..40,
    ) {
        let parsed = parse_pattern(&source, "g").unwrap();
        let regex = Regex::new(&source, parsed.flags).unwrap();
        let matches = collect_matches(&regex, &sample, 100).unwrap().matches;
        let config = EstimatorConfig { max_total_work, ..EstimatorConfig::default() };
        let report = estimate(
            &EstimateInput { parsed: &parsed, sample: &sample, matches: &matches },
            &config,
        );

        prop_assert!(report.attempts <= max_total_work);
        prop_assert!(report.likely_false_positives.len() <= MAX_FINDINGS);
        prop_assert!(report.likely_false_negatives.len() <= MAX_FINDINGS);
        if matches.is_empty() {
            prop_assert!(report.likely_false_positives.is_empty());
            prop_assert!(report.likely_false_negatives.is_empty());
            prop_assert_eq!(report.notes.len(), 1);
        }
    }
}
