//! End-to-end behaviour of the analysis pipeline on representative patterns.

use pretty_assertions::assert_eq;
use regexplain::intent::{extract, score_all};
use regexplain::{
    analyze, parse_pattern, AnalysisRequest, IntentLabel, RegexplainConfig, Severity, WarningId,
};

fn quiet_config() -> RegexplainConfig {
    let mut config = RegexplainConfig::default();
    config.probe.enabled = false;
    config
}

#[test]
fn test_literal_word_in_sentence() {
    let request = AnalysisRequest::new("cat", "").with_sample("the cat sat");
    let report = analyze(&request, &quiet_config()).unwrap();

    let literal_lines: Vec<_> = report
        .explanation
        .components
        .iter()
        .filter(|line| line.as_str() == "Literal \"cat\"")
        .collect();
    assert_eq!(literal_lines.len(), 1);
    assert_eq!(report.intent.label, IntentLabel::General);

    let preview = report.preview.unwrap();
    assert_eq!(preview.matches.len(), 1);
    assert_eq!(preview.matches[0].text, "cat");
    assert_eq!(preview.matches[0].span, (4, 7));
}

#[test]
fn test_anchored_phone_number() {
    let pattern = "^\\d{3}-\\d{3}-\\d{4}$";
    let request = AnalysisRequest::new(pattern, "").with_sample("123-456-7890");
    let report = analyze(&request, &quiet_config()).unwrap();

    let preview = report.preview.unwrap();
    assert_eq!(preview.matches.len(), 1);
    assert_eq!(preview.matches[0].span, (0, 12));
    assert!(report
        .warnings
        .iter()
        .all(|w| w.id != WarningId::UnanchoredMismatch));

    let scores = score_all(&extract(&parse_pattern(pattern, "").unwrap()));
    let phone = scores
        .iter()
        .find(|s| s.label == IntentLabel::PhoneLike)
        .unwrap();
    assert!(phone.points > 0);
}

#[test]
fn test_nested_quantifier_is_flagged_high() {
    let mut config = quiet_config();
    config.execution.step_limit = 10_000;
    let request =
        AnalysisRequest::new("(a+)+$", "").with_sample(format!("{}X", "a".repeat(24)));
    let report = analyze(&request, &config).unwrap();

    let find = |id: WarningId| report.warnings.iter().find(|w| w.id == id).unwrap();
    assert_eq!(find(WarningId::NestedQuantifiers).severity, Severity::High);
    assert_eq!(find(WarningId::PotentialBacktracking).severity, Severity::High);
}

#[test]
fn test_unterminated_class_is_reported_not_raised() {
    let request = AnalysisRequest::new("([a-z]", "").with_sample("anything");
    let err = analyze(&request, &quiet_config()).unwrap_err();
    assert!(err.message.starts_with("Invalid regular expression: /([a-z]/: "));
    assert!(err.message.contains("Unterminated group"));
}

#[test]
fn test_email_shape_is_recognised() {
    let request =
        AnalysisRequest::new("^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$", "").with_sample("a.b+tag@example.com");
    let report = analyze(&request, &quiet_config()).unwrap();

    let preview = report.preview.unwrap();
    assert_eq!(preview.matches.len(), 1);
    assert_eq!(preview.matches[0].text, "a.b+tag@example.com");
    assert_eq!(report.intent.label, IntentLabel::EmailLike);
    assert!(report.intent.confidence >= 0.6);
}

#[test]
fn test_report_serializes_with_stable_identifiers() {
    let request = AnalysisRequest::new("a|", "y").with_sample("a");
    let report = analyze(&request, &quiet_config()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["flags"], "y");
    let ids: Vec<_> = json["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap().to_string())
        .collect();
    assert!(ids.contains(&"EMPTY_ALTERNATION".to_string()));
    assert_eq!(json["features"]["risk_detection"], true);
}
