//! End-to-end analysis of one pattern: parse, explain, infer intent, run the
//! sample, detect risks and estimate likely false positives and negatives.

use crate::config::{FeaturesConfig, RegexplainConfig};
use crate::core::types::{Explanation, FpFnReport, IntentResult, MatchRecord, Warning};
use crate::engine::exec::collect_matches;
use crate::engine::Regex;
use crate::estimate::{estimate, EstimateInput};
use crate::explain::explain;
use crate::intent::infer_intent;
use crate::parser::{parse_pattern, ParsedPattern, PatternError};
use crate::risk::{detect_risks, RiskContext};
use log::{debug, warn};
use serde::Serialize;

/// What to analyze.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub pattern: String,
    pub flags: String,
    pub sample: Option<String>,
}

impl AnalysisRequest {
    pub fn new(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        AnalysisRequest {
            pattern: pattern.into(),
            flags: flags.into(),
            sample: None,
        }
    }

    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }
}

/// Sample execution outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchPreview {
    pub matches: Vec<MatchRecord>,
    /// Collection stopped at `execution.max_matches`.
    pub truncated: bool,
    /// Set when the engine gave up, e.g. on its step limit.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub pattern: String,
    /// Normalized flag string.
    pub flags: String,
    pub explanation: Explanation,
    pub intent: IntentResult,
    /// `None` when no sample was supplied.
    pub preview: Option<MatchPreview>,
    pub warnings: Vec<Warning>,
    pub estimate: Option<FpFnReport>,
    pub features: FeaturesConfig,
}

/// Runs every analysis stage enabled in `config`. Only an invalid pattern
/// is an error; downstream stages are never run for one.
pub fn analyze(
    request: &AnalysisRequest,
    config: &RegexplainConfig,
) -> Result<AnalysisReport, PatternError> {
    let parsed = parse_pattern(&request.pattern, &request.flags)?;
    let sample = request.sample.as_deref();

    let explanation = explain(&parsed.pattern, parsed.flags);
    let intent = infer_intent(&parsed);
    let preview = sample.map(|text| run_sample(&parsed, text, config));

    let warnings = if config.features.risk_detection {
        let ctx = RiskContext {
            sample,
            probe: config.probe.enabled.then_some(&config.probe),
        };
        detect_risks(&parsed, &ctx)
    } else {
        debug!("risk detection disabled");
        Vec::new()
    };

    let estimate = match (sample, &preview) {
        (Some(_), Some(MatchPreview { error: Some(error), .. }))
            if config.features.fp_fn_estimation =>
        {
            debug!("estimate skipped: sample execution failed");
            Some(FpFnReport {
                notes: vec![format!(
                    "Estimation skipped: the sample could not be run to completion ({})",
                    error
                )],
                ..FpFnReport::default()
            })
        }
        (Some(text), Some(preview)) if config.features.fp_fn_estimation => Some(estimate(
            &EstimateInput {
                parsed: &parsed,
                sample: text,
                matches: &preview.matches,
            },
            &config.estimator,
        )),
        _ => None,
    };

    Ok(AnalysisReport {
        pattern: parsed.source.clone(),
        flags: parsed.flags_string(),
        explanation,
        intent,
        preview,
        warnings,
        estimate,
        features: config.features.clone(),
    })
}

fn run_sample(parsed: &ParsedPattern, sample: &str, config: &RegexplainConfig) -> MatchPreview {
    let regex = match Regex::new(&parsed.source, parsed.flags) {
        Ok(regex) => regex.with_step_limit(config.execution.step_limit),
        Err(e) => {
            return MatchPreview {
                error: Some(e.to_string()),
                ..MatchPreview::default()
            }
        }
    };
    match collect_matches(&regex, sample, config.execution.max_matches) {
        Ok(execution) => MatchPreview {
            matches: execution.matches,
            truncated: execution.truncated,
            error: None,
        },
        Err(e) => {
            warn!("sample execution stopped: {}", e);
            MatchPreview {
                error: Some(e.to_string()),
                ..MatchPreview::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IntentLabel, WarningId};

    #[test]
    fn test_invalid_pattern_is_an_error_value() {
        let request = AnalysisRequest::new("([a-z]", "").with_sample("abc");
        let err = analyze(&request, &RegexplainConfig::default()).unwrap_err();
        assert!(err.message.contains("Unterminated group"));
    }

    #[test]
    fn test_full_report_for_literal() {
        let request = AnalysisRequest::new("cat", "").with_sample("the cat sat");
        let report = analyze(&request, &RegexplainConfig::default()).unwrap();
        assert_eq!(report.intent.label, IntentLabel::General);
        let preview = report.preview.unwrap();
        assert_eq!(preview.matches.len(), 1);
        assert_eq!(preview.matches[0].span, (4, 7));
        assert!(report.estimate.is_some());
    }

    #[test]
    fn test_disabled_features_are_skipped() {
        let mut config = RegexplainConfig::default();
        config.features.risk_detection = false;
        config.features.fp_fn_estimation = false;
        let request = AnalysisRequest::new("(a+)+$", "").with_sample("aaa");
        let report = analyze(&request, &config).unwrap();
        assert!(report.warnings.is_empty());
        assert!(report.estimate.is_none());
        assert!(!report.features.risk_detection);
    }

    #[test]
    fn test_no_sample_means_no_preview_or_estimate() {
        let report = analyze(&AnalysisRequest::new("a|", ""), &RegexplainConfig::default()).unwrap();
        assert!(report.preview.is_none());
        assert!(report.estimate.is_none());
        assert_eq!(report.warnings[0].id, WarningId::EmptyAlternation);
    }

    #[test]
    fn test_step_limit_during_preview_is_reported() {
        let mut config = RegexplainConfig::default();
        config.execution.step_limit = 1_000;
        config.probe.enabled = false;
        let request = AnalysisRequest::new("(a+)+$", "").with_sample(format!("{}!", "a".repeat(25)));
        let report = analyze(&request, &config).unwrap();
        let preview = report.preview.unwrap();
        assert!(preview.matches.is_empty());
        assert!(preview.error.is_some());

        let notes = report.estimate.unwrap().notes;
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("Match step limit exceeded"));
        assert!(!notes[0].contains("No matches in the sample"));
    }

    #[test]
    fn test_long_benign_samples_preview_cleanly() {
        let config = RegexplainConfig::default();
        let request = AnalysisRequest::new("[a-z]+@", "").with_sample("a".repeat(2_000));
        let preview = analyze(&request, &config).unwrap().preview.unwrap();
        assert_eq!(preview.error, None);
        assert!(preview.matches.is_empty());

        let request =
            AnalysisRequest::new("cat", "").with_sample(format!("{}cat", "x".repeat(1_100_000)));
        let preview = analyze(&request, &config).unwrap().preview.unwrap();
        assert_eq!(preview.error, None);
        assert_eq!(preview.matches[0].span, (1_100_000, 1_100_003));
    }
}
