//! Intent inference: a best-guess label for what a pattern is meant to match.
//!
//! Every candidate label is scored independently with additive point rules
//! over [`Features`]. The best score wins (ties go to the earlier candidate)
//! and is mapped to a confidence that never exceeds 0.9. Weak winners fall
//! back to the general label.

pub mod features;

use crate::core::types::{IntentLabel, IntentResult};
use crate::parser::ParsedPattern;
pub use features::{extract, Features};
use log::debug;

/// Winners below this confidence are reported as [`IntentLabel::General`].
pub const CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const MAX_CONFIDENCE: f64 = 0.9;
pub const FALLBACK_CONFIDENCE: f64 = 0.55;
const MAX_RATIONALE: usize = 3;

/// Candidate labels in tie-break order.
pub const CANDIDATES: [IntentLabel; 14] = [
    IntentLabel::EmailLike,
    IntentLabel::UrlLike,
    IntentLabel::Uuid,
    IntentLabel::Ipv4,
    IntentLabel::Ipv6,
    IntentLabel::IsoDate,
    IntentLabel::Time24h,
    IntentLabel::Timestamp,
    IntentLabel::Semver,
    IntentLabel::HexString,
    IntentLabel::AlphanumericId,
    IntentLabel::LogLevel,
    IntentLabel::PhoneLike,
    IntentLabel::FilePath,
];

/// Score accumulator for one candidate.
#[derive(Debug, Clone)]
pub struct Score {
    pub label: IntentLabel,
    pub points: i32,
    pub rationale: Vec<String>,
}

impl Score {
    fn new(label: IntentLabel) -> Self {
        Score {
            label,
            points: 0,
            rationale: Vec::new(),
        }
    }

    /// Adds `points` when `signal` holds; positive contributions are explained.
    fn add(&mut self, signal: bool, points: i32, reason: &str) -> &mut Self {
        if signal {
            self.points += points;
            if points > 0 {
                self.rationale.push(reason.to_string());
            }
        }
        self
    }

    fn clamped(&self) -> i32 {
        self.points.clamp(0, 100)
    }
}

/// Maps a clamped score to a confidence in `[0.35, 0.9]`.
pub fn confidence_for(score: i32) -> f64 {
    (0.35 + f64::from(score) / 100.0 * 0.6).clamp(0.0, MAX_CONFIDENCE)
}

pub fn infer_intent(parsed: &ParsedPattern) -> IntentResult {
    let features = extract(parsed);
    let scores = score_all(&features);
    let Some(best) = pick_best(&scores) else {
        return fallback(confidence_for(0));
    };

    let confidence = confidence_for(best.clamped());
    debug!(
        "intent winner {} with score {} (confidence {:.2})",
        best.label,
        best.clamped(),
        confidence
    );

    if confidence < CONFIDENCE_THRESHOLD {
        return fallback(confidence);
    }

    let mut rationale: Vec<String> = best.rationale.iter().take(MAX_RATIONALE).cloned().collect();
    if rationale.is_empty() {
        rationale.push(format!(
            "Pattern structure resembles a {}",
            best.label.display_name()
        ));
    }
    IntentResult {
        label: best.label,
        confidence,
        rationale,
    }
}

fn fallback(confidence: f64) -> IntentResult {
    IntentResult {
        label: IntentLabel::General,
        confidence: confidence.min(FALLBACK_CONFIDENCE),
        rationale: vec!["No strong intent signals were found in the pattern".to_string()],
    }
}

/// Highest clamped score; the earliest candidate wins ties.
pub fn pick_best(scores: &[Score]) -> Option<&Score> {
    // max_by_key would keep the last maximum
    scores.iter().fold(None, |best: Option<&Score>, score| match best {
        Some(b) if b.clamped() >= score.clamped() => Some(b),
        _ => Some(score),
    })
}

/// Scores every candidate in [`CANDIDATES`] order.
pub fn score_all(f: &Features) -> Vec<Score> {
    CANDIDATES.iter().map(|&label| score(label, f)).collect()
}

fn score(label: IntentLabel, f: &Features) -> Score {
    let mut s = Score::new(label);
    match label {
        IntentLabel::EmailLike => {
            s.add(f.at_sign, 45, "Contains a literal '@' separator")
                .add(f.escaped_dot, 15, "Contains a literal dot, as in a domain")
                .add(f.fully_anchored(), 10, "Anchored to match a whole value")
                .add(f.word_boundary, 5, "Uses word boundaries")
                .add(f.alternation, -5, "");
        }
        IntentLabel::UrlLike => {
            s.add(f.colon && f.slash, 35, "Contains ':' and '/' like a URL scheme")
                .add(f.http, 25, "Mentions http")
                .add(f.escaped_dot, 10, "Contains a literal dot, as in a host name")
                .add(f.at_sign, -10, "");
        }
        IntentLabel::Uuid => {
            s.add(f.uuid_shape, 60, "Groups of 8-4-4-4-12 characters")
                .add(f.hex_class, 15, "Uses a hexadecimal character class")
                .add(
                    f.has_count(8) && f.has_count(4) && f.has_count(12),
                    10,
                    "Repetition counts of 8, 4 and 12",
                )
                .add(f.hyphen, 5, "Uses hyphen separators");
        }
        IntentLabel::Ipv4 => {
            s.add(f.ipv4_shape, 55, "Dot-separated groups of 1-3 digits")
                .add(f.digit_class, 10, "Uses digit classes")
                .add(f.escaped_dot, 10, "Contains literal dots")
                .add(f.colon, -20, "");
        }
        IntentLabel::Ipv6 => {
            s.add(f.colon_count >= 2, 40, "Contains several ':' separators")
                .add(f.colon_count >= 5, 15, "Colon count fits an IPv6 address")
                .add(f.hex_class, 20, "Uses a hexadecimal character class")
                .add(f.at_sign || f.slash, -15, "");
        }
        IntentLabel::IsoDate => {
            s.add(f.iso_date_shape, 55, "Four digits followed by hyphenated parts")
                .add(f.hyphen, 10, "Uses hyphen separators")
                .add(f.has_count(4) && f.has_count(2), 10, "Repetition counts of 4 and 2")
                .add(f.colon, -15, "");
        }
        IntentLabel::Time24h => {
            s.add(f.time_shape, 50, "Two-digit parts separated by ':'")
                .add(f.colon, 15, "Contains a ':' separator")
                .add(f.has_count(2), 5, "Repetition count of 2")
                .add(f.hyphen, -10, "");
        }
        IntentLabel::Timestamp => {
            s.add(
                f.iso_date_shape && f.time_shape,
                60,
                "Combines a date and a time of day",
            )
            .add(f.letter_t, 15, "Contains a 'T' date/time separator")
            .add(f.zone_marker || f.plus, 5, "Allows a time zone designator");
        }
        IntentLabel::Semver => {
            s.add(f.semver_shape, 60, "Three dot-separated numeric parts")
                .add(f.escaped_dot, 10, "Contains literal dots")
                .add(f.hyphen, 5, "Allows a pre-release suffix")
                .add(f.plus, 5, "Allows build metadata");
        }
        IntentLabel::HexString => {
            s.add(f.hex_class, 40, "Uses a hexadecimal character class")
                .add(f.quantified, 10, "Repeats the hex class")
                .add(f.fully_anchored(), 10, "Anchored to match a whole value")
                .add(f.hyphen, -15, "")
                .add(f.colon, -10, "");
        }
        IntentLabel::AlphanumericId => {
            s.add(f.word_class, 30, "Uses letter and digit classes")
                .add(f.underscore || f.hyphen, 10, "Allows '_' or '-' separators")
                .add(f.brace_quantifier, 10, "Constrains the length")
                .add(f.fully_anchored(), 10, "Anchored to match a whole value")
                .add(f.at_sign, -20, "")
                .add(f.escaped_dot, -10, "");
        }
        IntentLabel::LogLevel => {
            s.add(f.log_level_words >= 2, 60, "Lists log level words")
                .add(f.alternation, 15, "Alternates between fixed tokens")
                .add(f.word_boundary, 10, "Uses word boundaries");
        }
        IntentLabel::PhoneLike => {
            s.add(f.digit_class, 20, "Uses digit classes")
                .add(f.hyphen, 15, "Uses hyphen separators")
                .add(
                    f.has_count(3) && f.has_count(4),
                    20,
                    "Digit groups of 3 and 4 like a phone number",
                )
                .add(f.plus, 10, "Allows a '+' country prefix")
                .add(f.open_paren, 5, "Allows parentheses around an area code")
                .add(f.fully_anchored(), 5, "Anchored to match a whole value")
                .add(f.at_sign, -20, "")
                .add(f.escaped_dot, -15, "");
        }
        IntentLabel::FilePath => {
            s.add(f.slash || f.backslash, 35, "Contains path separators")
                .add(f.escaped_dot, 10, "Contains a literal dot, as in a file extension")
                .add(f.colon && f.slash, -25, "")
                .add(f.at_sign, -10, "");
        }
        IntentLabel::General => {}
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pattern;

    fn intent(source: &str) -> IntentResult {
        infer_intent(&parse_pattern(source, "").unwrap())
    }

    #[test]
    fn test_plain_literal_falls_back_to_general() {
        let result = intent("cat");
        assert_eq!(result.label, IntentLabel::General);
        assert!(result.confidence <= FALLBACK_CONFIDENCE);
        assert_eq!(result.rationale.len(), 1);
    }

    #[test]
    fn test_email_wins_with_rationale() {
        let result = intent("^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$");
        assert_eq!(result.label, IntentLabel::EmailLike);
        assert!(result.confidence >= CONFIDENCE_THRESHOLD);
        assert!(result.rationale.len() <= 3);
        assert!(result.rationale[0].contains('@'));
    }

    #[test]
    fn test_phone_like_scores_positively() {
        let parsed = parse_pattern("^\\d{3}-\\d{3}-\\d{4}$", "").unwrap();
        let scores = score_all(&extract(&parsed));
        let phone = scores
            .iter()
            .find(|s| s.label == IntentLabel::PhoneLike)
            .unwrap();
        assert!(phone.clamped() > 0);
        assert_eq!(infer_intent(&parsed).label, IntentLabel::PhoneLike);
    }

    #[test]
    fn test_uuid_and_iso_date() {
        let uuid = intent("^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$");
        assert_eq!(uuid.label, IntentLabel::Uuid);
        assert!(uuid.confidence > 0.85 && uuid.confidence <= MAX_CONFIDENCE);
        assert_eq!(intent("^\\d{4}-\\d{2}-\\d{2}$").label, IntentLabel::IsoDate);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(
            intent("\\b(?:DEBUG|INFO|WARN|ERROR)\\b").label,
            IntentLabel::LogLevel
        );
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let mut scores = score_all(&Features::default());
        assert!(scores.iter().all(|s| s.clamped() == 0));
        assert_eq!(pick_best(&scores).unwrap().label, IntentLabel::EmailLike);

        scores[4].points = 40;
        scores[9].points = 40;
        assert_eq!(pick_best(&scores).unwrap().label, IntentLabel::Ipv6);

        scores[9].points = 41;
        assert_eq!(pick_best(&scores).unwrap().label, IntentLabel::HexString);
    }

    #[test]
    fn test_scores_are_clamped() {
        let mut f = Features::default();
        f.at_sign = true;
        let scores = score_all(&f);
        let phone = scores.iter().find(|s| s.label == IntentLabel::PhoneLike).unwrap();
        assert!(phone.points < 0);
        assert_eq!(phone.clamped(), 0);
    }

    #[test]
    fn test_confidence_mapping_is_capped() {
        assert!((confidence_for(0) - 0.35).abs() < 1e-9);
        assert!((confidence_for(50) - 0.65).abs() < 1e-9);
        assert_eq!(confidence_for(100), MAX_CONFIDENCE);
    }
}
