//! Heuristic false-positive / false-negative estimation.
//!
//! Seeds come from observed matches. Each seed is perturbed in fixed ways
//! and re-tested: a tolerable edit that stops matching is a likely false
//! negative, an obviously wrong edit that still matches is a likely false
//! positive. Three caps bound the work (candidates, characters per sample
//! line, total tests); hitting any of them stops generation and leaves a
//! note.

pub mod variants;

use crate::config::EstimatorConfig;
use crate::core::types::{ExampleFinding, FpFnReport, MatchRecord};
use crate::engine::Regex;
use crate::parser::ParsedPattern;
use log::debug;
pub use variants::{should_match, should_not_match, PatternTraits, Variant};

/// Entries kept per output list.
pub const MAX_FINDINGS: usize = 6;
/// Seeds kept after de-duplication.
pub const MAX_SEEDS: usize = 40;
/// Characters kept from any single seed.
pub const MAX_SEED_CHARS: usize = 300;

pub struct EstimateInput<'a> {
    pub parsed: &'a ParsedPattern,
    pub sample: &'a str,
    pub matches: &'a [MatchRecord],
}

/// Counts variant tests against `max_total_work`.
struct WorkBudget {
    used: usize,
    limit: usize,
    exhausted: bool,
}

impl WorkBudget {
    fn new(limit: usize) -> Self {
        WorkBudget {
            used: 0,
            limit,
            exhausted: false,
        }
    }

    /// Runs one test. `None` means no signal: the budget ran out or the
    /// engine gave up on this input.
    fn test(&mut self, regex: &Regex, text: &str) -> Option<bool> {
        if self.used >= self.limit {
            self.exhausted = true;
            return None;
        }
        self.used += 1;
        match regex.is_match(text) {
            Ok(matched) => Some(matched),
            Err(e) => {
                debug!("variant test skipped: {}", e);
                None
            }
        }
    }
}

pub fn estimate(input: &EstimateInput<'_>, config: &EstimatorConfig) -> FpFnReport {
    let mut report = FpFnReport::default();
    let parsed = input.parsed;

    let regex = match Regex::new(&parsed.source, parsed.flags.without_global()) {
        Ok(regex) => regex.with_step_limit(config.test_step_limit),
        Err(e) => {
            report.notes.push(format!(
                "Estimation skipped: the pattern could not be compiled for testing ({})",
                e
            ));
            return report;
        }
    };

    if input.matches.is_empty() {
        report.notes.push(
            "No matches in the sample. Add sample text containing at least one expected match \
             to estimate likely false positives and negatives."
                .to_string(),
        );
        return report;
    }

    let seeds = extract_seeds(input, config, &mut report.notes);
    let traits = PatternTraits::probe(parsed);
    let mut budget = WorkBudget::new(config.max_total_work);
    let mut negatives: Vec<ExampleFinding> = Vec::new();
    let mut positives: Vec<ExampleFinding> = Vec::new();

    'seeds: for seed in &seeds {
        if negatives.len() < MAX_FINDINGS {
            for variant in should_match(seed, &traits) {
                if contains_text(&negatives, &variant.text) {
                    continue;
                }
                match budget.test(&regex, &variant.text) {
                    Some(false) => negatives.push(ExampleFinding {
                        reason: format!(
                            "Likely false negative: the pattern rejects \"{}\" with {}",
                            seed, variant.edit
                        ),
                        text: variant.text,
                    }),
                    Some(true) => {}
                    None if budget.exhausted => break 'seeds,
                    None => {}
                }
            }
        }

        if positives.len() < MAX_FINDINGS {
            for variant in should_not_match(seed, &traits) {
                if contains_text(&positives, &variant.text) {
                    continue;
                }
                match budget.test(&regex, &variant.text) {
                    Some(true) => positives.push(ExampleFinding {
                        reason: format!(
                            "Likely false positive: the pattern still matches \"{}\" with {}",
                            seed, variant.edit
                        ),
                        text: variant.text,
                    }),
                    Some(false) => {}
                    None if budget.exhausted => break 'seeds,
                    None => {}
                }
            }
        }

        if negatives.len() >= MAX_FINDINGS && positives.len() >= MAX_FINDINGS {
            break;
        }
    }

    if budget.exhausted {
        report.notes.push(format!(
            "Estimation capped: stopped after {} variant tests",
            budget.used
        ));
    }

    negatives.truncate(MAX_FINDINGS);
    positives.truncate(MAX_FINDINGS);
    debug!(
        "estimate: {} seed(s), {} test(s), {} likely FN, {} likely FP",
        seeds.len(),
        budget.used,
        negatives.len(),
        positives.len()
    );

    report.likely_false_negatives = negatives;
    report.likely_false_positives = positives;
    report.attempts = budget.used;
    report
}

fn contains_text(findings: &[ExampleFinding], text: &str) -> bool {
    findings.iter().any(|f| f.text == text)
}

/// Match texts and non-trivial group values. Only a sample line longer
/// than `max_line_chars` characters clips the seeds that start on it.
fn extract_seeds(
    input: &EstimateInput<'_>,
    config: &EstimatorConfig,
    notes: &mut Vec<String>,
) -> Vec<String> {
    let mut seeds: Vec<String> = Vec::new();
    let mut candidates = 0usize;
    let mut line_truncated = false;
    let mut capped = false;

    'records: for record in input.matches {
        let cut = line_cut(input.sample, record.span.0, config.max_line_chars);
        line_truncated |= cut.is_some();

        let group_spans = record
            .groups
            .iter()
            .filter(|g| g.value.chars().count() >= 2)
            .filter_map(|g| g.span);

        for (start, end) in std::iter::once(record.span).chain(group_spans) {
            if candidates >= config.max_candidates {
                capped = true;
                break 'records;
            }
            candidates += 1;

            let Some(seed) = windowed(input.sample, start, end, cut) else {
                continue;
            };
            let seed: String = seed.chars().take(MAX_SEED_CHARS).collect();
            if !seed.is_empty() && !seeds.contains(&seed) {
                seeds.push(seed);
                if seeds.len() >= MAX_SEEDS {
                    break 'records;
                }
            }
        }
    }

    if line_truncated {
        notes.push(format!(
            "Sample lines longer than {} characters were truncated for estimation",
            config.max_line_chars
        ));
    }
    if capped {
        notes.push(format!(
            "Estimation capped: only the first {} seed candidates were considered",
            config.max_candidates
        ));
    }
    seeds
}

/// Byte offset where the line containing `offset` is cut, when that line
/// is longer than `max_chars` characters.
fn line_cut(sample: &str, offset: usize, max_chars: usize) -> Option<usize> {
    let offset = offset.min(sample.len());
    let line_start = sample[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = sample[line_start..].split('\n').next().unwrap_or("");
    line.char_indices()
        .nth(max_chars)
        .map(|(i, _)| line_start + i)
}

/// The seed text for `start..end`, clipped at `cut` when the line was cut.
/// Spans that start past the cut yield nothing.
fn windowed(sample: &str, start: usize, end: usize, cut: Option<usize>) -> Option<&str> {
    match cut {
        Some(cut) if start >= cut => None,
        Some(cut) => sample.get(start..end.min(cut)),
        None => sample.get(start..end),
    }
}
