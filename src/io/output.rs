use crate::analysis::{AnalysisReport, MatchPreview};
use crate::core::types::{ExampleFinding, FpFnReport, Severity, Warning};
use clap::ValueEnum;
use colored::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Human-readable report. Colors follow `colored`'s global override.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_explanation(report)?;
        self.write_intent(report)?;
        if let Some(preview) = &report.preview {
            self.write_matches(preview)?;
        }
        if report.features.risk_detection {
            self.write_warnings(&report.warnings)?;
        }
        if let Some(estimate) = &report.estimate {
            self.write_estimate(estimate)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_header(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let title = format!("/{}/{}", report.pattern, report.flags);
        writeln!(self.writer, "{}", "Regex Explanation".bold().blue())?;
        writeln!(self.writer, "{}", "=================".blue())?;
        writeln!(self.writer, "{}", title.bold())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_section(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", title.bold().underline())?;
        Ok(())
    }

    fn write_explanation(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let explanation = &report.explanation;
        self.write_section("Summary")?;
        for line in &explanation.summary {
            writeln!(self.writer, "  {line}")?;
        }
        writeln!(self.writer)?;

        self.write_section("Components")?;
        for line in &explanation.components {
            writeln!(self.writer, "  {line}")?;
        }
        writeln!(self.writer)?;

        if !explanation.constraints.is_empty() {
            self.write_section("Constraints")?;
            for line in &explanation.constraints {
                writeln!(self.writer, "  - {line}")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_intent(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let intent = &report.intent;
        self.write_section("Intent")?;
        writeln!(
            self.writer,
            "  {} (confidence {:.2})",
            intent.label.display_name().cyan(),
            intent.confidence
        )?;
        for reason in &intent.rationale {
            writeln!(self.writer, "  - {}", reason.dimmed())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_matches(&mut self, preview: &MatchPreview) -> anyhow::Result<()> {
        self.write_section(&format!("Matches ({})", preview.matches.len()))?;
        if let Some(error) = &preview.error {
            writeln!(self.writer, "  {} {}", "!".yellow().bold(), error)?;
        } else if preview.matches.is_empty() {
            writeln!(self.writer, "  No matches in the sample")?;
        }
        for record in &preview.matches {
            writeln!(
                self.writer,
                "  line {:<4} {:>5}..{:<5} {}",
                record.line,
                record.span.0,
                record.span.1,
                format!("{:?}", record.text).green()
            )?;
            for group in &record.groups {
                let label = match &group.name {
                    Some(name) => format!("#{} <{}>", group.index, name),
                    None => format!("#{}", group.index),
                };
                let value = match group.span {
                    Some(_) => format!("{:?}", group.value),
                    None => "(unmatched)".dimmed().to_string(),
                };
                writeln!(self.writer, "      {label}: {value}")?;
            }
        }
        if preview.truncated {
            writeln!(
                self.writer,
                "  {}",
                "More matches exist; output was capped".dimmed()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_warnings(&mut self, warnings: &[Warning]) -> anyhow::Result<()> {
        self.write_section(&format!("Warnings ({})", warnings.len()))?;
        if warnings.is_empty() {
            writeln!(self.writer, "  {}", "No risks detected".green())?;
        }
        for warning in warnings {
            writeln!(
                self.writer,
                "  {} {} {}",
                severity_badge(warning.severity),
                warning.title.bold(),
                format!("({})", warning.id).dimmed()
            )?;
            writeln!(self.writer, "      {}", warning.message)?;
            if let Some(evidence) = &warning.evidence {
                if !evidence.spans.is_empty() {
                    let spans: Vec<String> = evidence
                        .spans
                        .iter()
                        .map(|s| format!("{}..{}", s.start, s.end))
                        .collect();
                    writeln!(self.writer, "      at: {}", spans.join(", "))?;
                }
                if !evidence.examples.is_empty() {
                    writeln!(self.writer, "      e.g. {}", evidence.examples.join(", "))?;
                }
                if let Some(note) = &evidence.note {
                    writeln!(self.writer, "      {}", note.dimmed())?;
                }
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_estimate(&mut self, estimate: &FpFnReport) -> anyhow::Result<()> {
        self.write_section("False positive / negative estimate")?;
        self.write_findings("Likely false positives", &estimate.likely_false_positives)?;
        self.write_findings("Likely false negatives", &estimate.likely_false_negatives)?;
        for note in &estimate.notes {
            writeln!(self.writer, "  {} {}", "note:".dimmed(), note)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_findings(&mut self, title: &str, findings: &[ExampleFinding]) -> anyhow::Result<()> {
        if findings.is_empty() {
            writeln!(self.writer, "  {title}: none found")?;
            return Ok(());
        }
        writeln!(self.writer, "  {title}:")?;
        for finding in findings {
            writeln!(
                self.writer,
                "    {} {}",
                format!("{:?}", finding.text).yellow(),
                finding.reason.dimmed()
            )?;
        }
        Ok(())
    }
}

fn severity_badge(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity.to_string().to_uppercase());
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow().bold(),
        Severity::Low => label.cyan(),
        Severity::Info => label.dimmed(),
    }
}

/// Writer for `format`, targeting `output` or stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisRequest};
    use crate::config::RegexplainConfig;

    fn report(pattern: &str, flags: &str, sample: &str) -> AnalysisReport {
        let request = AnalysisRequest::new(pattern, flags).with_sample(sample);
        analyze(&request, &RegexplainConfig::default()).unwrap()
    }

    #[test]
    fn test_json_writer_emits_report_fields() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&report("(a+)+$", "", "aaa"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["pattern"], "(a+)+$");
        assert_eq!(value["warnings"][0]["id"], "NESTED_QUANTIFIERS");
        assert_eq!(value["warnings"][0]["severity"], "high");
        assert!(value["preview"]["matches"].is_array());
    }

    #[test]
    fn test_terminal_writer_lists_sections() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer)
            .write_report(&report("cat", "g", "cat catalog"))
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("/cat/g"));
        assert!(text.contains("Matches (2)"));
        assert!(text.contains("Intent"));
        assert!(text.contains("Warnings"));
        assert!(text.contains("Likely false positives"));
    }
}
