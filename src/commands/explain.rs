use crate::analysis::{analyze, AnalysisRequest};
use crate::config::{load_config, load_config_from, RegexplainConfig};
use crate::io::{self, create_writer, OutputFormat};
use crate::parser::PatternError;
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ExplainConfig {
    pub pattern: String,
    pub flags: String,
    pub sample: Option<String>,
    pub sample_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_risks: bool,
    pub no_estimate: bool,
    pub plain: bool,
}

/// Runs the analysis and writes the report. An invalid pattern is reported
/// on stderr and returned as a [`PatternError`] so the caller can pick the
/// exit status.
pub fn handle_explain(config: ExplainConfig) -> Result<()> {
    configure_output(&config);
    let settings = resolve_settings(&config)?;
    let sample = read_sample(&config)?;

    let mut request = AnalysisRequest::new(&config.pattern, &config.flags);
    request.sample = sample;

    let report = match analyze(&request, &settings) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{}", render_pattern_error(&config.pattern, &err));
            return Err(err.into());
        }
    };
    info!(
        "analyzed /{}/{}: {} warning(s)",
        report.pattern,
        report.flags,
        report.warnings.len()
    );

    let mut writer = create_writer(config.format, config.output.as_deref())?;
    writer.write_report(&report)?;
    Ok(())
}

fn configure_output(config: &ExplainConfig) {
    if config.plain || config.output.is_some() {
        colored::control::set_override(false);
    }
}

fn resolve_settings(config: &ExplainConfig) -> Result<RegexplainConfig> {
    let mut settings = match &config.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => load_config(),
    };
    if config.no_risks {
        settings.features.risk_detection = false;
    }
    if config.no_estimate {
        settings.features.fp_fn_estimation = false;
    }
    debug!("effective features: {:?}", settings.features);
    Ok(settings)
}

fn read_sample(config: &ExplainConfig) -> Result<Option<String>> {
    match (&config.sample, &config.sample_file) {
        (Some(text), _) => Ok(Some(text.clone())),
        (None, Some(path)) => io::read_file(path)
            .with_context(|| format!("Failed to read sample file {}", path.display()))
            .map(Some),
        (None, None) => Ok(None),
    }
}

/// Error message plus, when the position is known, the pattern with a caret
/// under the offending character.
pub fn render_pattern_error(pattern: &str, err: &PatternError) -> String {
    let mut out = format!("{} {}", "error:".red().bold(), err.message);
    if let Some(offset) = err.offset {
        let caret_at = offset.min(pattern.chars().count());
        out.push_str(&format!(
            "\n  {}\n  {}{}",
            pattern,
            " ".repeat(caret_at),
            "^".red().bold()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pattern;

    #[test]
    fn test_render_pattern_error_points_at_offset() {
        colored::control::set_override(false);
        let err = parse_pattern("a)", "").unwrap_err();
        let rendered = render_pattern_error("a)", &err);
        assert!(rendered.starts_with("error: Invalid regular expression"));
        if let Some(offset) = err.offset {
            let caret_line = rendered.lines().last().unwrap();
            assert_eq!(caret_line.find('^'), Some(2 + offset));
        }
    }

    #[test]
    fn test_render_without_offset_is_single_line() {
        colored::control::set_override(false);
        let err = parse_pattern("a", "zz").unwrap_err();
        assert_eq!(err.offset, None);
        assert_eq!(render_pattern_error("a", &err).lines().count(), 1);
    }

    #[test]
    fn test_cli_overrides_disable_features() {
        let config = ExplainConfig {
            pattern: "a".into(),
            flags: String::new(),
            sample: None,
            sample_file: None,
            format: OutputFormat::Json,
            output: None,
            config: None,
            no_risks: true,
            no_estimate: true,
            plain: true,
        };
        let settings = resolve_settings(&config).unwrap();
        assert!(!settings.features.risk_detection);
        assert!(!settings.features.fp_fn_estimation);
    }
}
