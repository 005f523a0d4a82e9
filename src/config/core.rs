use serde::{Deserialize, Serialize};

use super::limits::{EstimatorConfig, ExecutionConfig, FeaturesConfig, ProbeConfig};

/// Root configuration structure for regexplain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexplainConfig {
    #[serde(default)]
    pub features: FeaturesConfig,

    #[serde(default)]
    pub estimator: EstimatorConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl RegexplainConfig {
    /// Rejects caps that would disable work silently.
    pub fn validate(&self) -> Result<(), String> {
        let caps: [(&str, u64); 7] = [
            ("estimator.max_candidates", self.estimator.max_candidates as u64),
            ("estimator.max_line_chars", self.estimator.max_line_chars as u64),
            ("estimator.max_total_work", self.estimator.max_total_work as u64),
            ("estimator.test_step_limit", self.estimator.test_step_limit),
            ("probe.step_limit", self.probe.step_limit),
            ("execution.max_matches", self.execution.max_matches as u64),
            ("execution.step_limit", self.execution.step_limit),
        ];
        let zero: Vec<&str> = caps
            .iter()
            .filter(|(_, value)| *value == 0)
            .map(|(name, _)| *name)
            .collect();
        if zero.is_empty() {
            Ok(())
        } else {
            Err(format!("must be greater than zero: {}", zero.join(", ")))
        }
    }

    /// Default configuration rendered as TOML, as written by `init`.
    pub fn default_toml() -> String {
        let body = toml::to_string_pretty(&RegexplainConfig::default()).unwrap_or_default();
        format!("# regexplain configuration\n\n{}", body)
    }
}
