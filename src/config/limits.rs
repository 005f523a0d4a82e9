use serde::{Deserialize, Serialize};

/// Capability switches. Disabled features are skipped, not reported as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_enabled")]
    pub risk_detection: bool,

    #[serde(default = "default_enabled")]
    pub fp_fn_estimation: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            risk_detection: default_enabled(),
            fp_fn_estimation: default_enabled(),
        }
    }
}

/// Work caps for the false-positive/negative estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Seed candidates considered from match records.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Characters kept from each sample line.
    #[serde(default = "default_max_line_chars")]
    pub max_line_chars: usize,

    /// Variant tests across both lists combined.
    #[serde(default = "default_max_total_work")]
    pub max_total_work: usize,

    /// Engine step budget for a single variant test.
    #[serde(default = "default_test_step_limit")]
    pub test_step_limit: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            max_line_chars: default_max_line_chars(),
            max_total_work: default_max_total_work(),
            test_step_limit: default_test_step_limit(),
        }
    }
}

/// Timing probe run when backtracking shapes are detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Probe durations above this are attached to the warning.
    #[serde(default = "default_threshold_ms")]
    pub threshold_ms: u64,

    #[serde(default = "default_probe_step_limit")]
    pub step_limit: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            threshold_ms: default_threshold_ms(),
            step_limit: default_probe_step_limit(),
        }
    }
}

/// Limits for running the pattern over sample text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,

    #[serde(default = "default_execution_step_limit")]
    pub step_limit: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_matches: default_max_matches(),
            step_limit: default_execution_step_limit(),
        }
    }
}

pub fn default_enabled() -> bool {
    true
}

pub fn default_max_candidates() -> usize {
    250
}

pub fn default_max_line_chars() -> usize {
    500
}

pub fn default_max_total_work() -> usize {
    2000
}

pub fn default_test_step_limit() -> u64 {
    100_000
}

pub fn default_threshold_ms() -> u64 {
    40
}

pub fn default_probe_step_limit() -> u64 {
    5_000_000
}

pub fn default_max_matches() -> usize {
    1000
}

pub fn default_execution_step_limit() -> u64 {
    1_000_000
}
