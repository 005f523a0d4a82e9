//! Configuration: capability switches and work caps, read from
//! `.regexplain.toml`.

mod core;
mod limits;
mod loader;

pub use self::core::RegexplainConfig;
pub use limits::{
    default_enabled, default_execution_step_limit, default_max_candidates,
    default_max_line_chars, default_max_matches, default_max_total_work,
    default_probe_step_limit, default_test_step_limit, default_threshold_ms, EstimatorConfig,
    ExecutionConfig, FeaturesConfig, ProbeConfig,
};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
