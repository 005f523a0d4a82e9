use std::fs;
use std::path::{Path, PathBuf};

use super::core::RegexplainConfig;
use crate::errors::Error;

pub const CONFIG_FILE_NAME: &str = ".regexplain.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<RegexplainConfig, Error> {
    let config = toml::from_str::<RegexplainConfig>(contents)?;
    config
        .validate()
        .map_err(|e| Error::Config(format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))?;
    Ok(config)
}

/// Strict load from an explicit path; errors are returned to the caller.
pub fn load_config_from(path: &Path) -> Result<RegexplainConfig, Error> {
    let contents = fs::read_to_string(path)?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Lenient load used during discovery: anything unusable falls back to `None`.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<RegexplainConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}: {}. Using defaults.", config_path.display(), e);
            None
        }
    }
}

/// Directory and its ancestors, nearest first, up to `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Finds the nearest config starting at `start`.
pub fn discover_config(start: PathBuf) -> RegexplainConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            RegexplainConfig::default()
        })
}

pub fn load_config() -> RegexplainConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            RegexplainConfig::default()
        }
    }
}
