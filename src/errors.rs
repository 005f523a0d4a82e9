//! Shared error types for the application

use crate::parser::PatternError;
use thiserror::Error;

/// Main error type for regexplain operations
#[derive(Debug, Error)]
pub enum Error {
    /// Pattern could not be parsed or compiled
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML errors
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// True when the failure is the user's pattern rather than the environment.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Error::Pattern(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_errors_display_their_message() {
        let err: Error = crate::parser::parse_pattern("(", "").unwrap_err().into();
        assert!(err.is_pattern());
        assert!(err.to_string().starts_with("Invalid regular expression"));
    }

    #[test]
    fn test_toml_errors_convert() {
        let toml_err = toml::from_str::<crate::config::RegexplainConfig>("[x").unwrap_err();
        let err: Error = toml_err.into();
        assert!(!err.is_pattern());
        assert!(err.to_string().starts_with("Failed to parse configuration"));
    }

    #[test]
    fn test_missing_config_file_is_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = crate::config::load_config_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
