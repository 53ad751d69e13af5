//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while parsing or merging configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required fields are missing or malformed. Every offending
    /// entity detected in the same pass is listed.
    #[error("configuration validation failed: {}", .issues.join("; "))]
    Validation {
        /// All validation issues found, in declaration order
        issues: Vec<String>,
    },

    /// Unknown keys encountered while strict mode is enabled
    #[error("unknown configuration keys: {}", .keys.join(", "))]
    UnknownKeys {
        /// Dotted paths of every unrecognized key
        keys: Vec<String>,
    },

    /// The input document could not be parsed as YAML
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// IO error while reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Builds a validation error from collected issues.
    pub fn validation(issues: Vec<String>) -> Self {
        ConfigError::Validation { issues }
    }
}
