//! CLI error type

use thiserror::Error;

/// Errors surfaced to the terminal
#[derive(Error, Debug)]
pub enum CliError {
    /// A command-line value could not be parsed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration loading or merging failed
    #[error("configuration error: {0}")]
    Config(#[from] djforge_config::ConfigError),

    /// Project generation failed
    #[error("generation error: {0}")]
    Generation(#[from] djforge_generation::GenerationError),

    /// Filesystem access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
