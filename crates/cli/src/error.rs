//! Error types for CLI operations.

use chatscope_analysis::{AnalysisError, ParseError};
use thiserror::Error;

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the core crate (configuration file I/O and validation).
    #[error(transparent)]
    Core(#[from] chatscope_core::Error),

    /// Transcript parsing error.
    #[error("Could not parse transcript: {0}")]
    Parse(#[from] ParseError),

    /// Analysis error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// JSON rendering error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
