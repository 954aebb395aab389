use thiserror::Error;

/// Errors that can occur during analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The analytic is only defined for the `Overall` selection.
    #[error("Invalid selection: {analysis} requires the Overall selection, got '{selection}'")]
    InvalidSelection {
        /// Name of the requested analytic.
        analysis: &'static str,
        /// Selection the caller passed.
        selection: String,
    },
    /// Resource file could not be interpreted.
    #[error("Resource error: {0}")]
    Resource(String),
    /// Sentiment lexicon error.
    #[error("Sentiment lexicon error: {0}")]
    Lexicon(String),
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
