//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// Collection store error; aborts the pass
    #[error("Store error: {0}")]
    Store(String),

    /// Field resolution failed for one candidate; the candidate is dropped
    #[error("Candidate error: {0}")]
    Candidate(String),

    /// A built-in selector failed to compile
    #[error("Invalid selector '{selector}': {reason}")]
    Selector {
        /// Selector text
        selector: String,
        /// Parser message
        reason: String,
    },

    /// A built-in pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<regex::Error> for ExtractorError {
    fn from(e: regex::Error) -> Self {
        ExtractorError::Pattern(e.to_string())
    }
}

impl From<crmsync_gatekeeper::GatekeeperError> for ExtractorError {
    fn from(e: crmsync_gatekeeper::GatekeeperError) -> Self {
        ExtractorError::Config(e.to_string())
    }
}
