//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store error
    #[error(transparent)]
    Store(#[from] crmsync_store::StoreError),

    /// Extractor setup error
    #[error(transparent)]
    Extractor(#[from] crmsync_extractor::ExtractorError),

    /// The extraction pass failed
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<crmsync_gatekeeper::GatekeeperError> for CliError {
    fn from(e: crmsync_gatekeeper::GatekeeperError) -> Self {
        match e {
            crmsync_gatekeeper::GatekeeperError::Config(msg) => CliError::Config(msg),
        }
    }
}
