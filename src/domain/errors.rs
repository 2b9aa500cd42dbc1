//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.
//! User-facing messages stay generic: no input text, no internal detail.

use thiserror::Error;

/// Main Tamarack error type
///
/// This is the primary error type used throughout the engine. Variants map
/// to the error classes surfaced by the redaction service.
#[derive(Debug, Error)]
pub enum RedactionError {
    /// Invalid input: empty text or an empty entity-type configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration-related errors (pattern library, settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The NLP backend could not be initialized or is unavailable
    #[error("NLP engine unavailable: {0}")]
    NlpUnavailable(String),

    /// The request was cancelled by the caller before completion
    #[error("Request cancelled")]
    Cancelled,

    /// Unclassified failure inside the pipeline; no partial result is returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RedactionError {
    /// Stable machine-readable class name for logging and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "config_error",
            Self::NlpUnavailable(_) => "nlp_unavailable",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal_error",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RedactionError {
    fn from(err: std::io::Error) -> Self {
        RedactionError::Configuration(format!("I/O error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RedactionError {
    fn from(err: toml::de::Error) -> Self {
        RedactionError::Configuration(format!("TOML parse error: {err}"))
    }
}
