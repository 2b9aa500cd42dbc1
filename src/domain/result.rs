//! Result type alias for Tamarack

use super::errors::RedactionError;

/// Result type alias for Tamarack operations
///
/// Convenience alias that uses `RedactionError` as the error type. Use this
/// throughout the codebase for fallible operations.
pub type Result<T> = std::result::Result<T, RedactionError>;
