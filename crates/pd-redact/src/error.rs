//! Error types for the field redactor.

use thiserror::Error;

/// Result type for redaction setup.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors raised while building a redactor.
///
/// Redacting a line is infallible; only constructing a redactor from an
/// invalid policy can fail.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// The redaction policy is inconsistent.
    #[error("policy error: {0}")]
    PolicyError(String),

    /// Failed to compile a field pattern.
    #[error("pattern error: {0}")]
    PatternError(String),
}
