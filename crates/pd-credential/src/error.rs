//! Error types for credential hashing.

use thiserror::Error;

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Errors that can occur while hashing or verifying credentials.
///
/// A candidate that simply does not match is not an error; verification
/// returns `Ok(false)` for it.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The stored hash could not be parsed.
    #[error("invalid hash format: {0}")]
    InvalidHashFormat(String),

    /// Hashing failed (entropy source unavailable or hasher failure).
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The requested work factor is outside the supported range.
    #[error("invalid cost {0}: must be between 4 and 31")]
    InvalidCost(u32),
}
