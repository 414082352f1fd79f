//! Database read collaborator.
//!
//! Connection settings come from `PERSONAL_DATA_DB_*` environment variables;
//! rows come from any [`RowSource`]. There is no driver or pooling here.

pub mod config;
pub mod rows;

pub use config::DbConfig;
pub use rows::{log_rows, JsonlRowSource, Row, RowSource};

use thiserror::Error;

/// Errors from reading configuration or rows.
#[derive(Error, Debug)]
pub enum DbError {
    /// The required database name variable is unset or empty.
    #[error("missing database name: set {0}")]
    MissingDatabase(&'static str),

    /// I/O error while reading rows.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be decoded.
    #[error("invalid row on line {line}: {message}")]
    Row { line: usize, message: String },
}
