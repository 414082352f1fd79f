//! Personal data handling core.
//!
//! Glue between the redaction and credential crates and the outside world:
//! - Redacting log formatter for `tracing`
//! - Database settings and user row logging
//! - Exit codes for the `pd-core` CLI

pub mod db;
pub mod exit_codes;
pub mod logging;

pub use pd_credential as credential;
pub use pd_redact as redact;
