//! Redacting log output for pd-core.
//!
//! Every line written to stderr goes through [`RedactingFormatter`], so the
//! values of sensitive `field=value;` assignments never reach the terminal
//! or a log collector.
//!
//! # Usage
//!
//! ```ignore
//! use pd_core::logging::{init_logging, LogConfig, USER_DATA_TARGET};
//! use pd_redact::{FieldRedactor, RedactionPolicy};
//!
//! let config = LogConfig::from_env(None);
//! let redactor = FieldRedactor::new(RedactionPolicy::default())?;
//! init_logging(&config, redactor)?;
//!
//! tracing::info!(target: USER_DATA_TARGET, "name=Bob;email=bob@dylan.com;");
//! // [PERSONAL_DATA] user_data INFO 2019-11-19 18:37:59,596: name=***;email=***;
//! ```
//!
//! # Design Notes
//!
//! - stdout is reserved for command payloads
//! - stderr receives all log output
//! - ANSI colors are disabled so escape codes never split a field from its value

pub mod config;
pub mod format;

pub use config::{LogConfig, LogLevel};
pub use format::{
    escape_line_breaks, LineFormat, RedactingFormatter, DEFAULT_TAG, TIMESTAMP_FORMAT,
};

use pd_redact::FieldRedactor;
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, format::DefaultFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logger name used for user rows.
pub const USER_DATA_TARGET: &str = "user_data";

/// Errors from logging setup.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// Build the redacting fmt layer for `writer`.
pub fn redacting_layer<S, W>(
    config: &LogConfig,
    redactor: FieldRedactor,
    writer: W,
) -> fmt::Layer<S, DefaultFields, RedactingFormatter<LineFormat>, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    let line_format = LineFormat::new(config.tag.clone()).with_timestamps(config.timestamps);

    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .event_format(RedactingFormatter::new(line_format, redactor))
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig, redactor: FieldRedactor) -> Result<(), LoggingError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(config.level).into())
        .parse_lossy("");

    tracing_subscriber::registry()
        .with(filter)
        .with(redacting_layer(config, redactor, std::io::stderr))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
