//! Line formatting and the redacting formatter.
//!
//! [`LineFormat`] turns an event into a single text line
//! `[TAG] logger LEVEL timestamp: message`. [`RedactingFormatter`] wraps any
//! event formatter and passes its finished output through a
//! [`FieldRedactor`] before it reaches the writer.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use chrono::{DateTime, Local, TimeZone};
use pd_redact::FieldRedactor;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Tag printed at the start of every line by default.
pub const DEFAULT_TAG: &str = "PERSONAL_DATA";

/// `2019-11-19 18:37:59,596`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Replace `\n` and `\r` with their escaped forms.
///
/// Redaction patterns stop at line breaks, so a value carrying one would
/// otherwise leave its first part in clear text.
pub fn escape_line_breaks(value: &str) -> Cow<'_, str> {
    if value.contains(|c: char| c == '\n' || c == '\r') {
        Cow::Owned(value.replace('\n', "\\n").replace('\r', "\\r"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Collects an event's message and renders other fields as `key=value;`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, "{}={};", field.name(), escape_line_breaks(value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let rendered = format!("{:?}", value);
            let _ = write!(self.fields, "{}={};", field.name(), escape_line_breaks(&rendered));
        }
    }
}

/// The underlying message formatter.
///
/// Timestamps are taken in local time, like the classic `asctime` column.
#[derive(Debug, Clone)]
pub struct LineFormat {
    tag: String,
    timestamps: bool,
}

impl LineFormat {
    /// Create a formatter with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            timestamps: true,
        }
    }

    /// Enable or disable the timestamp column.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Render one record.
    pub fn render<Tz>(
        &self,
        logger: &str,
        level: Level,
        timestamp: DateTime<Tz>,
        message: &str,
    ) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if self.timestamps {
            format!(
                "[{}] {} {} {}: {}",
                self.tag,
                logger,
                level,
                timestamp.format(TIMESTAMP_FORMAT),
                message
            )
        } else {
            format!("[{}] {} {}: {}", self.tag, logger, level, message)
        }
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let line = self.render(meta.target(), *meta.level(), Local::now(), &visitor.into_message());
        writeln!(writer, "{}", line)
    }
}

/// Redacts the output of an inner formatter.
///
/// The inner formatter writes into a buffer; the buffer is redacted and then
/// written out. Only the finished text is touched, so any `FormatEvent`
/// implementation can be wrapped.
#[derive(Debug, Clone)]
pub struct RedactingFormatter<F = LineFormat> {
    inner: F,
    redactor: FieldRedactor,
}

impl<F> RedactingFormatter<F> {
    /// Wrap `inner` with `redactor`.
    pub fn new(inner: F, redactor: FieldRedactor) -> Self {
        Self { inner, redactor }
    }

    /// The wrapped formatter.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// The redactor applied to every line.
    pub fn redactor(&self) -> &FieldRedactor {
        &self.redactor
    }
}

impl RedactingFormatter<LineFormat> {
    /// Format and redact one record without going through a subscriber.
    pub fn format_line<Tz>(
        &self,
        logger: &str,
        level: Level,
        timestamp: DateTime<Tz>,
        message: &str,
    ) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.redactor
            .redact(&self.inner.render(logger, level, timestamp, message))
    }
}

impl<S, N, F> FormatEvent<S, N> for RedactingFormatter<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut buf = String::new();
        self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
        writer.write_str(&self.redactor.redact(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use pd_redact::RedactionPolicy;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 11, 19, 18, 37, 59).unwrap()
            + chrono::Duration::milliseconds(596)
    }

    #[test]
    fn test_render_with_timestamp() {
        let line = LineFormat::new("HOLBERTON").render(
            "my_logger",
            Level::INFO,
            fixed_time(),
            "name=Bob;email=bob@dylan.com;",
        );
        assert_eq!(
            line,
            "[HOLBERTON] my_logger INFO 2019-11-19 18:37:59,596: name=Bob;email=bob@dylan.com;"
        );
    }

    #[test]
    fn test_render_without_timestamp() {
        let line = LineFormat::default()
            .with_timestamps(false)
            .render("user_data", Level::WARN, fixed_time(), "status=ok;");
        assert_eq!(line, "[PERSONAL_DATA] user_data WARN: status=ok;");
    }

    #[test]
    fn test_format_line_redacts() {
        let policy = RedactionPolicy::with_fields(["email", "ssn", "password"]);
        let formatter = RedactingFormatter::new(
            LineFormat::new("HOLBERTON"),
            FieldRedactor::new(policy).unwrap(),
        );
        let line = formatter.format_line(
            "my_logger",
            Level::INFO,
            fixed_time(),
            "name=Bob;email=bob@dylan.com;ssn=000-123-0000;password=bobbycool;",
        );
        assert_eq!(
            line,
            "[HOLBERTON] my_logger INFO 2019-11-19 18:37:59,596: name=Bob;email=***;ssn=***;password=***;"
        );
    }

    #[test]
    fn test_visitor_combines_message_and_fields() {
        let visitor = MessageVisitor {
            message: "login".to_string(),
            fields: "email=a@b.c;".to_string(),
        };
        assert_eq!(visitor.into_message(), "login email=a@b.c;");

        let visitor = MessageVisitor {
            message: String::new(),
            fields: "ssn=1;".to_string(),
        };
        assert_eq!(visitor.into_message(), "ssn=1;");
    }

    #[test]
    fn test_render_uses_wall_clock_of_timestamp() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let line = LineFormat::default().render(
            "l",
            Level::INFO,
            fixed_time().with_timezone(&offset),
            "m",
        );
        assert_eq!(line, "[PERSONAL_DATA] l INFO 2019-11-19 19:37:59,596: m");
    }

    #[test]
    fn test_escape_line_breaks() {
        assert_eq!(escape_line_breaks("plain"), "plain");
        assert!(matches!(escape_line_breaks("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_line_breaks("a\nb\r\nc"), "a\\nb\\r\\nc");
    }

    #[test]
    fn test_multiline_field_value_is_redacted() {
        let formatter = RedactingFormatter::new(LineFormat::default(), FieldRedactor::default());
        let message = format!("password={};ip=1.2.3.4;", escape_line_breaks("sec\nret"));
        let line = formatter.format_line("user_data", Level::INFO, fixed_time(), &message);
        assert!(!line.contains("sec"));
        assert!(line.ends_with("password=***;ip=1.2.3.4;"));
    }

    #[test]
    fn test_accessors() {
        let formatter = RedactingFormatter::new(LineFormat::default(), FieldRedactor::default());
        assert_eq!(formatter.redactor().policy(), &RedactionPolicy::default());
        assert_eq!(
            formatter.inner().render("l", Level::ERROR, fixed_time(), "m"),
            "[PERSONAL_DATA] l ERROR 2019-11-19 18:37:59,596: m"
        );
    }
}
