//! Main redaction engine.
//!
//! The FieldRedactor applies the redaction policy to log lines. Each field
//! gets its own pattern `field=<shortest value>separator`; patterns run in
//! policy order and every occurrence is replaced.

use crate::{RedactionError, RedactionPolicy, Result};
use regex::{NoExpand, Regex};
use std::borrow::Cow;

/// Result of redacting a line, with bookkeeping about what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedLine {
    /// The redacted output line.
    pub output: String,

    /// Fields that had at least one value replaced, in policy order.
    pub fields_redacted: Vec<String>,

    /// Total number of values replaced.
    pub replacements: usize,
}

impl RedactedLine {
    /// Returns whether any value was replaced.
    pub fn was_modified(&self) -> bool {
        self.replacements > 0
    }
}

/// Compiled pattern for one sensitive field.
#[derive(Debug, Clone)]
struct FieldPattern {
    field: String,
    regex: Regex,
    replacement: String,
}

impl FieldPattern {
    fn compile(field: &str, policy: &RedactionPolicy) -> Result<Self> {
        // `.` stops at newlines, so a value never spans two lines.
        let pattern = format!(
            "{}=.*?{}",
            regex::escape(field),
            regex::escape(&policy.separator)
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| RedactionError::PatternError(format!("field '{}': {}", field, e)))?;

        Ok(Self {
            field: field.to_string(),
            regex,
            replacement: format!("{}={}{}", field, policy.marker, policy.separator),
        })
    }
}

/// The field redaction engine.
///
/// Immutable once built and cheap to share across threads.
#[derive(Debug, Clone)]
pub struct FieldRedactor {
    /// The redaction policy.
    policy: RedactionPolicy,

    /// One compiled pattern per field, in policy order.
    patterns: Vec<FieldPattern>,
}

impl FieldRedactor {
    /// Create a redactor for the given policy.
    pub fn new(policy: RedactionPolicy) -> Result<Self> {
        policy.validate()?;

        let patterns = policy
            .fields
            .iter()
            .map(|field| FieldPattern::compile(field, &policy))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { policy, patterns })
    }

    /// Get a reference to the policy.
    pub fn policy(&self) -> &RedactionPolicy {
        &self.policy
    }

    /// Replace the value of every sensitive field in `line` with the marker.
    ///
    /// Values containing the separator are cut at the first separator; the
    /// remainder stays in the output.
    pub fn redact(&self, line: &str) -> String {
        let mut current = line.to_string();
        for pattern in &self.patterns {
            let replaced = pattern
                .regex
                .replace_all(&current, NoExpand(&pattern.replacement));
            // Borrowed means no match for this field.
            if let Cow::Owned(replaced) = replaced {
                current = replaced;
            }
        }
        current
    }

    /// Redact `line` and report which fields were touched.
    pub fn redact_report(&self, line: &str) -> RedactedLine {
        let mut output = line.to_string();
        let mut fields_redacted = Vec::new();
        let mut replacements = 0;

        for pattern in &self.patterns {
            let count = pattern.regex.find_iter(&output).count();
            if count == 0 {
                continue;
            }
            output = pattern
                .regex
                .replace_all(&output, NoExpand(&pattern.replacement))
                .into_owned();
            replacements += count;
            fields_redacted.push(pattern.field.clone());
        }

        RedactedLine {
            output,
            fields_redacted,
            replacements,
        }
    }
}

impl Default for FieldRedactor {
    fn default() -> Self {
        // Fixed field names, escaped before compiling; always valid.
        Self::new(RedactionPolicy::default()).expect("default redaction policy is valid")
    }
}

/// Redact `message` in one call, without keeping a redactor around.
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: &str,
) -> Result<String> {
    let policy = RedactionPolicy::with_fields(fields.iter().map(|f| f.as_ref()))
        .with_marker(redaction)
        .with_separator(separator);
    Ok(FieldRedactor::new(policy)?.redact(message))
}
