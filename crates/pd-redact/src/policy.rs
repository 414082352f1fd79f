//! Redaction policy configuration.
//!
//! Defines which fields are considered sensitive, the marker substituted for
//! their values, and the separator terminating each assignment.

use crate::error::{RedactionError, Result};
use serde::{Deserialize, Serialize};

/// Fields redacted by default, in application order.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Marker written in place of a sensitive value.
pub const DEFAULT_MARKER: &str = "***";

/// Separator terminating each `field=value` assignment.
pub const DEFAULT_SEPARATOR: &str = ";";

/// Redaction policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// Sensitive field names, applied in this order.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// Replacement for sensitive values.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Assignment separator.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_fields() -> Vec<String> {
    PII_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            marker: default_marker(),
            separator: default_separator(),
        }
    }
}

impl RedactionPolicy {
    /// Create a policy for the given fields with the default marker and separator.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the redaction marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Set the assignment separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Returns whether `field` is one of the sensitive fields.
    pub fn is_sensitive(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Check that the policy can be applied consistently.
    ///
    /// A marker containing `=` or the separator would let a second pass
    /// rewrite already redacted output.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(RedactionError::PolicyError(
                "separator must not be empty".to_string(),
            ));
        }
        if self.separator.contains('=') {
            return Err(RedactionError::PolicyError(format!(
                "separator '{}' must not contain '='",
                self.separator
            )));
        }

        for field in &self.fields {
            if field.is_empty() {
                return Err(RedactionError::PolicyError(
                    "field name must not be empty".to_string(),
                ));
            }
            if field.contains('=') || field.contains(self.separator.as_str()) {
                return Err(RedactionError::PolicyError(format!(
                    "field name '{}' must not contain '=' or the separator",
                    field
                )));
            }
        }

        // The separator must first appear right after the marker, or a
        // redacted value would be matched short and grow on the next pass.
        let terminated = format!("{}{}", self.marker, self.separator);
        if self.marker.contains('=')
            || terminated.find(self.separator.as_str()) != Some(self.marker.len())
        {
            return Err(RedactionError::PolicyError(format!(
                "marker '{}' must not contain '=' or overlap the separator",
                self.marker
            )));
        }

        Ok(())
    }
}
