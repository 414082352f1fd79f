//! User rows and the sources that supply them.

use std::convert::Infallible;
use std::io::BufRead;

use pd_redact::DEFAULT_SEPARATOR;

use super::DbError;
use crate::logging::{escape_line_breaks, USER_DATA_TARGET};

/// One record: column names and values, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Append a column, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(column, value);
        self
    }

    /// All columns in order.
    pub fn columns(&self) -> &[(String, String)] {
        &self.columns
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Render as `col=value;col=value;`.
    ///
    /// Line breaks are escaped so every assignment stays on one line where
    /// the redactor can see it; everything else is written verbatim.
    pub fn to_log_line(&self, separator: &str) -> String {
        self.columns
            .iter()
            .map(|(column, value)| {
                format!(
                    "{}={}{}",
                    escape_line_breaks(column),
                    escape_line_breaks(value),
                    separator
                )
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Anything that can supply user rows.
///
/// Errors are passed through to the caller untouched.
pub trait RowSource {
    type Error;

    /// Fetch all rows.
    fn fetch_rows(&mut self) -> Result<Vec<Row>, Self::Error>;
}

impl RowSource for Vec<Row> {
    type Error = Infallible;

    fn fetch_rows(&mut self) -> Result<Vec<Row>, Self::Error> {
        Ok(std::mem::take(self))
    }
}

/// Rows read from JSON lines, one object per line.
///
/// Column order follows key order in each object. Strings are taken
/// verbatim, `null` becomes an empty value, anything else is its JSON text.
pub struct JsonlRowSource<R> {
    reader: R,
}

impl<R: BufRead> JsonlRowSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> RowSource for JsonlRowSource<R> {
    type Error = DbError;

    fn fetch_rows(&mut self) -> Result<Vec<Row>, Self::Error> {
        let mut rows = Vec::new();
        for (index, line) in (&mut self.reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&line)
                .map_err(|e| DbError::Row {
                    line: index + 1,
                    message: e.to_string(),
                })?;

            rows.push(
                object
                    .into_iter()
                    .map(|(column, value)| {
                        let value = match value {
                            serde_json::Value::String(s) => s,
                            serde_json::Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        (column, value)
                    })
                    .collect(),
            );
        }
        Ok(rows)
    }
}

/// Fetch every row from `source` and log it on the `user_data` target.
///
/// Returns the number of rows logged. Sensitive values are removed by the
/// installed formatter, not here.
pub fn log_rows<S: RowSource>(source: &mut S) -> Result<usize, S::Error> {
    let rows = source.fetch_rows()?;
    for row in &rows {
        tracing::info!(target: USER_DATA_TARGET, "{}", row.to_log_line(DEFAULT_SEPARATOR));
    }
    tracing::debug!(count = rows.len(), "logged user rows");
    Ok(rows.len())
}
