//! Field redaction for personal data in log lines.
//!
//! Log lines are plain text made of `field=value` assignments terminated by
//! a separator (`;` by default). The redactor rewrites the value of every
//! sensitive field to a fixed marker and leaves everything else untouched.
//!
//! # Key Features
//!
//! - **Textual matching**: each field is matched as `field=<shortest value>;`
//!   with no structured parsing of the line.
//! - **Fixed field order**: fields are applied one after another in policy order.
//! - **Total**: redaction never fails; lines without sensitive fields pass
//!   through unchanged.
//!
//! # Example
//!
//! ```
//! use pd_redact::{FieldRedactor, RedactionPolicy};
//!
//! let redactor = FieldRedactor::new(RedactionPolicy::default()).unwrap();
//! let line = redactor.redact("name=John Smith;email=john@x.com;status=ok;");
//! assert_eq!(line, "name=***;email=***;status=ok;");
//! ```

pub mod engine;
pub mod error;
pub mod policy;

pub use engine::{filter_datum, FieldRedactor, RedactedLine};
pub use error::{RedactionError, Result};
pub use policy::{RedactionPolicy, DEFAULT_MARKER, DEFAULT_SEPARATOR, PII_FIELDS};
