//! Fuzz target for line redaction with the default policy.
//!
//! Redaction must never panic and must be idempotent.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_redact::FieldRedactor;

fuzz_target!(|data: &str| {
    let redactor = FieldRedactor::default();
    let once = redactor.redact(data);
    let twice = redactor.redact(&once);
    assert_eq!(once, twice);
});
