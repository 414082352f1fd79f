//! Fuzz target for JSON redaction policies.
//!
//! Any policy that validates must compile into a working redactor.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_redact::{FieldRedactor, RedactionPolicy};

fuzz_target!(|data: &[u8]| {
    let Ok(policy) = serde_json::from_slice::<RedactionPolicy>(data) else {
        return;
    };
    if let Ok(redactor) = FieldRedactor::new(policy) {
        let _ = redactor.redact("name=a;email=b;password=c;");
    }
});
