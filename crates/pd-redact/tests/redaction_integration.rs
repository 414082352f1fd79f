//! Integration tests for pd-redact.
//!
//! These tests verify:
//! - Canary PII values never leak through the default redactor
//! - Non-sensitive fields and separators survive untouched
//! - Redaction is idempotent
//! - Field order and truncation at embedded separators are stable

use pd_redact::{filter_datum, FieldRedactor, RedactionPolicy, PII_FIELDS};
use proptest::prelude::*;

/// Canary values that must NEVER appear in redacted output.
const CANARY_PII: &[(&str, &str)] = &[
    ("name", "Marlene Wood"),
    ("email", "hwestiii@att.net"),
    ("phone", "(473) 401-4253"),
    ("ssn", "261-72-6780"),
    ("password", "K5?BMNv"),
];

fn default_redactor() -> FieldRedactor {
    FieldRedactor::new(RedactionPolicy::default()).expect("default policy is valid")
}

fn user_row_line() -> String {
    let mut line = String::new();
    for (field, value) in CANARY_PII {
        line.push_str(&format!("{}={};", field, value));
    }
    line.push_str("ip=60ed:c396:2ff:244:bbd0:9208:26f2:93ea;");
    line.push_str("last_login=2019-11-14 06:14:24;");
    line.push_str("user_agent=Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36;");
    line
}

// ============================================================================
// Canary Leak Tests
// ============================================================================

#[test]
fn test_canary_pii_never_leaks() {
    let redactor = default_redactor();
    let output = redactor.redact(&user_row_line());

    for (field, value) in CANARY_PII {
        assert!(
            !output.contains(value),
            "Canary '{}' leaked in output: {}",
            value,
            output
        );
        assert!(output.contains(&format!("{}=***;", field)));
    }
}

#[test]
fn test_non_sensitive_fields_survive() {
    let redactor = default_redactor();
    let output = redactor.redact(&user_row_line());

    assert!(output.contains("ip=60ed:c396:2ff:244:bbd0:9208:26f2:93ea;"));
    assert!(output.contains("last_login=2019-11-14 06:14:24;"));
}

#[test]
fn test_embedded_separator_truncates_value() {
    let redactor = default_redactor();
    let output = redactor.redact(&user_row_line());

    // user_agent is not sensitive; its embedded separator is left as-is.
    assert!(output.ends_with("user_agent=Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36;"));

    // A sensitive value with an embedded separator keeps its tail.
    let output = redactor.redact("password=abc;tail;");
    assert_eq!(output, "password=***;tail;");
}

#[test]
fn test_report_lists_all_default_fields() {
    let redactor = default_redactor();
    let report = redactor.redact_report(&user_row_line());

    assert_eq!(report.fields_redacted, PII_FIELDS.to_vec());
    assert_eq!(report.replacements, PII_FIELDS.len());
}

#[test]
fn test_filter_datum_matches_redactor() {
    let line = user_row_line();
    let one_shot = filter_datum(&PII_FIELDS, "***", &line, ";").unwrap();
    assert_eq!(one_shot, default_redactor().redact(&line));
}

#[test]
fn test_filter_datum_rejects_invalid_separator() {
    assert!(filter_datum(&["name"], "***", "name=x;", "").is_err());
}

#[test]
fn test_custom_separator_and_marker() {
    let policy = RedactionPolicy::with_fields(["token", "secret"])
        .with_marker("[REDACTED]")
        .with_separator("|");
    let redactor = FieldRedactor::new(policy).unwrap();

    let output = redactor.redact("token=abc|secret=def|name=bob|");
    assert_eq!(output, "token=[REDACTED]|secret=[REDACTED]|name=bob|");
}

#[test]
fn test_redactor_is_shareable_across_threads() {
    let redactor = std::sync::Arc::new(default_redactor());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let redactor = redactor.clone();
            std::thread::spawn(move || redactor.redact(&format!("ssn={};id={};", i, i)))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("ssn=***;id={};", i));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

const KEYS: &[&str] = &[
    "name", "email", "phone", "ssn", "password", "user", "status", "username", "ip",
];

fn assignment_line() -> impl Strategy<Value = (Vec<(String, String)>, String)> {
    prop::collection::vec(
        (prop::sample::select(KEYS), "[a-z0-9 @.=-]{0,8}"),
        0..6,
    )
    .prop_map(|pairs| {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let line = pairs
            .iter()
            .map(|(k, v)| format!("{}={};", k, v))
            .collect::<String>();
        (pairs, line)
    })
}

proptest! {
    #[test]
    fn prop_redact_is_idempotent(line in ".{0,64}") {
        let redactor = default_redactor();
        let once = redactor.redact(&line);
        prop_assert_eq!(redactor.redact(&once), once);
    }

    #[test]
    fn prop_assignment_lines_idempotent((_pairs, line) in assignment_line()) {
        let redactor = default_redactor();
        let once = redactor.redact(&line);
        prop_assert_eq!(redactor.redact(&once), once);
    }

    #[test]
    fn prop_sensitive_keys_get_marker((pairs, line) in assignment_line()) {
        let redactor = default_redactor();
        let output = redactor.redact(&line);
        for (key, _) in pairs.iter().filter(|(k, _)| PII_FIELDS.contains(&k.as_str())) {
            let expected = format!("{}=***;", key);
            prop_assert!(output.contains(&expected), "missing {} in {}", expected, output);
        }
    }

    #[test]
    fn prop_lines_without_assignments_unchanged(line in "[a-z0-9 ;]{0,64}") {
        let redactor = default_redactor();
        prop_assert_eq!(redactor.redact(&line), line);
    }
}
