//! Fuzz target for `filter_datum` with arbitrary fields and separators.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pd_redact::filter_datum;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    fields: Vec<&'a str>,
    redaction: &'a str,
    message: &'a str,
    separator: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    // Invalid policies return an error, never panic
    if let Ok(once) = filter_datum(&input.fields, input.redaction, input.message, input.separator) {
        let twice = filter_datum(&input.fields, input.redaction, &once, input.separator)
            .expect("policy already validated");
        assert_eq!(once, twice);
    }
});
