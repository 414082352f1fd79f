//! Fuzz target for credential hash parsing.
//!
//! Parsing must never panic; accepted hashes must round-trip through text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_credential::CredentialHash;

fuzz_target!(|data: &str| {
    if let Ok(hash) = CredentialHash::parse(data) {
        assert_eq!(hash.as_str(), data);
        assert_eq!(hash.salt().len(), 22);
        // Keep verification cheap
        if hash.cost() <= 5 {
            let _ = hash.verify("fuzz");
        }
    }
});
