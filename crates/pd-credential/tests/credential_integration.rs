//! Integration tests for pd-credential.
//!
//! These tests verify:
//! - A hash always verifies against the secret it was made from
//! - Different secrets do not verify
//! - Each hash carries its own salt
//! - Malformed hashes are reported as errors, not mismatches

use pd_credential::{
    is_valid, CredentialError, CredentialHash, CredentialHasher, HashVersion, MIN_COST,
};
use proptest::prelude::*;

fn fast_hasher() -> CredentialHasher {
    CredentialHasher::with_cost(MIN_COST).expect("minimum cost is valid")
}

#[test]
fn test_stored_hash_round_trips_through_storage() {
    let hasher = fast_hasher();
    let stored = hasher.hash("MyAmazingPassw0rd").unwrap();

    // Persisted as a plain string, read back later.
    let persisted = stored.to_string();
    let loaded: CredentialHash = persisted.parse().unwrap();

    assert_eq!(loaded, stored);
    assert!(loaded.verify("MyAmazingPassw0rd").unwrap());
}

#[test]
fn test_is_valid_accepts_low_cost_hash() {
    let stored = fast_hasher().hash("hunter2").unwrap();
    assert!(is_valid(stored.as_str(), "hunter2").unwrap());
    assert!(!is_valid(stored.as_str(), "hunter3").unwrap());
}

#[test]
fn test_is_valid_rejects_empty_hash() {
    let err = is_valid("", "hunter2").unwrap_err();
    assert!(matches!(err, CredentialError::InvalidHashFormat(_)));
}

#[test]
fn test_verifies_hashes_from_other_implementations() {
    // "$2y$" is written by PHP, "$2a$" by older libraries.
    let reference = "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";
    let hash = CredentialHash::parse(reference).unwrap();
    assert_eq!(hash.version(), HashVersion::TwoA);
    assert!(fast_hasher().verify(reference, "U*U").unwrap());
}

#[test]
fn test_unicode_secret() {
    let hasher = fast_hasher();
    let stored = hasher.hash("pässwörd-密码").unwrap();
    assert!(stored.verify("pässwörd-密码").unwrap());
    assert!(!stored.verify("passwort-密码").unwrap());
}

#[test]
fn test_concurrent_hashing() {
    let hasher = fast_hasher();

    let handles: Vec<_> = (0..4)
        .map(|i| std::thread::spawn(move || (i, hasher.hash(&format!("secret-{}", i)).unwrap())))
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, hash) in &results {
        assert!(hash.verify(&format!("secret-{}", i)).unwrap());
    }

    let mut salts: Vec<_> = results.iter().map(|(_, h)| h.salt().to_string()).collect();
    salts.sort();
    salts.dedup();
    assert_eq!(salts.len(), results.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_hash_verifies_own_secret(secret in ".{0,40}") {
        let stored = fast_hasher().hash(&secret).unwrap();
        prop_assert!(stored.verify(&secret).unwrap());
    }

    #[test]
    fn prop_different_secret_rejected(a in "[a-z0-9]{1,20}", b in "[a-z0-9]{1,20}") {
        prop_assume!(a != b);
        let stored = fast_hasher().hash(&a).unwrap();
        prop_assert!(!stored.verify(&b).unwrap());
    }

    #[test]
    fn prop_hashing_twice_differs(secret in "[ -~]{0,30}") {
        let hasher = fast_hasher();
        let first = hasher.hash(&secret).unwrap();
        let second = hasher.hash(&secret).unwrap();
        prop_assert_ne!(first, second);
    }

    #[test]
    fn prop_parse_never_panics(input in ".{0,80}") {
        let _ = CredentialHash::parse(&input);
    }
}
