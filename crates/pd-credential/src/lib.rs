//! Credential hashing for personal data stores.
//!
//! Produces salted bcrypt hashes of plaintext secrets and verifies
//! candidates against them. The stored hash is self-describing: it carries
//! the algorithm version, the cost factor and the salt, so verification
//! needs nothing but the hash and the candidate.
//!
//! # Example
//!
//! ```no_run
//! use pd_credential::CredentialHasher;
//!
//! let hasher = CredentialHasher::new();
//! let stored = hasher.hash("correct horse").unwrap();
//! assert!(stored.verify("correct horse").unwrap());
//! assert!(!stored.verify("battery staple").unwrap());
//! ```

pub mod error;
pub mod hash;
pub mod hasher;

pub use error::{CredentialError, Result};
pub use hash::{CredentialHash, HashVersion};
pub use hasher::{hash_password, is_valid, CredentialHasher, DEFAULT_COST, MAX_COST, MIN_COST};
