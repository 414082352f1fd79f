//! Salted bcrypt hashing of plaintext secrets.
//!
//! Every call to [`CredentialHasher::hash`] draws a fresh 16-byte salt from
//! the operating system's CSPRNG, so hashing the same secret twice yields
//! two different encodings that both verify.

use crate::error::{CredentialError, Result};
use crate::hash::CredentialHash;

/// Default work factor (2^12 bcrypt rounds).
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

const SALT_LEN: usize = 16;

/// Hashes and verifies credentials with a fixed work factor.
///
/// Holds no mutable state and can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    /// Create a hasher with the default work factor.
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a hasher with an explicit work factor.
    pub fn with_cost(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(CredentialError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    /// The configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `secret` with a fresh random salt.
    ///
    /// bcrypt only consumes the first 72 bytes of the secret.
    pub fn hash(&self, secret: &str) -> Result<CredentialHash> {
        let salt = generate_salt()?;
        let parts = bcrypt::hash_with_salt(secret, self.cost, salt)
            .map_err(|e| CredentialError::Encoding(format!("bcrypt failed: {}", e)))?;
        let encoded = parts.format_for_version(bcrypt::Version::TwoB);

        tracing::debug!(cost = self.cost, "hashed credential");

        CredentialHash::parse(&encoded)
            .map_err(|e| CredentialError::Encoding(format!("unexpected encoding: {}", e)))
    }

    /// Verify `secret` against an encoded hash.
    ///
    /// The salt and work factor come from `hash`, not from this hasher.
    /// Malformed input is an error; a well-formed mismatch is `Ok(false)`.
    pub fn verify(&self, hash: &str, secret: &str) -> Result<bool> {
        let parsed = CredentialHash::parse(hash)?;
        let matched = parsed.verify(secret)?;
        if !matched {
            tracing::debug!(cost = parsed.cost(), "credential mismatch");
        }
        Ok(matched)
    }

    /// Returns whether `hash` was produced with a lower work factor than
    /// this hasher uses.
    pub fn needs_rehash(&self, hash: &CredentialHash) -> bool {
        hash.cost() < self.cost
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash `secret` with the default work factor.
pub fn hash_password(secret: &str) -> Result<CredentialHash> {
    CredentialHasher::new().hash(secret)
}

/// Check `secret` against an encoded hash.
pub fn is_valid(hash: &str, secret: &str) -> Result<bool> {
    CredentialHasher::new().verify(hash, secret)
}

fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt).map_err(|e| {
        CredentialError::Encoding(format!("failed to generate random salt: {}", e))
    })?;
    Ok(salt)
}
