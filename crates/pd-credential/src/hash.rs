//! Self-describing credential hash encoding.
//!
//! Hashes use the modular crypt format produced by bcrypt:
//! `$<version>$<cost>$<22 salt chars><31 digest chars>`, 60 characters in
//! total, all drawn from the bcrypt base64 alphabet `./A-Za-z0-9`.

use crate::error::{CredentialError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Length of an encoded bcrypt hash.
pub const ENCODED_LEN: usize = 60;

// 22 salt characters carry 132 bits for a 128-bit salt, so the last one
// must leave its low four bits clear.
static RE_BCRYPT_HASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$(2a|2b|2x|2y)\$(\d{2})\$([./A-Za-z0-9]{21}[.Oeu])([./A-Za-z0-9]{31})$")
        .expect("bcrypt hash regex")
});

/// bcrypt version tag embedded in a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashVersion {
    /// `$2a$`
    TwoA,
    /// `$2b$` (written by this crate)
    TwoB,
    /// `$2x$`
    TwoX,
    /// `$2y$`
    TwoY,
}

impl HashVersion {
    /// Parse a version tag without the surrounding `$`.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "2a" => Some(HashVersion::TwoA),
            "2b" => Some(HashVersion::TwoB),
            "2x" => Some(HashVersion::TwoX),
            "2y" => Some(HashVersion::TwoY),
            _ => None,
        }
    }

    /// The tag as it appears in the encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashVersion::TwoA => "2a",
            HashVersion::TwoB => "2b",
            HashVersion::TwoX => "2x",
            HashVersion::TwoY => "2y",
        }
    }
}

impl std::fmt::Display for HashVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored credential hash.
///
/// Opaque to callers beyond its accessors; it exists to be persisted and
/// later passed back for verification. Constructing one always validates
/// the structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialHash {
    encoded: String,
    version: HashVersion,
    cost: u32,
}

impl CredentialHash {
    /// Parse and validate an encoded hash.
    pub fn parse(encoded: &str) -> Result<Self> {
        if encoded.is_empty() {
            return Err(CredentialError::InvalidHashFormat("empty hash".to_string()));
        }
        if encoded.len() != ENCODED_LEN {
            return Err(CredentialError::InvalidHashFormat(format!(
                "expected {} characters, got {}",
                ENCODED_LEN,
                encoded.len()
            )));
        }

        let caps = RE_BCRYPT_HASH.captures(encoded).ok_or_else(|| {
            CredentialError::InvalidHashFormat("not a bcrypt hash".to_string())
        })?;

        let version = HashVersion::parse_str(&caps[1]).ok_or_else(|| {
            CredentialError::InvalidHashFormat(format!("unsupported version '{}'", &caps[1]))
        })?;

        let cost: u32 = caps[2]
            .parse()
            .map_err(|e| CredentialError::InvalidHashFormat(format!("invalid cost: {}", e)))?;
        if !(crate::MIN_COST..=crate::MAX_COST).contains(&cost) {
            return Err(CredentialError::InvalidHashFormat(format!(
                "cost {} out of range",
                cost
            )));
        }

        Ok(Self {
            encoded: encoded.to_string(),
            version,
            cost,
        })
    }

    /// The full encoded hash.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// The version tag.
    pub fn version(&self) -> HashVersion {
        self.version
    }

    /// The work factor the hash was produced with.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// The 22-character encoded salt.
    pub fn salt(&self) -> &str {
        &self.encoded[7..29]
    }

    /// Check `secret` against this hash.
    ///
    /// Returns `Ok(false)` on mismatch. The digest comparison is constant
    /// time.
    pub fn verify(&self, secret: &str) -> Result<bool> {
        bcrypt::verify(secret, &self.encoded)
            .map_err(|e| CredentialError::InvalidHashFormat(e.to_string()))
    }
}

impl std::fmt::Display for CredentialHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl std::str::FromStr for CredentialHash {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CredentialHash {
    type Error = CredentialError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CredentialHash> for String {
    fn from(hash: CredentialHash) -> Self {
        hash.encoded
    }
}

impl AsRef<str> for CredentialHash {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}
