//! Credential hashing shared by registration, login and token issuance.
//!
//! The default algorithm is SHA-1 so digests written by existing deployments
//! keep verifying once their rows are migrated into Postgres. SHA-1 is not
//! collision resistant and the digest is neither salted nor slow; prefer
//! `Sha256` for new deployments and never switch algorithms over rows that
//! already hold digests.

use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

/// Hash function used to derive `Authentication` and `Token` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Hash `a` followed by `b` (no separator) and hex-encode the result.
    #[must_use]
    pub fn digest(self, a: &str, b: &str) -> String {
        match self {
            Self::Sha1 => {
                let mut hasher = Sha1::new();
                hasher.update(a.as_bytes());
                hasher.update(b.as_bytes());
                hex::encode(hasher.finalize())
            }
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(a.as_bytes());
                hasher.update(b.as_bytes());
                hex::encode(hasher.finalize())
            }
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => f.write_str("sha1"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            other => Err(format!("unsupported digest algorithm: {other}")),
        }
    }
}

/// Digest `a` + `b` with the default algorithm.
#[must_use]
pub fn digest(a: &str, b: &str) -> String {
    DigestAlgorithm::default().digest(a, b)
}

/// Compare two byte strings without returning early on the first difference.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
