mod traits;

pub mod hmac;
pub mod rsa;

pub use traits::{signer_for, Algorithm, TokenSigner};

use crate::error::{Error, Result};
use crate::limits::MAX_ALG_LENGTH;

/// Signing algorithm identifier
///
/// The set is closed: a [`SigningConfig`](crate::SigningConfig) binds exactly
/// one of these, and tokens declaring anything else are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmId {
    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,

    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,

    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,
}

/// Key family an algorithm signs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// Shared secret (HS*)
    Hmac,
    /// RSA key pair (RS*)
    Rsa,
}

impl AlgorithmId {
    /// Parse an algorithm name as used in configuration and token headers
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::AlgorithmUnsupported(format!(
                "Algorithm string too long: {} bytes (maximum: {} bytes)",
                s.len(),
                MAX_ALG_LENGTH
            )));
        }

        match s {
            "none" => Err(Error::AlgorithmNoneRejected),

            "HS256" => Ok(AlgorithmId::HS256),
            "HS384" => Ok(AlgorithmId::HS384),
            "HS512" => Ok(AlgorithmId::HS512),

            "RS256" => Ok(AlgorithmId::RS256),
            "RS384" => Ok(AlgorithmId::RS384),
            "RS512" => Ok(AlgorithmId::RS512),

            _ => Err(Error::AlgorithmUnsupported(s.to_string())),
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
        }
    }

    /// Key family for this algorithm
    pub const fn family(&self) -> AlgorithmFamily {
        match self {
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512 => AlgorithmFamily::Hmac,
            AlgorithmId::RS256 | AlgorithmId::RS384 | AlgorithmId::RS512 => AlgorithmFamily::Rsa,
        }
    }

    /// Check if algorithm is HMAC-based (symmetric)
    pub fn is_symmetric(&self) -> bool {
        self.family() == AlgorithmFamily::Hmac
    }

    /// Check if algorithm is RSA-based (asymmetric)
    pub fn is_asymmetric(&self) -> bool {
        !self.is_symmetric()
    }

    /// Check a token's declared algorithm against this (configured) one
    ///
    /// This is a plain string comparison. The declared value is never parsed
    /// into an algorithm and never used to select a key.
    pub fn expect_declared(&self, declared: &str) -> Result<()> {
        if declared == self.as_str() {
            Ok(())
        } else {
            Err(Error::AlgorithmMismatch {
                expected: self.as_str().to_string(),
                found: declared.chars().take(MAX_ALG_LENGTH).collect(),
            })
        }
    }
}

impl std::str::FromStr for AlgorithmId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AlgorithmId::from_str(s)
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for AlgorithmId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
