/// Key material for token signing and verification
///
/// This module provides a type-safe abstraction over the two key families:
/// - Symmetric secrets (for HMAC algorithms)
/// - RSA key pairs (for RSA algorithms), where either half may be absent
///
/// Keys are parsed and validated when they are constructed, so a bad key
/// fails configuration instead of the first request. `Debug` output never
/// contains key bytes.
use crate::error::{Error, Result};
use crate::utils::der::{self, KeyEncoding};

use ring::signature::RsaKeyPair;
use std::sync::Arc;

/// Key material bound to a [`SigningConfig`](crate::SigningConfig)
#[derive(Debug, Clone)]
pub enum Key {
    /// Shared secret for HMAC algorithms
    Symmetric(SymmetricKey),

    /// RSA key pair for RSA algorithms
    Rsa(RsaKeys),
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "Symmetric",
            Key::Rsa(_) => "RSA",
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(Error::KeyMissing(format!(
                "HMAC requires a symmetric secret, configured key is {}",
                self.key_type()
            ))),
        }
    }

    /// Get the RSA private key or return error
    ///
    /// Fails for verify-only configurations.
    pub fn as_rsa_private(&self) -> Result<&RsaPrivateKey> {
        match self {
            Key::Rsa(RsaKeys {
                private: Some(key), ..
            }) => Ok(key),
            Key::Rsa(_) => Err(Error::KeyMissing(
                "RSA private key is required for signing".to_string(),
            )),
            _ => Err(Error::KeyMissing(format!(
                "RSA requires a key pair, configured key is {}",
                self.key_type()
            ))),
        }
    }

    /// Get the RSA public key or return error
    pub fn as_rsa_public(&self) -> Result<&RsaPublicKey> {
        match self {
            Key::Rsa(keys) => Ok(&keys.public),
            _ => Err(Error::KeyMissing(format!(
                "RSA requires a key pair, configured key is {}",
                self.key_type()
            ))),
        }
    }
}

/// Symmetric key for HMAC algorithms
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }

    /// Length of the secret in bytes
    pub fn len(&self) -> usize {
        self.secret.len()
    }

    /// True if the secret has no bytes
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for SymmetricKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<String> for SymmetricKey {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// RSA private key, parsed into a `ring` key pair
#[derive(Clone)]
pub struct RsaPrivateKey {
    pair: Arc<RsaKeyPair>,
}

impl RsaPrivateKey {
    /// Parse a private key from PEM (`PRIVATE KEY` / `RSA PRIVATE KEY`) or DER
    pub fn from_pem_or_der(input: &[u8]) -> Result<Self> {
        let (encoding, der) = der::decode_key_material(input)?;

        let pair = match encoding {
            KeyEncoding::Pkcs8 => RsaKeyPair::from_pkcs8(&der),
            KeyEncoding::Pkcs1 => RsaKeyPair::from_der(&der),
            KeyEncoding::Der => {
                RsaKeyPair::from_pkcs8(&der).or_else(|_| RsaKeyPair::from_der(&der))
            }
            KeyEncoding::Spki => {
                return Err(Error::InvalidKey(
                    "expected a private key, found a public key".to_string(),
                ))
            }
        }
        .map_err(|e| Error::InvalidKey(format!("RSA private key rejected: {e}")))?;

        Ok(Self {
            pair: Arc::new(pair),
        })
    }

    /// Public half of this key pair
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            der: self.pair.public().as_ref().to_vec(),
        }
    }

    /// Modulus length in bytes (signature length)
    pub fn modulus_len(&self) -> usize {
        self.pair.public().modulus_len()
    }

    pub(crate) fn key_pair(&self) -> &RsaKeyPair {
        &self.pair
    }
}

impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("modulus_bits", &(self.modulus_len() * 8))
            .finish_non_exhaustive()
    }
}

/// RSA public key (DER-encoded PKCS#1 `RSAPublicKey`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    der: Vec<u8>,
}

impl RsaPublicKey {
    /// Parse a public key from PEM (`PUBLIC KEY` / `RSA PUBLIC KEY`) or DER
    ///
    /// SubjectPublicKeyInfo input is unwrapped to PKCS#1.
    pub fn from_pem_or_der(input: &[u8]) -> Result<Self> {
        let der = der::rsa_public_key_der(input)?;
        der::rsa_modulus_bits(&der)?;
        Ok(Self { der })
    }

    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// RSA key pair where the private half is optional
///
/// Verify-only services hold just the public key. When only a private key is
/// supplied the public key is derived from it.
#[derive(Debug, Clone)]
pub struct RsaKeys {
    private: Option<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl RsaKeys {
    /// Build from optional halves; at least one must be present
    ///
    /// When both are given they must belong to the same key pair.
    pub fn new(private: Option<RsaPrivateKey>, public: Option<RsaPublicKey>) -> Result<Self> {
        let public = match (&private, public) {
            (Some(private), Some(public)) => {
                if private.public_key() != public {
                    return Err(Error::InvalidKey(
                        "public key does not match private key".to_string(),
                    ));
                }
                public
            }
            (None, Some(public)) => public,
            (Some(private), None) => private.public_key(),
            (None, None) => {
                return Err(Error::KeyMissing(
                    "RSA algorithms need a private key, a public key, or both".to_string(),
                ))
            }
        };

        Ok(Self { private, public })
    }

    /// Signing and verification keys from a private key
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = private.public_key();
        Self {
            private: Some(private),
            public,
        }
    }

    /// Verification-only keys
    pub fn verify_only(public: RsaPublicKey) -> Self {
        Self {
            private: None,
            public,
        }
    }

    /// True if tokens can be signed with these keys
    pub fn can_sign(&self) -> bool {
        self.private.is_some()
    }

    /// Private half, if present
    pub fn private(&self) -> Option<&RsaPrivateKey> {
        self.private.as_ref()
    }

    /// Public half
    pub fn public(&self) -> &RsaPublicKey {
        &self.public
    }
}
