//! Signing configuration
//!
//! A [`SigningConfig`] binds one algorithm to one set of keys and carries the
//! refresh policy. It is built once at startup, validated eagerly, and then
//! shared read-only (usually behind an `Arc`) by every codec and validator.
//! There is no global secret: whatever needs to sign or verify is handed a
//! config explicitly.

mod settings;

pub use settings::SigningSettings;

use crate::algorithm::{AlgorithmFamily, AlgorithmId};
use crate::error::{Error, Result};
use crate::keys::{Key, RsaKeys, RsaPrivateKey, RsaPublicKey};
use std::path::Path;
use std::time::Duration;

/// Algorithm, key material and refresh policy for a token service
#[derive(Debug, Clone)]
pub struct SigningConfig {
    algorithm: AlgorithmId,
    key: Key,
    max_refresh_window: Duration,
    expected_issuer: Option<String>,
}

impl SigningConfig {
    /// Bind an algorithm to key material
    ///
    /// Fails with [`Error::KeyMissing`] when the key does not belong to the
    /// algorithm's family or an HMAC secret is empty.
    pub fn new(algorithm: AlgorithmId, key: Key) -> Result<Self> {
        match (algorithm.family(), &key) {
            (AlgorithmFamily::Hmac, Key::Symmetric(secret)) if secret.is_empty() => {
                return Err(Error::KeyMissing(format!(
                    "{algorithm} requires a non-empty secret"
                )));
            }
            (AlgorithmFamily::Hmac, Key::Symmetric(_)) | (AlgorithmFamily::Rsa, Key::Rsa(_)) => {}
            (_, other) => {
                return Err(Error::KeyMissing(format!(
                    "{algorithm} cannot use a {} key",
                    other.key_type()
                )));
            }
        }

        let can_sign = match &key {
            Key::Symmetric(_) => true,
            Key::Rsa(keys) => keys.can_sign(),
        };
        tracing::debug!(
            algorithm = %algorithm,
            key_type = key.key_type(),
            can_sign,
            "signing configuration created"
        );

        Ok(Self {
            algorithm,
            key,
            max_refresh_window: Duration::ZERO,
            expected_issuer: None,
        })
    }

    /// HMAC configuration from a shared secret
    pub fn hmac(algorithm: AlgorithmId, secret: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(algorithm, Key::symmetric(secret))
    }

    /// RSA configuration from a key pair (private half optional)
    pub fn rsa(algorithm: AlgorithmId, keys: RsaKeys) -> Result<Self> {
        Self::new(algorithm, Key::Rsa(keys))
    }

    /// Build a validated configuration from loaded settings
    ///
    /// Key files are read here, so unreadable or invalid keys abort startup.
    pub fn from_settings(settings: &SigningSettings) -> Result<Self> {
        let algorithm = AlgorithmId::from_str(&settings.algorithm)?;

        let key = match algorithm.family() {
            AlgorithmFamily::Hmac => {
                let secret = settings.secret.as_deref().ok_or_else(|| {
                    Error::KeyMissing(format!("{algorithm} requires 'secret' to be set"))
                })?;
                Key::symmetric(secret.as_bytes().to_vec())
            }
            AlgorithmFamily::Rsa => {
                let private = settings
                    .private_key_path
                    .as_deref()
                    .map(|path| read_key_file(path).and_then(|b| RsaPrivateKey::from_pem_or_der(&b)))
                    .transpose()?;
                let public = settings
                    .public_key_path
                    .as_deref()
                    .map(|path| read_key_file(path).and_then(|b| RsaPublicKey::from_pem_or_der(&b)))
                    .transpose()?;
                Key::Rsa(RsaKeys::new(private, public)?)
            }
        };

        let mut config = Self::new(algorithm, key)?
            .with_max_refresh_window(Duration::from_secs(settings.max_refresh_secs));
        if let Some(issuer) = &settings.expected_issuer {
            config = config.with_expected_issuer(issuer.clone());
        }

        tracing::info!(
            algorithm = %config.algorithm,
            max_refresh_secs = settings.max_refresh_secs,
            expected_issuer = config.expected_issuer.as_deref().unwrap_or(""),
            "signing configuration loaded"
        );

        Ok(config)
    }

    /// Set how long past `exp` an expired token may still be refreshed
    pub fn with_max_refresh_window(mut self, window: Duration) -> Self {
        self.max_refresh_window = window;
        self
    }

    /// Only accept tokens whose `iss` equals this value
    pub fn with_expected_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Configured algorithm
    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Configured key material
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Refresh window past expiry
    pub fn max_refresh_window(&self) -> Duration {
        self.max_refresh_window
    }

    /// Expected issuer, if enforced
    pub fn expected_issuer(&self) -> Option<&str> {
        self.expected_issuer.as_deref()
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::KeyFileUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
