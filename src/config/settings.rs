use crate::error::{Error, Result};
use crate::limits::{DEFAULT_NOT_BEFORE_LEEWAY_SECONDS, DEFAULT_TOKEN_LIFETIME_SECONDS};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `SESSION_JWT_ALGORITHM`
pub const ENV_PREFIX: &str = "SESSION_JWT";

/// Default configuration file (any format the `config` crate understands)
pub const DEFAULT_CONFIG_FILE: &str = "config/session";

/// Raw token service settings as read from files and the environment
///
/// Turn these into a validated [`SigningConfig`](crate::SigningConfig) with
/// [`SigningConfig::from_settings`](crate::SigningConfig::from_settings).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SigningSettings {
    /// Algorithm name: HS256, HS384, HS512, RS256, RS384 or RS512
    pub algorithm: String,

    /// Shared secret for HMAC algorithms
    pub secret: Option<String>,

    /// PEM or DER private key file for RSA algorithms
    pub private_key_path: Option<PathBuf>,

    /// PEM or DER public key file for RSA algorithms
    pub public_key_path: Option<PathBuf>,

    /// Seconds past `exp` during which a token may still be refreshed
    pub max_refresh_secs: u64,

    /// Lifetime of issued tokens in seconds
    pub token_lifetime_secs: u64,

    /// How far `nbf` is backdated relative to `iat` on issued tokens
    pub not_before_leeway_secs: u64,

    /// `iss` written into issued tokens
    pub issuer: String,

    /// Reject tokens whose `iss` differs from this value
    pub expected_issuer: Option<String>,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            algorithm: "HS256".to_string(),
            secret: None,
            private_key_path: None,
            public_key_path: None,
            max_refresh_secs: 0,
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECONDS,
            not_before_leeway_secs: DEFAULT_NOT_BEFORE_LEEWAY_SECONDS,
            issuer: String::new(),
            expected_issuer: None,
        }
    }
}

impl std::fmt::Debug for SigningSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSettings")
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .field("max_refresh_secs", &self.max_refresh_secs)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("not_before_leeway_secs", &self.not_before_leeway_secs)
            .field("issuer", &self.issuer)
            .field("expected_issuer", &self.expected_issuer)
            .finish()
    }
}

impl SigningSettings {
    /// Load settings from `config/session.*` and `SESSION_JWT_*` variables
    ///
    /// A `.env` file in the working directory is applied first, if present.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from the given file (optional) and the environment
    ///
    /// Environment variables take precedence over the file.
    pub fn load_from(path: &str) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            tracing::debug!(path = %env_file.display(), "loaded environment file");
        }

        let settings: Self = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::ConfigurationInvalid(e.to_string()))?;

        tracing::debug!(settings = ?settings, "session settings loaded");
        Ok(settings)
    }
}
