//! Session validation and refresh
//!
//! [`SessionValidator`] turns an incoming token string and the current time
//! into a [`TokenState`]. It holds nothing but a [`TokenCodec`], so each call
//! is a pure function of the token, the clock value and the signing
//! configuration. Per-token failures are returned as states, never logged.
//!
//! ```text
//! token ──decode──▶ Malformed | AlgorithmMismatch | SignatureInvalid
//!   │
//!   ├─ iss ≠ expected ───────────────▶ IssuerRejected
//!   ├─ now < nbf ────────────────────▶ NotYetValid
//!   ├─ now < exp ────────────────────▶ Valid
//!   ├─ now <= exp + refresh window ──▶ ExpiredRefreshable ──refresh──▶ new token
//!   └─ otherwise ────────────────────▶ ExpiredTerminal
//! ```

use crate::claims::{current_timestamp, time_status, Claims, TimeStatus};
use crate::codec::TokenCodec;
use crate::config::SigningConfig;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of authenticating a token at a given instant
#[derive(Debug, Clone, PartialEq)]
pub enum TokenState {
    /// Signature verified and `nbf <= now < exp`
    Valid(Claims),

    /// Expired, but still inside the refresh window
    ExpiredRefreshable(Claims),

    /// Expired and past the refresh window
    ExpiredTerminal { expired_at: i64, now: i64 },

    /// Not a well-formed token
    Malformed(String),

    /// Signature verified but `now < nbf`
    NotYetValid { not_before: i64, now: i64 },

    /// Signature did not verify against the configured key
    SignatureInvalid,

    /// The token declares a different algorithm than the one configured
    AlgorithmMismatch { expected: String, found: String },

    /// Signature verified but `iss` differs from the expected issuer
    IssuerRejected(String),
}

impl TokenState {
    /// Stable snake_case name of the state
    pub fn name(&self) -> &'static str {
        match self {
            TokenState::Valid(_) => "valid",
            TokenState::ExpiredRefreshable(_) => "expired_refreshable",
            TokenState::ExpiredTerminal { .. } => "expired_terminal",
            TokenState::Malformed(_) => "malformed",
            TokenState::NotYetValid { .. } => "not_yet_valid",
            TokenState::SignatureInvalid => "signature_invalid",
            TokenState::AlgorithmMismatch { .. } => "algorithm_mismatch",
            TokenState::IssuerRejected(_) => "issuer_rejected",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TokenState::Valid(_))
    }

    pub fn is_refreshable(&self) -> bool {
        matches!(self, TokenState::ExpiredRefreshable(_))
    }

    /// Claims of a token whose signature verified and whose time claims
    /// place it in `Valid` or `ExpiredRefreshable`
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            TokenState::Valid(claims) | TokenState::ExpiredRefreshable(claims) => Some(claims),
            _ => None,
        }
    }

    /// Claims of a `Valid` token, or the error describing why it is not
    ///
    /// An `ExpiredRefreshable` token is an error here; check for it first if
    /// the caller intends to refresh.
    pub fn into_result(self) -> Result<Claims> {
        match self {
            TokenState::Valid(claims) => Ok(claims),
            TokenState::ExpiredRefreshable(claims) => Err(Error::RefreshRequired {
                expired_at: claims.expires_at,
            }),
            TokenState::ExpiredTerminal { expired_at, now } => {
                Err(Error::ExpiredTerminal { expired_at, now })
            }
            TokenState::Malformed(reason) => Err(Error::Malformed(reason)),
            TokenState::NotYetValid { not_before, now } => {
                Err(Error::NotYetValid { not_before, now })
            }
            TokenState::SignatureInvalid => Err(Error::SignatureInvalid),
            TokenState::AlgorithmMismatch { expected, found } => {
                Err(Error::AlgorithmMismatch { expected, found })
            }
            TokenState::IssuerRejected(issuer) => Err(Error::IssuerRejected(issuer)),
        }
    }

    fn from_decode_error(error: Error) -> Self {
        match error {
            Error::Malformed(reason) => TokenState::Malformed(reason),
            Error::AlgorithmMismatch { expected, found } => {
                TokenState::AlgorithmMismatch { expected, found }
            }
            // Anything else means the token could not be verified
            _ => TokenState::SignatureInvalid,
        }
    }
}

/// Authenticates session tokens and refreshes expired ones
///
/// # Examples
///
/// ```ignore
/// use session_jwt::*;
/// use std::{sync::Arc, time::Duration};
///
/// let config = Arc::new(
///     SigningConfig::hmac(AlgorithmId::HS256, b"k1".to_vec())?
///         .with_max_refresh_window(Duration::from_secs(1000)),
/// );
/// let validator = SessionValidator::new(config);
///
/// match validator.authenticate(&token, now) {
///     TokenState::Valid(claims) => println!("hello {}", claims.subject),
///     TokenState::ExpiredRefreshable(_) => {
///         let renewed = validator.refresh(&token, now, Duration::from_secs(3600))?;
///     }
///     other => return Err(other.into_result().unwrap_err()),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionValidator {
    codec: TokenCodec,
}

impl SessionValidator {
    pub fn new(config: Arc<SigningConfig>) -> Self {
        Self {
            codec: TokenCodec::new(config),
        }
    }

    /// Build from an existing codec (sharing its configuration)
    pub fn with_codec(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Determine the state of `token` at Unix time `now`
    pub fn authenticate(&self, token: &str, now: i64) -> TokenState {
        let claims = match self.codec.decode(token) {
            Ok(claims) => claims,
            Err(error) => return TokenState::from_decode_error(error),
        };

        let config = self.codec.config();
        if let Some(expected) = config.expected_issuer() {
            if claims.issuer != expected {
                return TokenState::IssuerRejected(claims.issuer);
            }
        }

        let window = config.max_refresh_window().as_secs();
        match time_status(&claims, now, window) {
            TimeStatus::NotYetValid => TokenState::NotYetValid {
                not_before: claims.not_before,
                now,
            },
            TimeStatus::Active => TokenState::Valid(claims),
            TimeStatus::InRefreshWindow => TokenState::ExpiredRefreshable(claims),
            TimeStatus::Lapsed => TokenState::ExpiredTerminal {
                expired_at: claims.expires_at,
                now,
            },
        }
    }

    /// Reissue an expired-but-refreshable token with `exp = now + extension`
    ///
    /// Every other claim is copied unchanged. Fails with
    /// [`Error::NotRefreshable`] for any other state, including `Valid`.
    pub fn refresh(&self, token: &str, now: i64, extension: Duration) -> Result<String> {
        let claims = match self.authenticate(token, now) {
            TokenState::ExpiredRefreshable(claims) => claims,
            other => return Err(Error::NotRefreshable(other.name())),
        };

        let extension = i64::try_from(extension.as_secs()).map_err(|_| Error::TimestampOverflow)?;
        let expires_at = now
            .checked_add(extension)
            .ok_or(Error::TimestampOverflow)?;

        self.codec.encode(&claims.with_expiry(expires_at))
    }

    /// [`authenticate`](Self::authenticate) at the current system time
    pub fn authenticate_now(&self, token: &str) -> TokenState {
        self.authenticate(token, current_timestamp())
    }

    /// [`refresh`](Self::refresh) at the current system time
    pub fn refresh_now(&self, token: &str, extension: Duration) -> Result<String> {
        self.refresh(token, current_timestamp(), extension)
    }
}
