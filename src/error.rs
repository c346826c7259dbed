//! Error types for session token processing
//!
//! Per-token outcomes (malformed, mismatched algorithm, bad signature, expiry)
//! are returned to the caller as values and never logged by the core.
//! Configuration errors surface from [`SigningConfig`](crate::SigningConfig)
//! construction so that a misconfigured service fails at startup.

use thiserror::Error;

/// Errors that can occur while issuing, validating or refreshing tokens
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Algorithm mismatch: configured '{expected}', token declares '{found}'")]
    AlgorithmMismatch { expected: String, found: String },

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Token not valid until {not_before} (now: {now})")]
    NotYetValid { not_before: i64, now: i64 },

    #[error("Token expired at {expired_at} and must be refreshed")]
    RefreshRequired { expired_at: i64 },

    #[error("Token expired at {expired_at} and is past the refresh window (now: {now})")]
    ExpiredTerminal { expired_at: i64, now: i64 },

    #[error("Token issuer '{0}' is not accepted")]
    IssuerRejected(String),

    #[error("Token cannot be refreshed in state '{0}'")]
    NotRefreshable(&'static str),

    // ============================================================================
    // Claims Errors
    // ============================================================================
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    #[error("Claim '{0}' is reserved and cannot be carried in the custom payload")]
    ReservedClaim(String),

    #[error("Custom payload could not be converted: {0}")]
    PayloadInvalid(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    AlgorithmUnsupported(String),

    #[error("The 'none' algorithm is rejected for security reasons (RFC 8725)")]
    AlgorithmNoneRejected,

    #[error("Missing key: {0}")]
    KeyMissing(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key file '{path}' unreadable: {reason}")]
    KeyFileUnreadable { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Integer overflow in timestamp arithmetic")]
    TimestampOverflow,

    // ============================================================================
    // Extraction Errors
    // ============================================================================
    #[error("Auth header '{0}' is empty")]
    EmptyAuthHeader(String),

    #[error("Auth header '{0}' is invalid")]
    InvalidAuthHeader(String),

    #[error("Query token '{0}' is empty")]
    EmptyQueryToken(String),

    #[error("Cookie token '{0}' is empty")]
    EmptyCookieToken(String),

    #[error("Path parameter token '{0}' is empty")]
    EmptyParamToken(String),

    // ============================================================================
    // Permission Errors
    // ============================================================================
    #[error("Request is not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Subject '{subject}' may not {action} '{resource}'")]
    Forbidden {
        subject: String,
        resource: String,
        action: String,
    },

    #[error("Permission backend failed: {0}")]
    PermissionBackend(String),
}

/// Result type alias for session-jwt operations
pub type Result<T> = std::result::Result<T, Error>;
