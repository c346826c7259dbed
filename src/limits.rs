//! Size limit constants for input validation

/// Maximum length for a token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded header JSON (8KB)
/// Headers are typically well under 100 bytes
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded payload JSON (64KB)
/// Custom payloads must be bounded like everything else
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// HS512 MACs are 64 bytes, RSA-8192 signatures 1024 bytes
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

// ============================================================================
// Header field size limits
// ============================================================================

/// Maximum length for the algorithm (alg) header field (16 bytes)
pub(crate) const MAX_ALG_LENGTH: usize = 16;

// ============================================================================
// Issuance defaults
// ============================================================================

/// Default backdating of `nbf` relative to `iat` for issued tokens (10 seconds)
pub(crate) const DEFAULT_NOT_BEFORE_LEEWAY_SECONDS: u64 = 10;

/// Default token lifetime for issued tokens (1 hour)
pub(crate) const DEFAULT_TOKEN_LIFETIME_SECONDS: u64 = 3600;
