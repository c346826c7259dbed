//! Token encoding and decoding
//!
//! [`TokenCodec`] is the only place that signs or verifies. Decoding runs in
//! a fixed order: split the token, decode the header, compare the declared
//! algorithm against the configured one, verify the signature over the raw
//! `header.payload` text, and only then parse the payload. A token whose
//! payload was altered therefore fails as [`Error::SignatureInvalid`] before
//! any of its claims are looked at.

use crate::algorithm::signer_for;
use crate::claims::Claims;
use crate::config::SigningConfig;
use crate::error::{Error, Result};
use crate::limits::MAX_DECODED_PAYLOAD_SIZE;
use crate::token::{ParsedToken, TokenHeader};
use crate::utils::base64url;
use std::sync::Arc;

/// Signs claims into tokens and verifies tokens back into claims
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: Arc<SigningConfig>,
}

impl TokenCodec {
    /// Create a codec bound to a signing configuration
    pub fn new(config: Arc<SigningConfig>) -> Self {
        Self { config }
    }

    /// Signing configuration in use
    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Encode and sign claims
    ///
    /// Fails with [`Error::InvalidClaims`] or [`Error::ReservedClaim`] for
    /// claims that break the creation-time invariants, and with
    /// [`Error::KeyMissing`] when the configuration cannot sign (an RSA
    /// configuration holding only a public key).
    pub fn encode(&self, claims: &Claims) -> Result<String> {
        claims.check()?;

        let algorithm = self.config.algorithm();
        let header_b64 = TokenHeader::new(algorithm).encode()?;
        let payload = serde_json::to_string(claims)
            .map_err(|e| Error::PayloadInvalid(format!("Failed to serialize claims: {e}")))?;
        let payload_b64 = base64url::encode(&payload);

        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature = signer_for(algorithm).sign(&signing_input, self.config.key())?;

        Ok(format!(
            "{signing_input}.{}",
            base64url::encode_bytes(&signature)
        ))
    }

    /// Verify a token and decode its claims
    ///
    /// Time claims are not evaluated here; see
    /// [`SessionValidator`](crate::SessionValidator).
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let parsed = ParsedToken::from_string(token)?;

        let algorithm = self.config.algorithm();
        algorithm.expect_declared(parsed.header().algorithm_str())?;

        let signature = parsed.signature()?;
        signer_for(algorithm).verify(parsed.signing_input(), &signature, self.config.key())?;

        let payload = base64url::decode_string(parsed.payload_segment(), MAX_DECODED_PAYLOAD_SIZE)?;
        serde_json::from_str(&payload)
            .map_err(|e| Error::Malformed(format!("Failed to parse claims: {e}")))
    }
}
