//! # session-jwt - Signed Session Tokens with Grace-Period Refresh
//!
//! **session-jwt** issues and validates self-contained session tokens (JWTs) for a
//! service that signs its own tokens. The signing algorithm and key are fixed by
//! configuration; a token never gets to choose how it is verified.
//!
//! ## Overview
//!
//! Two components make up the core:
//!
//! - [`TokenCodec`] turns [`Claims`] into a signed `header.payload.signature`
//!   string and back. It is the only code that touches key material.
//! - [`SessionValidator`] decides what an incoming token means *right now*: valid,
//!   not yet valid, expired but still refreshable, or expired for good. For the
//!   refreshable case it can reissue the token with a later expiry.
//!
//! Everything else is optional plumbing around that core: [`TokenIssuer`] for
//! minting tokens at login, [`TokenSource`]/[`TokenLookup`] for finding the token
//! in a request, [`PermissionGate`] for authorization after authentication, and
//! [`SigningSettings`] for loading configuration from files and the environment.
//!
//! ## Quick Start
//!
//! ```ignore
//! use session_jwt::*;
//! use std::{sync::Arc, time::Duration};
//!
//! let config = Arc::new(
//!     SigningConfig::hmac(AlgorithmId::HS256, b"k1".to_vec())?
//!         .with_max_refresh_window(Duration::from_secs(1000)),
//! );
//!
//! let codec = TokenCodec::new(config.clone());
//! let token = codec.encode(&Claims::new(42, 1000, 2000).not_before(990).issuer("svc"))?;
//!
//! let validator = SessionValidator::new(config);
//! assert!(validator.authenticate(&token, 1500).is_valid());
//! assert!(validator.authenticate(&token, 2500).is_refreshable());
//!
//! let renewed = validator.refresh(&token, 2500, Duration::from_secs(3600))?;
//! assert!(validator.authenticate(&renewed, 6099).is_valid());
//! ```
//!
//! ## Token States
//!
//! ```text
//! Malformed          not three segments, undecodable header or payload
//! AlgorithmMismatch  header `alg` differs from the configured algorithm
//! SignatureInvalid   signature does not verify with the configured key
//! IssuerRejected     `iss` differs from the expected issuer (if configured)
//! NotYetValid        now < nbf
//! Valid              nbf <= now < exp
//! ExpiredRefreshable exp <= now <= exp + max_refresh_window
//! ExpiredTerminal    now > exp + max_refresh_window
//! ```
//!
//! Only `ExpiredRefreshable` tokens can be refreshed. Refreshing copies every claim
//! and sets `exp = now + extension`; a `Valid` token is never extended.
//!
//! ## Algorithm Support
//!
//! All algorithms implement a common `Algorithm` trait:
//!
//! - **HMAC**: HS256, HS384, HS512 (shared secret)
//! - **RSA**: RS256, RS384, RS512 (PKCS#1 v1.5 via `ring`; 2048-8192 bit keys)
//!
//! RSA keys are accepted as PEM or DER: PKCS#8 or PKCS#1 private keys,
//! SubjectPublicKeyInfo or PKCS#1 public keys. A configuration holding only a public
//! key can verify but not sign.
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! The header's `alg` is compared to the configured algorithm by plain string
//! equality before anything else happens. It is never parsed into an algorithm and
//! never used to select a key, so an HS256 token signed with an RSA public key as
//! the HMAC secret is rejected for an RS256 configuration, and `"none"` is rejected
//! everywhere.
//!
//! ### Verify Before Parse
//!
//! The signature is checked over the raw `header.payload` text before the payload
//! is decoded. Any change to the payload is a signature failure.
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate, preventing timing-based key recovery attacks.
//!
//! ### Input Limits
//!
//! Tokens are limited to 64 KiB, decoded headers to 8 KiB, payloads to 64 KiB and
//! signatures to 1 KiB. Anything larger is `Malformed`.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) - JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) - JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725) - JSON Web Signature Best Practices

// Core modules
pub mod error;
mod limits;
pub mod utils;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and configuration
pub mod claims;
pub mod config;

// Wire format and codec
pub mod codec;
pub mod token;

// Session lifecycle (main public API)
pub mod issuer;
pub mod validator;

// Request-side helpers
pub mod privilege;
pub mod source;

// ============================================================================
// PUBLIC API
// ============================================================================

// Session lifecycle
pub use codec::TokenCodec;
pub use issuer::TokenIssuer;
pub use validator::{SessionValidator, TokenState};

// Configuration
pub use config::{SigningConfig, SigningSettings};

// Claims and keys
pub use algorithm::AlgorithmId;
pub use claims::{Claims, SubjectId, UNSET_TIME};
pub use error::{Error, Result};
pub use keys::{Key, RsaKeys, RsaPrivateKey, RsaPublicKey};

// Request-side helpers
pub use privilege::{Enforcer, PermissionGate, StaticPolicy};
pub use source::{RequestView, TokenLookup, TokenSource};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_full_flow_hmac() {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        // Create a token manually
        let header = r#"{"alg":"HS256","typ":"JWT"}"#;
        let payload = r#"{"sub":"user123","iat":1000,"nbf":1000,"exp":2000,"iss":"https://example.com","team":"core"}"#;

        let header_b64 = utils::base64url::encode(header);
        let payload_b64 = utils::base64url::encode(payload);
        let signing_input = format!("{}.{}", header_b64, payload_b64);

        let secret = b"my-secret-key";
        let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
        mac.update(signing_input.as_bytes());
        let signature_bytes = mac.finalize().into_bytes();
        let signature_b64 = utils::base64url::encode_bytes(&signature_bytes);

        let token_str = format!("{}.{}", signing_input, signature_b64);

        // Validate the token through the full pipeline
        let config = SigningConfig::hmac(AlgorithmId::HS256, secret.to_vec())
            .unwrap()
            .with_expected_issuer("https://example.com");
        let validator = SessionValidator::new(Arc::new(config));

        let claims = validator
            .authenticate(&token_str, 1500)
            .into_result()
            .expect("Validation failed");

        assert_eq!(claims.subject, SubjectId::from("user123"));
        assert_eq!(claims.issuer, "https://example.com");
        assert_eq!(claims.extra["team"], "core");
    }

    #[test]
    fn test_end_to_end_refresh() {
        let config = Arc::new(
            SigningConfig::hmac(AlgorithmId::HS256, b"k1".to_vec())
                .unwrap()
                .with_max_refresh_window(Duration::from_secs(1000)),
        );
        let codec = TokenCodec::new(config.clone());
        let validator = SessionValidator::new(config);

        let claims = Claims::new(42, 1000, 2000).not_before(990).issuer("svc");
        let token = codec.encode(&claims).unwrap();

        assert_eq!(
            validator.authenticate(&token, 1500),
            TokenState::Valid(claims.clone())
        );
        assert_eq!(
            validator.authenticate(&token, 2500),
            TokenState::ExpiredRefreshable(claims.clone())
        );

        let renewed = validator
            .refresh(&token, 2500, Duration::from_secs(3600))
            .unwrap();
        assert_eq!(
            validator.authenticate(&renewed, 2500),
            TokenState::Valid(claims.with_expiry(6100))
        );
    }

    #[test]
    fn test_extract_authenticate_authorize() {
        struct Headers(String);

        impl RequestView for Headers {
            fn header(&self, name: &str) -> Option<&str> {
                (name == "Authorization").then_some(self.0.as_str())
            }
            fn query(&self, _: &str) -> Option<&str> {
                None
            }
            fn cookie(&self, _: &str) -> Option<&str> {
                None
            }
        }

        let config = Arc::new(SigningConfig::hmac(AlgorithmId::HS512, b"k".to_vec()).unwrap());
        let issuer = TokenIssuer::new(TokenCodec::new(config.clone()), "svc", Duration::from_secs(60));
        let token = issuer.issue(7, 100).unwrap();

        let request = Headers(format!("Bearer {token}"));

        let raw = TokenSource::default().extract(&request).unwrap();
        let state = SessionValidator::new(config).authenticate(raw, 120);

        let gate = PermissionGate::new(StaticPolicy::new().allow("user_7", "/orders", "GET"), "user_");
        assert_eq!(gate.check(&state, "/orders", "GET"), Ok(()));
        assert!(matches!(
            gate.check(&state, "/orders", "POST"),
            Err(Error::Forbidden { .. })
        ));
    }
}
