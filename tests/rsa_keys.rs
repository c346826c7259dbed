//! RSA key formats and RSA-signed sessions

use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use session_jwt::*;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

fn test_key() -> &'static rsa::RsaPrivateKey {
    static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap())
}

fn private_pkcs8_pem() -> String {
    test_key().to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
}

fn public_spki_pem() -> String {
    test_key()
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .unwrap()
}

fn rsa_config(algorithm: AlgorithmId, keys: RsaKeys) -> Arc<SigningConfig> {
    Arc::new(
        SigningConfig::rsa(algorithm, keys)
            .unwrap()
            .with_max_refresh_window(Duration::from_secs(600)),
    )
}

// ============================================================================
// Key formats
// ============================================================================

#[test]
fn private_key_formats_agree() {
    let key = test_key();
    let from_pkcs8_pem = RsaPrivateKey::from_pem_or_der(private_pkcs8_pem().as_bytes()).unwrap();
    let from_pkcs8_der =
        RsaPrivateKey::from_pem_or_der(key.to_pkcs8_der().unwrap().as_bytes()).unwrap();
    let from_pkcs1_pem = RsaPrivateKey::from_pem_or_der(
        key.to_pkcs1_pem(LineEnding::LF).unwrap().as_bytes(),
    )
    .unwrap();
    let from_pkcs1_der =
        RsaPrivateKey::from_pem_or_der(key.to_pkcs1_der().unwrap().as_bytes()).unwrap();

    let expected = from_pkcs8_pem.public_key();
    assert_eq!(from_pkcs8_der.public_key(), expected);
    assert_eq!(from_pkcs1_pem.public_key(), expected);
    assert_eq!(from_pkcs1_der.public_key(), expected);
    assert_eq!(from_pkcs8_pem.modulus_len(), 256);
}

#[test]
fn public_key_formats_agree() {
    let public = test_key().to_public_key();

    let from_spki_pem = RsaPublicKey::from_pem_or_der(public_spki_pem().as_bytes()).unwrap();
    let from_spki_der =
        RsaPublicKey::from_pem_or_der(public.to_public_key_der().unwrap().as_bytes()).unwrap();
    let from_pkcs1_pem = RsaPublicKey::from_pem_or_der(
        public.to_pkcs1_pem(LineEnding::LF).unwrap().as_bytes(),
    )
    .unwrap();
    let from_pkcs1_der =
        RsaPublicKey::from_pem_or_der(public.to_pkcs1_der().unwrap().as_bytes()).unwrap();

    // Everything is normalized to PKCS#1
    assert_eq!(from_spki_pem.as_der(), public.to_pkcs1_der().unwrap().as_bytes());
    assert_eq!(from_spki_der, from_spki_pem);
    assert_eq!(from_pkcs1_pem, from_spki_pem);
    assert_eq!(from_pkcs1_der, from_spki_pem);

    let derived = RsaPrivateKey::from_pem_or_der(private_pkcs8_pem().as_bytes())
        .unwrap()
        .public_key();
    assert_eq!(derived, from_spki_pem);
}

#[test]
fn garbage_and_mismatched_material_is_rejected() {
    assert!(matches!(
        RsaPrivateKey::from_pem_or_der(b""),
        Err(Error::InvalidKey(_))
    ));
    assert!(matches!(
        RsaPrivateKey::from_pem_or_der(b"definitely not a key"),
        Err(Error::InvalidKey(_))
    ));
    assert!(matches!(
        RsaPublicKey::from_pem_or_der(b"\x30\x03\x02\x01\x01"),
        Err(Error::InvalidKey(_))
    ));

    // A public key where a private key is expected
    assert!(matches!(
        RsaPrivateKey::from_pem_or_der(public_spki_pem().as_bytes()),
        Err(Error::InvalidKey(_))
    ));

    let certificate = "-----BEGIN CERTIFICATE-----\nMAA=\n-----END CERTIFICATE-----\n";
    assert!(matches!(
        RsaPublicKey::from_pem_or_der(certificate.as_bytes()),
        Err(Error::InvalidKey(_))
    ));
}

#[test]
fn small_keys_are_rejected() {
    let weak = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();

    assert!(matches!(
        RsaPrivateKey::from_pem_or_der(weak.to_pkcs8_der().unwrap().as_bytes()),
        Err(Error::InvalidKey(_))
    ));
    assert!(matches!(
        RsaPublicKey::from_pem_or_der(weak.to_public_key().to_public_key_der().unwrap().as_bytes()),
        Err(Error::InvalidKey(_))
    ));
}

// ============================================================================
// Signing and verification
// ============================================================================

#[test]
fn rsa_sessions_round_trip_for_every_digest() {
    let private = RsaPrivateKey::from_pem_or_der(private_pkcs8_pem().as_bytes()).unwrap();

    for algorithm in [AlgorithmId::RS256, AlgorithmId::RS384, AlgorithmId::RS512] {
        let config = rsa_config(algorithm, RsaKeys::from_private(private.clone()));
        let codec = TokenCodec::new(config.clone());
        let validator = SessionValidator::new(config);

        let claims = Claims::new(42, 1000, 2000).not_before(990).issuer("svc");
        let token = codec.encode(&claims).unwrap();

        assert_eq!(codec.decode(&token).unwrap(), claims, "{algorithm}");
        assert!(validator.authenticate(&token, 1500).is_valid());

        let renewed = validator
            .refresh(&token, 2100, Duration::from_secs(3600))
            .unwrap();
        assert_eq!(codec.decode(&renewed).unwrap().expires_at, 5700);
    }
}

#[test]
fn verify_only_config_checks_but_cannot_sign() {
    let private = RsaPrivateKey::from_pem_or_der(private_pkcs8_pem().as_bytes()).unwrap();
    let signer = TokenCodec::new(rsa_config(
        AlgorithmId::RS256,
        RsaKeys::from_private(private),
    ));

    let public = RsaPublicKey::from_pem_or_der(public_spki_pem().as_bytes()).unwrap();
    let verify_config = rsa_config(AlgorithmId::RS256, RsaKeys::verify_only(public));
    let verifier = TokenCodec::new(verify_config.clone());
    let validator = SessionValidator::new(verify_config);

    let token = signer.encode(&Claims::new("svc-a", 1000, 2000)).unwrap();
    assert!(validator.authenticate(&token, 1500).is_valid());

    assert!(matches!(
        verifier.encode(&Claims::new("svc-b", 1000, 2000)),
        Err(Error::KeyMissing(_))
    ));
    // Refreshing needs signing, so it fails the same way
    assert!(matches!(
        validator.refresh(&token, 2100, Duration::from_secs(60)),
        Err(Error::KeyMissing(_))
    ));
}

#[test]
fn token_from_another_key_pair_fails_signature() {
    let ours = RsaPrivateKey::from_pem_or_der(private_pkcs8_pem().as_bytes()).unwrap();
    let theirs_raw = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
    let theirs =
        RsaPrivateKey::from_pem_or_der(theirs_raw.to_pkcs8_der().unwrap().as_bytes()).unwrap();

    let token = TokenCodec::new(rsa_config(AlgorithmId::RS256, RsaKeys::from_private(theirs)))
        .encode(&Claims::new(1, 1000, 2000))
        .unwrap();

    let validator = SessionValidator::new(rsa_config(
        AlgorithmId::RS256,
        RsaKeys::from_private(ours),
    ));
    assert_eq!(
        validator.authenticate(&token, 1500),
        TokenState::SignatureInvalid
    );
}

#[test]
fn rsa_keys_need_at_least_one_half() {
    assert!(matches!(RsaKeys::new(None, None), Err(Error::KeyMissing(_))));

    let public = RsaPublicKey::from_pem_or_der(public_spki_pem().as_bytes()).unwrap();
    let keys = RsaKeys::new(None, Some(public.clone())).unwrap();
    assert!(!keys.can_sign());
    assert_eq!(keys.public(), &public);
}

#[test]
fn halves_from_different_key_pairs_are_rejected() {
    let ours = RsaPrivateKey::from_pem_or_der(private_pkcs8_pem().as_bytes()).unwrap();
    let other = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
    let other_public = RsaPublicKey::from_pem_or_der(
        other.to_public_key().to_public_key_der().unwrap().as_bytes(),
    )
    .unwrap();

    assert!(matches!(
        RsaKeys::new(Some(ours.clone()), Some(other_public.clone())),
        Err(Error::InvalidKey(msg)) if msg.contains("does not match")
    ));

    // The matching half is accepted and signs tokens it can verify
    let matching = RsaPublicKey::from_pem_or_der(public_spki_pem().as_bytes()).unwrap();
    let keys = RsaKeys::new(Some(ours), Some(matching)).unwrap();
    let config = rsa_config(AlgorithmId::RS256, keys);
    let token = TokenCodec::new(config.clone())
        .encode(&Claims::new(1, 1000, 2000))
        .unwrap();
    assert!(SessionValidator::new(config).authenticate(&token, 1500).is_valid());

    // Key files from two different pairs abort configuration loading
    let dir = tempfile::tempdir().unwrap();
    let private_path = dir.path().join("private.pem");
    let public_path = dir.path().join("public.der");
    std::fs::write(&private_path, private_pkcs8_pem()).unwrap();
    std::fs::write(&public_path, other_public.as_der()).unwrap();

    let settings = SigningSettings {
        algorithm: "RS256".to_string(),
        private_key_path: Some(private_path),
        public_key_path: Some(public_path),
        ..SigningSettings::default()
    };
    assert!(matches!(
        SigningConfig::from_settings(&settings),
        Err(Error::InvalidKey(_))
    ));
}

#[test]
fn rsa_algorithm_rejects_hmac_secret() {
    assert!(matches!(
        SigningConfig::hmac(AlgorithmId::RS256, b"secret".to_vec()),
        Err(Error::KeyMissing(_))
    ));
}

#[test]
fn debug_output_has_no_key_material() {
    let private = RsaPrivateKey::from_pem_or_der(private_pkcs8_pem().as_bytes()).unwrap();
    let config = SigningConfig::rsa(AlgorithmId::RS256, RsaKeys::from_private(private)).unwrap();
    let printed = format!("{config:?}");
    assert!(printed.contains("RS256"));
    assert!(printed.contains("modulus_bits"));
    assert!(!printed.contains("BEGIN"));
}
