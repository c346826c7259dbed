use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::keys::Key;

use ring::rand::SystemRandom;
use ring::signature::{self, RsaEncoding, UnparsedPublicKey};

/// RS256 algorithm (RSA with SHA-256)
pub struct RS256;

/// RS384 algorithm (RSA with SHA-384)
pub struct RS384;

/// RS512 algorithm (RSA with SHA-512)
pub struct RS512;

impl Algorithm for RS256 {
    fn name(&self) -> &'static str {
        "RS256"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_rsa(signing_input, key, &signature::RSA_PKCS1_SHA256)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_rsa(
            signing_input,
            signature,
            key,
            &signature::RSA_PKCS1_2048_8192_SHA256,
        )
    }
}

impl Algorithm for RS384 {
    fn name(&self) -> &'static str {
        "RS384"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_rsa(signing_input, key, &signature::RSA_PKCS1_SHA384)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_rsa(
            signing_input,
            signature,
            key,
            &signature::RSA_PKCS1_2048_8192_SHA384,
        )
    }
}

impl Algorithm for RS512 {
    fn name(&self) -> &'static str {
        "RS512"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_rsa(signing_input, key, &signature::RSA_PKCS1_SHA512)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_rsa(
            signing_input,
            signature,
            key,
            &signature::RSA_PKCS1_2048_8192_SHA512,
        )
    }
}

/// Generic RSA PKCS#1 v1.5 signing
fn sign_rsa(
    signing_input: &str,
    key: &Key,
    padding: &'static dyn RsaEncoding,
) -> Result<Vec<u8>> {
    let private_key = key.as_rsa_private()?;

    let rng = SystemRandom::new();
    let mut signature = vec![0u8; private_key.modulus_len()];
    private_key
        .key_pair()
        .sign(padding, &rng, signing_input.as_bytes(), &mut signature)
        .map_err(|_| Error::SigningFailed("RSA signing failed".to_string()))?;

    Ok(signature)
}

/// Generic RSA signature verification
fn verify_rsa(
    signing_input: &str,
    signature: &[u8],
    key: &Key,
    algorithm: &'static dyn signature::VerificationAlgorithm,
) -> Result<()> {
    let rsa_key = key.as_rsa_public()?;

    let public_key = UnparsedPublicKey::new(algorithm, rsa_key.as_der());

    public_key
        .verify(signing_input.as_bytes(), signature)
        .map_err(|_| Error::SignatureInvalid)
}
