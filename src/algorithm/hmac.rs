use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HS256 algorithm (HMAC with SHA-256)
pub struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub struct HS512;

impl Algorithm for HS256 {
    fn name(&self) -> &'static str {
        "HS256"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        compute_mac::<Hmac<Sha256>>(signing_input, key.as_symmetric()?.as_bytes())
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_mac::<Hmac<Sha256>>(signing_input, signature, key.as_symmetric()?.as_bytes())
    }
}

impl Algorithm for HS384 {
    fn name(&self) -> &'static str {
        "HS384"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        compute_mac::<Hmac<Sha384>>(signing_input, key.as_symmetric()?.as_bytes())
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_mac::<Hmac<Sha384>>(signing_input, signature, key.as_symmetric()?.as_bytes())
    }
}

impl Algorithm for HS512 {
    fn name(&self) -> &'static str {
        "HS512"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        compute_mac::<Hmac<Sha512>>(signing_input, key.as_symmetric()?.as_bytes())
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_mac::<Hmac<Sha512>>(signing_input, signature, key.as_symmetric()?.as_bytes())
    }
}

fn compute_mac<M: Mac + KeyInit>(signing_input: &str, secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|e| Error::SigningFailed(format!("HMAC key rejected: {e}")))?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify a MAC with constant-time comparison
fn verify_mac<M: Mac + KeyInit>(signing_input: &str, signature: &[u8], secret: &[u8]) -> Result<()> {
    let mut mac = <M as KeyInit>::new_from_slice(secret).map_err(|_| Error::SignatureInvalid)?;
    mac.update(signing_input.as_bytes());
    let expected_signature = mac.finalize().into_bytes();

    if signature.len() != expected_signature.len() {
        return Err(Error::SignatureInvalid);
    }

    if constant_time_eq(signature, &expected_signature) {
        Ok(())
    } else {
        Err(Error::SignatureInvalid)
    }
}
