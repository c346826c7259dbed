//! PEM/DER handling for RSA key material
//!
//! Keys arrive either as PEM text or as raw DER. `ring` wants PKCS#8 (or
//! PKCS#1) DER for private keys and a bare PKCS#1 `RSAPublicKey` for public
//! keys, so SubjectPublicKeyInfo wrappers are unwrapped here using the
//! RustCrypto `der` and `spki` crates.

use crate::error::{Error, Result};
use der::{asn1::UintRef, Decode, Document, Sequence};
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

const PEM_PREFIX: &[u8] = b"-----BEGIN ";

/// Container format of decoded key material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyEncoding {
    /// `PRIVATE KEY` (PKCS#8 PrivateKeyInfo)
    Pkcs8,
    /// `RSA PRIVATE KEY` / `RSA PUBLIC KEY` (PKCS#1)
    Pkcs1,
    /// `PUBLIC KEY` (X.509 SubjectPublicKeyInfo)
    Spki,
    /// Raw DER without a label
    Der,
}

/// Create error message for key decoding failures
fn key_error(operation: &str, details: impl std::fmt::Display) -> Error {
    Error::InvalidKey(format!("{operation}: {details}"))
}

/// Returns true if the input looks like PEM text
pub(crate) fn is_pem(input: &[u8]) -> bool {
    let trimmed = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(&input[..0], |start| &input[start..]);
    trimmed.starts_with(PEM_PREFIX)
}

/// Decode PEM or pass DER through, reporting the container format
pub(crate) fn decode_key_material(input: &[u8]) -> Result<(KeyEncoding, Vec<u8>)> {
    if !is_pem(input) {
        if input.is_empty() {
            return Err(key_error("empty key material", "no bytes"));
        }
        return Ok((KeyEncoding::Der, input.to_vec()));
    }

    let text = std::str::from_utf8(input).map_err(|e| key_error("PEM is not UTF-8", e))?;
    let (label, document) =
        Document::from_pem(text.trim()).map_err(|e| key_error("failed to decode PEM", e))?;

    let encoding = match label {
        "PRIVATE KEY" => KeyEncoding::Pkcs8,
        "RSA PRIVATE KEY" | "RSA PUBLIC KEY" => KeyEncoding::Pkcs1,
        "PUBLIC KEY" => KeyEncoding::Spki,
        other => return Err(key_error("unsupported PEM label", other)),
    };

    Ok((encoding, document.as_bytes().to_vec()))
}

/// Unwrap an RSA SubjectPublicKeyInfo into its PKCS#1 `RSAPublicKey`
pub(crate) fn rsa_public_from_spki(spki_der: &[u8]) -> Result<Vec<u8>> {
    let spki = SubjectPublicKeyInfoRef::from_der(spki_der)
        .map_err(|e| key_error("failed to parse SubjectPublicKeyInfo", e))?;

    if spki.algorithm.oid != RSA_ENCRYPTION_OID {
        return Err(key_error(
            "public key is not an RSA key",
            spki.algorithm.oid,
        ));
    }

    spki.subject_public_key
        .as_bytes()
        .map(<[u8]>::to_vec)
        .ok_or_else(|| key_error("malformed public key bit string", "unused bits"))
}

/// RSA public key structure (PKCS#1)
///
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Modulus size accepted for signing and verification (bits)
pub(crate) const RSA_MODULUS_BITS: std::ops::RangeInclusive<usize> = 2048..=8192;

/// Parse a PKCS#1 `RSAPublicKey` and return its modulus size in bits
pub(crate) fn rsa_modulus_bits(pkcs1_der: &[u8]) -> Result<usize> {
    let key = RsaPublicKey::from_der(pkcs1_der)
        .map_err(|e| key_error("failed to parse RSAPublicKey", e))?;

    let modulus = key.modulus.as_bytes();
    let exponent = key.public_exponent.as_bytes();
    if modulus.is_empty() || exponent.is_empty() {
        return Err(key_error("rsa key missing n or e", ""));
    }

    let bits = modulus.len() * 8 - modulus[0].leading_zeros() as usize;
    if !RSA_MODULUS_BITS.contains(&bits) {
        return Err(key_error(
            "RSA modulus size out of range",
            format!(
                "{bits} bits (accepted: {}..={})",
                RSA_MODULUS_BITS.start(),
                RSA_MODULUS_BITS.end()
            ),
        ));
    }

    Ok(bits)
}

/// Normalize PEM/DER public key input to PKCS#1 DER
///
/// Raw DER is tried as SubjectPublicKeyInfo first and used as PKCS#1 if that
/// fails. The result still has to pass [`rsa_modulus_bits`].
pub(crate) fn rsa_public_key_der(input: &[u8]) -> Result<Vec<u8>> {
    let (encoding, der) = decode_key_material(input)?;
    match encoding {
        KeyEncoding::Spki => rsa_public_from_spki(&der),
        KeyEncoding::Pkcs1 => Ok(der),
        KeyEncoding::Der => Ok(rsa_public_from_spki(&der).unwrap_or(der)),
        KeyEncoding::Pkcs8 => Err(key_error(
            "expected a public key",
            "found a PKCS#8 private key",
        )),
    }
}
