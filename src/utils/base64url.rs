//! Base64URL encoding/decoding per RFC 4648
//!
//! Thin wrapper around the `base64` crate (URL-safe alphabet, no padding)
//! with size limit validation on the decoding side.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Encode bytes to a Base64URL string
pub fn encode_bytes(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode a UTF-8 string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode a Base64URL string to bytes, rejecting results larger than `max_size`
pub fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    // Every 4 input characters decode to at most 3 bytes
    if input.len() / 4 * 3 > max_size + 3 {
        return Err(Error::Malformed(format!(
            "Encoded segment too large: {} characters (decoded maximum: {} bytes)",
            input.len(),
            max_size
        )));
    }

    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::Malformed(format!("Base64URL decode failed: {e}")))?;

    if result.len() > max_size {
        return Err(Error::Malformed(format!(
            "Decoded size exceeds limit: {} bytes (max: {})",
            result.len(),
            max_size
        )));
    }

    Ok(result)
}

/// Decode a Base64URL string to a UTF-8 string with a size limit
pub fn decode_string(input: &str, max_size: usize) -> Result<String> {
    decode_bytes(input, max_size).and_then(|bytes| {
        String::from_utf8(bytes).map_err(|e| Error::Malformed(format!("Invalid UTF-8: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bytes() {
        assert_eq!(encode_bytes(b""), "");
        assert_eq!(encode_bytes(b"f"), "Zg");
        assert_eq!(encode_bytes(b"fo"), "Zm8");
        assert_eq!(encode_bytes(b"foo"), "Zm9v");
        assert_eq!(encode_bytes(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn test_url_safe_characters() {
        let encoded = encode_bytes(&[0xfb, 0xff]);
        assert!(encoded.contains('-') || encoded.contains('_'));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn test_decode_invalid() {
        assert!(decode_bytes("!!!", 1000).is_err());
        // Standard base64 padding is not accepted
        assert!(matches!(
            decode_bytes("SGVsbG8=", 1000),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_with_limit() {
        assert_eq!(decode_bytes("SGVsbG8", 10).unwrap(), b"Hello");
        assert!(decode_bytes("SGVsbG8", 3).is_err());
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(decode_string("SGVsbG8", 10).unwrap(), "Hello");
        assert!(decode_string(&encode_bytes(&[0xff, 0xfe]), 10).is_err());
    }
}
