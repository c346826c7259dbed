use crate::error::{Error, Result};
use crate::limits::{MAX_DECODED_SIGNATURE_SIZE, MAX_TOKEN_LENGTH};
use crate::token::TokenHeader;
use crate::utils::base64url;

/// A token split into its segments with the header decoded
///
/// Nothing about a `ParsedToken` is trusted yet: the payload has not been
/// decoded and the signature has not been checked. The segments borrow from
/// the input, so the signing input is the exact text that was received.
#[derive(Debug)]
pub struct ParsedToken<'a> {
    header: TokenHeader,
    signing_input: &'a str,
    payload_b64: &'a str,
    signature_b64: &'a str,
}

impl<'a> ParsedToken<'a> {
    /// Split a token into `header.payload.signature` and decode the header
    ///
    /// Fails with [`Error::Malformed`] if the token is too long, does not
    /// have exactly three non-empty segments, or its header cannot be decoded.
    pub fn from_string(token: &'a str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::Malformed(format!(
                "Token too long: {} bytes (max: {})",
                token.len(),
                MAX_TOKEN_LENGTH
            )));
        }

        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Malformed(
                "Expected three '.'-separated segments".to_string(),
            ));
        };

        if header_b64.is_empty() || payload_b64.is_empty() || signature_b64.is_empty() {
            return Err(Error::Malformed("Empty token segment".to_string()));
        }

        let header = TokenHeader::decode(header_b64)?;

        // header + '.' + payload
        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];

        Ok(Self {
            header,
            signing_input,
            payload_b64,
            signature_b64,
        })
    }

    /// Get the token header
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// The raw `header.payload` text the signature covers
    pub fn signing_input(&self) -> &'a str {
        self.signing_input
    }

    /// The payload segment, still Base64URL-encoded
    pub fn payload_segment(&self) -> &'a str {
        self.payload_b64
    }

    /// Decode the signature segment
    pub fn signature(&self) -> Result<Vec<u8>> {
        base64url::decode_bytes(self.signature_b64, MAX_DECODED_SIGNATURE_SIZE)
    }
}
