use crate::algorithm::AlgorithmId;
use crate::error::{Error, Result};
use crate::limits::MAX_DECODED_HEADER_SIZE;
use crate::utils::base64url;
use serde::{Deserialize, Serialize};

/// JWT header structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Algorithm the token claims to be signed with
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type (typically "JWT"); carried but never checked
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenHeader {
    /// Header for tokens signed with `algorithm`
    pub fn new(algorithm: AlgorithmId) -> Self {
        Self {
            algorithm: algorithm.as_str().to_string(),
            token_type: Some("JWT".to_string()),
        }
    }

    /// Decode a Base64URL header segment
    pub fn decode(segment: &str) -> Result<Self> {
        let json = base64url::decode_string(segment, MAX_DECODED_HEADER_SIZE)?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Malformed(format!("Failed to parse header: {e}")))
    }

    /// Encode as a Base64URL header segment
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self)
            .map_err(|e| Error::SigningFailed(format!("Failed to serialize header: {e}")))?;
        Ok(base64url::encode(&json))
    }

    /// Get algorithm as string, exactly as declared
    pub fn algorithm_str(&self) -> &str {
        &self.algorithm
    }
}
