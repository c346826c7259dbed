use crate::algorithm::AlgorithmId;
use crate::error::Result;
use crate::keys::Key;

/// Core algorithm trait that all token signature algorithms implement
///
/// Different algorithm families (HMAC, RSA) implement this trait. Both
/// directions take the configured [`Key`]; the algorithm picks the half it
/// needs and reports [`KeyMissing`](crate::Error::KeyMissing) otherwise.
pub trait Algorithm {
    /// The algorithm identifier (e.g., "HS256", "RS256")
    fn name(&self) -> &'static str;

    /// Sign the signing input (header.payload) and return raw signature bytes
    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>>;

    /// Verify raw signature bytes over the signing input
    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()>;
}

/// Shared reference to a stateless algorithm implementation
pub type TokenSigner = &'static (dyn Algorithm + Send + Sync);

/// Get the algorithm implementation for the given algorithm ID
pub fn signer_for(algorithm: AlgorithmId) -> TokenSigner {
    match algorithm {
        AlgorithmId::HS256 => &super::hmac::HS256,
        AlgorithmId::HS384 => &super::hmac::HS384,
        AlgorithmId::HS512 => &super::hmac::HS512,

        AlgorithmId::RS256 => &super::rsa::RS256,
        AlgorithmId::RS384 => &super::rsa::RS384,
        AlgorithmId::RS512 => &super::rsa::RS512,
    }
}
