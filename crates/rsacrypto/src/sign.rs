//! Message signing and verification
//!
//! The whole message is hashed once with the configured algorithm and only
//! the digest goes through RSA, so message length is unbounded and no
//! chunking happens here.

use rsa::{RsaPrivateKey, RsaPublicKey};
use rsacrypto_core::Result;

use crate::digest::digest;
use crate::options::SignerOptions;
use crate::primitive::{sign_digest, verify_digest};

#[derive(Clone)]
pub struct RsaSigner<'a> {
    key: &'a RsaPrivateKey,
    options: SignerOptions,
}

impl<'a> RsaSigner<'a> {
    pub fn new(key: &'a RsaPrivateKey, options: SignerOptions) -> Self {
        Self { key, options }
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let hashed = digest(self.options.hash(), data);
        tracing::debug!(
            scheme = %self.options.scheme(),
            hash = %self.options.hash(),
            bytes = data.len(),
            "signing"
        );
        sign_digest(&self.options, self.key, &hashed)
    }
}

impl std::fmt::Debug for RsaSigner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSigner")
            .field("key", &"[REDACTED]")
            .field("options", &self.options)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RsaVerifier<'a> {
    key: &'a RsaPublicKey,
    options: SignerOptions,
}

impl<'a> RsaVerifier<'a> {
    pub fn new(key: &'a RsaPublicKey, options: SignerOptions) -> Self {
        Self { key, options }
    }

    /// `Ok(())` only if `signature` is valid for `data` under this key,
    /// scheme, and hash.
    ///
    /// A signature that is valid under the other scheme (PSS versus
    /// PKCS#1 v1.5) fails with `UnsupportedScheme`; every other mismatch is
    /// `PrimitiveFailure`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let hashed = digest(self.options.hash(), data);
        verify_digest(&self.options, self.key, &hashed, signature)
    }
}
