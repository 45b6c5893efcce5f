//! Chunked RSA encryption and decryption
//!
//! Ciphertext format (binary):
//! ```text
//! [k bytes: block 0][k bytes: block 1]...[k bytes: block n-1]
//! k = modulus size in bytes
//! ```
//!
//! Each block is one independent RSA encryption of a plaintext chunk of at
//! most `k - 11` (PKCS#1 v1.5) or `k - 2*hLen - 2` (OAEP) bytes. Blocks carry
//! no index or length: decryption relies on every block being exactly `k`
//! bytes and on block order.

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use rsacrypto_core::{Result, RsaCryptoError};
use zeroize::Zeroizing;

use crate::chunk::split;
use crate::options::CipherOptions;
use crate::primitive::{decrypt_block, encrypt_block};

/// Encrypts payloads of any length under one public key.
#[derive(Debug, Clone)]
pub struct RsaEncrypter<'a> {
    key: &'a RsaPublicKey,
    options: CipherOptions,
}

impl<'a> RsaEncrypter<'a> {
    pub fn new(key: &'a RsaPublicKey, options: CipherOptions) -> Self {
        Self { key, options }
    }

    /// Encrypt `plain` chunk by chunk.
    ///
    /// Returns a multiple of the key size; empty input gives empty output.
    pub fn encrypt(&self, plain: &[u8]) -> Result<Vec<u8>> {
        let key_size = self.key.size();
        let limit = self.options.plaintext_limit(key_size)?;
        let chunks = split(plain, limit);
        tracing::debug!(
            scheme = %self.options.scheme(),
            bytes = plain.len(),
            chunks = chunks.len(),
            limit,
            "encrypting"
        );

        let mut cipher = Vec::with_capacity(chunks.len() * key_size);
        for chunk in chunks {
            cipher.extend_from_slice(&encrypt_block(&self.options, self.key, chunk)?);
        }
        Ok(cipher)
    }
}

/// Decrypts payloads produced by [`RsaEncrypter`] with the matching options.
#[derive(Clone)]
pub struct RsaDecrypter<'a> {
    key: &'a RsaPrivateKey,
    options: CipherOptions,
}

impl<'a> RsaDecrypter<'a> {
    pub fn new(key: &'a RsaPrivateKey, options: CipherOptions) -> Self {
        Self { key, options }
    }

    /// Decrypt `cipher` block by block.
    ///
    /// `cipher.len()` must be a multiple of the key size. Any failing block
    /// aborts the whole call and the partial plaintext is wiped.
    pub fn decrypt(&self, cipher: &[u8]) -> Result<Vec<u8>> {
        let key_size = self.key.size();
        if cipher.len() % key_size != 0 {
            return Err(RsaCryptoError::PrimitiveFailure(format!(
                "decrypt block: ciphertext length {} is not a multiple of the {key_size}-byte block size",
                cipher.len()
            )));
        }
        let chunks = split(cipher, key_size);
        tracing::debug!(
            scheme = %self.options.scheme(),
            bytes = cipher.len(),
            chunks = chunks.len(),
            "decrypting"
        );

        let mut plain = Zeroizing::new(Vec::with_capacity(cipher.len()));
        for chunk in chunks {
            let block = Zeroizing::new(decrypt_block(&self.options, self.key, chunk)?);
            plain.extend_from_slice(&block);
        }
        Ok(std::mem::take(&mut *plain))
    }
}

impl std::fmt::Debug for RsaDecrypter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaDecrypter")
            .field("key", &"[REDACTED]")
            .field("options", &self.options)
            .finish()
    }
}
