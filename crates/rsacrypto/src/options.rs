//! Padding/hash scheme selection for cipher and signature operations

use rsacrypto_core::config::{CipherConfig, SignerConfig};
use rsacrypto_core::{HashAlgorithm, Result, RsaCryptoError, Scheme};

/// PKCS#1 v1.5 encryption padding overhead in bytes
pub const PKCS1V15_OVERHEAD: usize = 11;

/// Encryption padding. The same value must be used to decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CipherOptions {
    #[default]
    Pkcs1v15,
    Oaep {
        hash: HashAlgorithm,
        label: Option<String>,
    },
}

pub type EncrypterOptions = CipherOptions;
pub type DecrypterOptions = CipherOptions;

impl CipherOptions {
    pub fn oaep(hash: HashAlgorithm) -> Self {
        CipherOptions::Oaep { hash, label: None }
    }

    pub fn oaep_with_label(hash: HashAlgorithm, label: impl Into<String>) -> Self {
        CipherOptions::Oaep {
            hash,
            label: Some(label.into()),
        }
    }

    /// Largest plaintext chunk one RSA block can carry under this padding.
    ///
    /// Fails with `UnsupportedScheme` when the padding alone does not fit in
    /// a `key_size`-byte block.
    pub fn plaintext_limit(&self, key_size: usize) -> Result<usize> {
        let overhead = match self {
            CipherOptions::Pkcs1v15 => PKCS1V15_OVERHEAD,
            CipherOptions::Oaep { hash, .. } => 2 * hash.size() + 2,
        };
        match key_size.checked_sub(overhead) {
            Some(limit) if limit > 0 => Ok(limit),
            _ => Err(RsaCryptoError::UnsupportedScheme(format!(
                "{} needs a modulus larger than {overhead} bytes, key has {key_size}",
                self.describe()
            ))),
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            CipherOptions::Pkcs1v15 => Scheme::Pkcs1v15,
            CipherOptions::Oaep { .. } => Scheme::Oaep,
        }
    }

    fn describe(&self) -> String {
        match self {
            CipherOptions::Pkcs1v15 => "pkcs1v15".to_string(),
            CipherOptions::Oaep { hash, .. } => format!("oaep/{hash}"),
        }
    }
}

impl TryFrom<&CipherConfig> for CipherOptions {
    type Error = RsaCryptoError;

    fn try_from(config: &CipherConfig) -> Result<Self> {
        match config.scheme {
            Scheme::Pkcs1v15 => Ok(CipherOptions::Pkcs1v15),
            Scheme::Oaep => Ok(CipherOptions::Oaep {
                hash: config.hash,
                label: config.label.clone(),
            }),
            other => Err(RsaCryptoError::UnsupportedScheme(format!(
                "{other} is not an encryption scheme"
            ))),
        }
    }
}

/// Signature scheme and the hash applied to the message before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerOptions {
    Pkcs1v15 {
        hash: HashAlgorithm,
    },
    /// `salt_len: None` signs with a digest-length salt and verifies any salt.
    Pss {
        hash: HashAlgorithm,
        salt_len: Option<usize>,
    },
}

impl SignerOptions {
    pub fn pkcs1v15(hash: HashAlgorithm) -> Self {
        SignerOptions::Pkcs1v15 { hash }
    }

    pub fn pss(hash: HashAlgorithm) -> Self {
        SignerOptions::Pss {
            hash,
            salt_len: None,
        }
    }

    /// Hash used to digest the message
    pub fn hash(&self) -> HashAlgorithm {
        match self {
            SignerOptions::Pkcs1v15 { hash } | SignerOptions::Pss { hash, .. } => *hash,
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            SignerOptions::Pkcs1v15 { .. } => Scheme::Pkcs1v15,
            SignerOptions::Pss { .. } => Scheme::Pss,
        }
    }
}

impl TryFrom<&SignerConfig> for SignerOptions {
    type Error = RsaCryptoError;

    fn try_from(config: &SignerConfig) -> Result<Self> {
        match config.scheme {
            Scheme::Pkcs1v15 => Ok(SignerOptions::Pkcs1v15 { hash: config.hash }),
            Scheme::Pss => Ok(SignerOptions::Pss {
                hash: config.hash,
                salt_len: config.salt_len,
            }),
            other => Err(RsaCryptoError::UnsupportedScheme(format!(
                "{other} is not a signature scheme"
            ))),
        }
    }
}
