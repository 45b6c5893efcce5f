use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RsaCryptoError};
use crate::types::{HashAlgorithm, Scheme, TextEncoding};

/// Top-level configuration (loaded from rsacrypto.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    pub cipher: CipherConfig,
    pub signer: SignerConfig,
    pub encoding: EncodingConfig,
    pub log: LogConfig,
}

impl CryptoConfig {
    /// Load configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("config file not found: {}  (using defaults)", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| RsaCryptoError::config(format_args!("reading {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| RsaCryptoError::config(format_args!("parsing {}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(RsaCryptoError::config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(RsaCryptoError::config)
    }
}

/// Encryption/decryption padding settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// "pkcs1v15" (default) or "oaep"
    pub scheme: Scheme,
    /// OAEP hash (ignored for pkcs1v15)
    pub hash: HashAlgorithm,
    /// Optional OAEP label
    pub label: Option<String>,
}

/// Signature settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// "pkcs1v15" (default) or "pss"
    pub scheme: Scheme,
    /// Digest algorithm applied to the whole message
    pub hash: HashAlgorithm,
    /// PSS salt length in bytes (unset: digest length to sign, any to verify)
    pub salt_len: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Encoding for ciphertexts and signatures
    pub output: TextEncoding,
    /// Encoding of key files
    pub key: TextEncoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}
