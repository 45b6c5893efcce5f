use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RsaCryptoError;

/// Hash algorithm used for OAEP padding and for message digests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Digest output size in bytes
    pub const fn size(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = RsaCryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha224" => Ok(HashAlgorithm::Sha224),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(RsaCryptoError::config(format_args!(
                "unknown hash algorithm: {s}"
            ))),
        }
    }
}

/// Padding scheme name as it appears in configuration and on the command line.
///
/// Not every scheme applies to every operation: `pss` is signature-only and
/// `oaep` is encryption-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Pkcs1v15,
    Oaep,
    Pss,
}

impl Scheme {
    pub const fn name(self) -> &'static str {
        match self {
            Scheme::Pkcs1v15 => "pkcs1v15",
            Scheme::Oaep => "oaep",
            Scheme::Pss => "pss",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = RsaCryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pkcs1v15" | "pkcs1" => Ok(Scheme::Pkcs1v15),
            "oaep" => Ok(Scheme::Oaep),
            "pss" => Ok(Scheme::Pss),
            _ => Err(RsaCryptoError::UnsupportedScheme(s.to_string())),
        }
    }
}

/// Text encoding used for ciphertexts, signatures, and encoded keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Standard alphabet, padded
    #[default]
    Base64,
    /// URL-safe alphabet, padded
    Base64Url,
    /// Lowercase hexadecimal
    Hex,
}

impl TextEncoding {
    pub const fn name(self) -> &'static str {
        match self {
            TextEncoding::Base64 => "base64",
            TextEncoding::Base64Url => "base64url",
            TextEncoding::Hex => "hex",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = RsaCryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base64" | "std" => Ok(TextEncoding::Base64),
            "base64url" | "url" => Ok(TextEncoding::Base64Url),
            "hex" => Ok(TextEncoding::Hex),
            _ => Err(RsaCryptoError::config(format_args!(
                "unknown text encoding: {s}"
            ))),
        }
    }
}
