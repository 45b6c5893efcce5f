//! Key import, generation, and export
//!
//! Binary keys are parsed by trying each known DER container in a fixed
//! order and keeping the first success:
//!
//! ```text
//! public:  PKIX (SubjectPublicKeyInfo) → PKCS#1 RSAPublicKey
//! private: PKCS#8 PrivateKeyInfo       → PKCS#1 RSAPrivateKey
//! ```
//!
//! If no container matches, the error lists why each one was rejected.
//! Public moduli up to [`MAX_KEY_BITS`] are accepted.

use std::fmt;

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::der::asn1::Null;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, SubjectPublicKeyInfoRef};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use rsacrypto_core::{Result, RsaCryptoError};

use crate::encoding::{Encoding, STD_BASE64};

/// Largest modulus accepted on import or generation
pub const MAX_KEY_BITS: usize = 16384;

/// DER containers for RSA public keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyFormat {
    Pkix,
    Pkcs1,
}

/// DER containers for RSA private keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateKeyFormat {
    Pkcs8,
    Pkcs1,
}

/// Trial order for public keys
pub const PUBLIC_KEY_FORMATS: [PublicKeyFormat; 2] =
    [PublicKeyFormat::Pkix, PublicKeyFormat::Pkcs1];

/// Trial order for private keys
pub const PRIVATE_KEY_FORMATS: [PrivateKeyFormat; 2] =
    [PrivateKeyFormat::Pkcs8, PrivateKeyFormat::Pkcs1];

impl fmt::Display for PublicKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PublicKeyFormat::Pkix => "pkix",
            PublicKeyFormat::Pkcs1 => "pkcs1",
        })
    }
}

impl fmt::Display for PrivateKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrivateKeyFormat::Pkcs8 => "pkcs8",
            PrivateKeyFormat::Pkcs1 => "pkcs1",
        })
    }
}

impl PublicKeyFormat {
    fn parse(self, der: &[u8]) -> std::result::Result<RsaPublicKey, String> {
        let pkcs1 = match self {
            PublicKeyFormat::Pkix => {
                let spki = SubjectPublicKeyInfoRef::try_from(der).map_err(|e| e.to_string())?;
                spki.algorithm
                    .assert_algorithm_oid(rsa::pkcs1::ALGORITHM_OID)
                    .map_err(|e| e.to_string())?;
                if spki.algorithm.parameters_any().map_err(|e| e.to_string())? != Null.into() {
                    return Err("rsaEncryption parameters must be NULL".to_string());
                }
                spki.subject_public_key
                    .as_bytes()
                    .ok_or_else(|| "public key bit string has unused bits".to_string())?
            }
            PublicKeyFormat::Pkcs1 => der,
        };
        let parts = rsa::pkcs1::RsaPublicKey::try_from(pkcs1).map_err(|e| e.to_string())?;
        let n = BigUint::from_bytes_be(parts.modulus.as_bytes());
        let e = BigUint::from_bytes_be(parts.public_exponent.as_bytes());
        RsaPublicKey::new_with_max_size(n, e, MAX_KEY_BITS).map_err(|e| e.to_string())
    }
}

impl PrivateKeyFormat {
    fn parse(self, der: &[u8]) -> std::result::Result<RsaPrivateKey, String> {
        match self {
            PrivateKeyFormat::Pkcs8 => {
                RsaPrivateKey::from_pkcs8_der(der).map_err(|e| e.to_string())
            }
            PrivateKeyFormat::Pkcs1 => {
                RsaPrivateKey::from_pkcs1_der(der).map_err(|e| e.to_string())
            }
        }
    }
}

/// Parse an RSA public key from DER, trying PKIX then PKCS#1.
pub fn parse_public_key_der(der: &[u8]) -> Result<RsaPublicKey> {
    identify_public_key_der(der).map(|(key, _)| key)
}

/// Like [`parse_public_key_der`], also reporting which container matched.
pub fn identify_public_key_der(der: &[u8]) -> Result<(RsaPublicKey, PublicKeyFormat)> {
    let mut failures = Vec::with_capacity(PUBLIC_KEY_FORMATS.len());
    for format in PUBLIC_KEY_FORMATS {
        match format.parse(der) {
            Ok(key) => return Ok((key, format)),
            Err(e) => {
                tracing::debug!(%format, "public key format rejected: {e}");
                failures.push(format!("{format}: {e}"));
            }
        }
    }
    Err(RsaCryptoError::MalformedKeyData(failures))
}

/// Parse an RSA private key from DER, trying PKCS#8 then PKCS#1.
pub fn parse_private_key_der(der: &[u8]) -> Result<RsaPrivateKey> {
    identify_private_key_der(der).map(|(key, _)| key)
}

/// Like [`parse_private_key_der`], also reporting which container matched.
pub fn identify_private_key_der(der: &[u8]) -> Result<(RsaPrivateKey, PrivateKeyFormat)> {
    let mut failures = Vec::with_capacity(PRIVATE_KEY_FORMATS.len());
    for format in PRIVATE_KEY_FORMATS {
        match format.parse(der) {
            Ok(key) => return Ok((key, format)),
            Err(e) => {
                tracing::debug!(%format, "private key format rejected: {e}");
                failures.push(format!("{format}: {e}"));
            }
        }
    }
    Err(RsaCryptoError::MalformedKeyData(failures))
}

/// Decode a text-encoded public key, then parse the DER.
pub fn parse_encoded_public_key(encoded: &str, encoding: &dyn Encoding) -> Result<RsaPublicKey> {
    let der = encoding.decode_string(encoded)?;
    parse_public_key_der(&der)
}

/// Decode a text-encoded private key, then parse the DER.
pub fn parse_encoded_private_key(encoded: &str, encoding: &dyn Encoding) -> Result<RsaPrivateKey> {
    let der = zeroize::Zeroizing::new(encoding.decode_string(encoded)?);
    parse_private_key_der(&der)
}

/// Parse a standard-base64 public key (line breaks allowed).
pub fn parse_base64_public_key(encoded: &str) -> Result<RsaPublicKey> {
    parse_encoded_public_key(encoded, &STD_BASE64)
}

/// Parse a standard-base64 private key (line breaks allowed).
pub fn parse_base64_private_key(encoded: &str) -> Result<RsaPrivateKey> {
    parse_encoded_private_key(encoded, &STD_BASE64)
}

/// Generate a fresh private key with a `bits`-bit modulus.
pub fn generate_private_key(bits: usize) -> Result<RsaPrivateKey> {
    if bits > MAX_KEY_BITS {
        return Err(RsaCryptoError::PrimitiveFailure(format!(
            "key generation: {bits}-bit modulus exceeds the {MAX_KEY_BITS}-bit maximum"
        )));
    }
    let mut rng = rand::thread_rng();
    RsaPrivateKey::new(&mut rng, bits)
        .map_err(|e| RsaCryptoError::PrimitiveFailure(format!("key generation: {e}")))
}

/// Serialize a public key to DER in the given container.
pub fn public_key_to_der(key: &RsaPublicKey, format: PublicKeyFormat) -> Result<Vec<u8>> {
    let der = match format {
        PublicKeyFormat::Pkix => key.to_public_key_der().map_err(|e| e.to_string()),
        PublicKeyFormat::Pkcs1 => key.to_pkcs1_der().map_err(|e| e.to_string()),
    }
    .map_err(|e| RsaCryptoError::MalformedKeyData(vec![format!("{format}: {e}")]))?;
    Ok(der.as_bytes().to_vec())
}

/// Serialize a private key to DER in the given container.
///
/// The returned buffer is zeroized on drop.
pub fn private_key_to_der(
    key: &RsaPrivateKey,
    format: PrivateKeyFormat,
) -> Result<zeroize::Zeroizing<Vec<u8>>> {
    let der = match format {
        PrivateKeyFormat::Pkcs8 => key.to_pkcs8_der().map_err(|e| e.to_string()),
        PrivateKeyFormat::Pkcs1 => key.to_pkcs1_der().map_err(|e| e.to_string()),
    }
    .map_err(|e| RsaCryptoError::MalformedKeyData(vec![format!("{format}: {e}")]))?;
    Ok(zeroize::Zeroizing::new(der.as_bytes().to_vec()))
}
