//! Single-block RSA operations
//!
//! Thin wrappers over the `rsa` crate: one call handles exactly one block or
//! one digest. Failures map to `PrimitiveFailure`, except a signature that
//! verifies under the other signature scheme, which is `UnsupportedScheme`.

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use rsacrypto_core::{HashAlgorithm, Result, RsaCryptoError, Scheme};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

use crate::options::{CipherOptions, SignerOptions};

pub(crate) fn encrypt_block(
    options: &CipherOptions,
    key: &RsaPublicKey,
    chunk: &[u8],
) -> Result<Vec<u8>> {
    let mut rng = rand::thread_rng();
    let result = match options {
        CipherOptions::Pkcs1v15 => key.encrypt(&mut rng, Pkcs1v15Encrypt, chunk),
        CipherOptions::Oaep { hash, label } => key.encrypt(&mut rng, oaep(*hash, label), chunk),
    };
    result.map_err(|e| RsaCryptoError::PrimitiveFailure(format!("encrypt block: {e}")))
}

pub(crate) fn decrypt_block(
    options: &CipherOptions,
    key: &RsaPrivateKey,
    chunk: &[u8],
) -> Result<Vec<u8>> {
    let mut rng = rand::thread_rng();
    let result = match options {
        CipherOptions::Pkcs1v15 => key.decrypt_blinded(&mut rng, Pkcs1v15Encrypt, chunk),
        CipherOptions::Oaep { hash, label } => {
            key.decrypt_blinded(&mut rng, oaep(*hash, label), chunk)
        }
    };
    result.map_err(|e| RsaCryptoError::PrimitiveFailure(format!("decrypt block: {e}")))
}

pub(crate) fn sign_digest(
    options: &SignerOptions,
    key: &RsaPrivateKey,
    digest: &[u8],
) -> Result<Vec<u8>> {
    let mut rng = rand::thread_rng();
    let result = match options {
        SignerOptions::Pkcs1v15 { hash } => {
            key.sign_with_rng(&mut rng, pkcs1v15_sign(*hash), digest)
        }
        SignerOptions::Pss { hash, salt_len } => {
            let salt_len = salt_len.unwrap_or(hash.size());
            key.sign_with_rng(&mut rng, pss(*hash, salt_len), digest)
        }
    };
    result.map_err(|e| RsaCryptoError::PrimitiveFailure(format!("sign digest: {e}")))
}

pub(crate) fn verify_digest(
    options: &SignerOptions,
    key: &RsaPublicKey,
    digest: &[u8],
    signature: &[u8],
) -> Result<()> {
    let result = match options {
        SignerOptions::Pkcs1v15 { hash } => key.verify(pkcs1v15_sign(*hash), digest, signature),
        SignerOptions::Pss { hash, salt_len } => {
            verify_pss(key, *hash, *salt_len, digest, signature)
        }
    };
    let Err(e) = result else {
        return Ok(());
    };
    if let Some(actual) = other_scheme_accepts(options, key, digest, signature) {
        return Err(RsaCryptoError::UnsupportedScheme(format!(
            "signature is {actual}, verifier configured for {}",
            options.scheme()
        )));
    }
    Err(RsaCryptoError::PrimitiveFailure(format!("verify signature: {e}")))
}

/// The other signature scheme, if it accepts `signature` with the same hash.
fn other_scheme_accepts(
    options: &SignerOptions,
    key: &RsaPublicKey,
    digest: &[u8],
    signature: &[u8],
) -> Option<Scheme> {
    match options {
        SignerOptions::Pkcs1v15 { hash } => verify_pss(key, *hash, None, digest, signature)
            .is_ok()
            .then_some(Scheme::Pss),
        SignerOptions::Pss { hash, .. } => key
            .verify(pkcs1v15_sign(*hash), digest, signature)
            .is_ok()
            .then_some(Scheme::Pkcs1v15),
    }
}

/// PSS verification. Without a configured salt length any length is
/// accepted: the digest length and the maximum are tried first, then the rest.
fn verify_pss(
    key: &RsaPublicKey,
    hash: HashAlgorithm,
    salt_len: Option<usize>,
    digest: &[u8],
    signature: &[u8],
) -> rsa::Result<()> {
    if let Some(salt_len) = salt_len {
        return key.verify(pss(hash, salt_len), digest, signature);
    }
    if !has_pss_trailer(key, signature) {
        return Err(rsa::Error::Verification);
    }

    let max = max_pss_salt_len(key, hash);
    let preferred = [hash.size(), max];
    let others = (0..max).filter(|len| !preferred.contains(len));
    let mut result = Err(rsa::Error::Verification);
    for salt_len in preferred.into_iter().chain(others) {
        result = key.verify(pss(hash, salt_len), digest, signature);
        if result.is_ok() {
            break;
        }
    }
    result
}

/// Every PSS encoded message ends in 0xbc.
fn has_pss_trailer(key: &RsaPublicKey, signature: &[u8]) -> bool {
    let em = BigUint::from_bytes_be(signature).modpow(key.e(), key.n());
    em.to_bytes_be().last() == Some(&0xbc)
}

fn max_pss_salt_len(key: &RsaPublicKey, hash: HashAlgorithm) -> usize {
    let em_len = key.n().bits().saturating_sub(1).div_ceil(8);
    em_len.saturating_sub(hash.size() + 2)
}

fn oaep(hash: HashAlgorithm, label: &Option<String>) -> Oaep {
    match (hash, label.clone()) {
        (HashAlgorithm::Sha1, None) => Oaep::new::<Sha1>(),
        (HashAlgorithm::Sha224, None) => Oaep::new::<Sha224>(),
        (HashAlgorithm::Sha256, None) => Oaep::new::<Sha256>(),
        (HashAlgorithm::Sha384, None) => Oaep::new::<Sha384>(),
        (HashAlgorithm::Sha512, None) => Oaep::new::<Sha512>(),
        (HashAlgorithm::Sha1, Some(l)) => Oaep::new_with_label::<Sha1, _>(l),
        (HashAlgorithm::Sha224, Some(l)) => Oaep::new_with_label::<Sha224, _>(l),
        (HashAlgorithm::Sha256, Some(l)) => Oaep::new_with_label::<Sha256, _>(l),
        (HashAlgorithm::Sha384, Some(l)) => Oaep::new_with_label::<Sha384, _>(l),
        (HashAlgorithm::Sha512, Some(l)) => Oaep::new_with_label::<Sha512, _>(l),
    }
}

fn pkcs1v15_sign(hash: HashAlgorithm) -> Pkcs1v15Sign {
    match hash {
        HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        HashAlgorithm::Sha224 => Pkcs1v15Sign::new::<Sha224>(),
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

fn pss(hash: HashAlgorithm, salt_len: usize) -> Pss {
    match hash {
        HashAlgorithm::Sha1 => Pss::new_with_salt::<Sha1>(salt_len),
        HashAlgorithm::Sha224 => Pss::new_with_salt::<Sha224>(salt_len),
        HashAlgorithm::Sha256 => Pss::new_with_salt::<Sha256>(salt_len),
        HashAlgorithm::Sha384 => Pss::new_with_salt::<Sha384>(salt_len),
        HashAlgorithm::Sha512 => Pss::new_with_salt::<Sha512>(salt_len),
    }
}
