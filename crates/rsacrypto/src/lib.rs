//! rsacrypto: chunked RSA encryption, signing, and key import
//!
//! Architecture: Chunk-then-Encrypt with raw RSA blocks
//!
//! Pipeline: object → codec marshal → split into chunks → RSA encrypt each → concatenate → text encode
//!
//! Block sizes for a k-byte modulus:
//! ```text
//! PKCS#1 v1.5 encrypt   chunk ≤ k - 11          block = k
//! OAEP(hash)            chunk ≤ k - 2*hLen - 2  block = k
//! PKCS#1 v1.5 / PSS sig digest(message)         signature = k
//! ```
//!
//! Keys are accepted as PKIX or PKCS#1 (public) and PKCS#8 or PKCS#1 (private),
//! in any of the text encodings from [`encoding`].

pub mod chunk;
pub mod cipher;
pub mod codec;
pub mod digest;
pub mod encoding;
pub mod handle;
pub mod keys;
pub mod options;
pub mod sign;

mod primitive;

#[cfg(test)]
mod fixtures;

pub use cipher::{RsaDecrypter, RsaEncrypter};
pub use codec::{JsonCodec, ObjectCodec, TomlCodec};
pub use encoding::{Encoding, TextEncodingExt, HEX, STD_BASE64, URL_BASE64};
pub use handle::{PrivateKeyHandle, PublicKeyHandle};
pub use keys::{
    generate_private_key, identify_private_key_der, identify_public_key_der,
    parse_base64_private_key, parse_base64_public_key,
    parse_encoded_private_key, parse_encoded_public_key, parse_private_key_der,
    parse_public_key_der, private_key_to_der, public_key_to_der, PrivateKeyFormat,
    PublicKeyFormat, MAX_KEY_BITS,
};
pub use options::{CipherOptions, DecrypterOptions, EncrypterOptions, SignerOptions};
pub use sign::{RsaSigner, RsaVerifier};

pub use rsa::{RsaPrivateKey, RsaPublicKey};

/// Default modulus size for generated keys
pub const DEFAULT_KEY_BITS: usize = 2048;
