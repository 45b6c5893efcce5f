//! Key handles: a key bundled with its options and object codec
//!
//! Handles are configured with consuming `with_*` calls and then used through
//! `&self`, so a configured handle can be shared across threads and reused
//! for any number of operations.
//!
//! ```no_run
//! use rsacrypto::{PrivateKeyHandle, PublicKeyHandle, STD_BASE64};
//! use rsacrypto_core::HashAlgorithm;
//!
//! # fn example(public_b64: &str, private_b64: &str) -> rsacrypto_core::Result<()> {
//! let public = PublicKeyHandle::new()
//!     .with_encoded_key(public_b64, &STD_BASE64)?
//!     .with_signer_hash(HashAlgorithm::Sha256);
//! let private = PrivateKeyHandle::new()
//!     .with_encoded_key(private_b64, &STD_BASE64)?
//!     .with_signer_hash(HashAlgorithm::Sha256);
//!
//! let cipher = public.encrypt_and_encode(b"hello", &STD_BASE64)?;
//! let plain = private.decode_and_decrypt(&cipher, &STD_BASE64)?;
//! assert_eq!(plain, b"hello");
//!
//! let sig = private.sign(b"hello")?;
//! public.verify(b"hello", &sig)?;
//! # Ok(())
//! # }
//! ```

use rsa::{RsaPrivateKey, RsaPublicKey};
use rsacrypto_core::{CryptoConfig, HashAlgorithm, Result, RsaCryptoError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cipher::{RsaDecrypter, RsaEncrypter};
use crate::codec::{JsonCodec, ObjectCodec};
use crate::encoding::Encoding;
use crate::keys::{parse_encoded_private_key, parse_encoded_public_key};
use crate::options::{CipherOptions, SignerOptions};
use crate::sign::{RsaSigner, RsaVerifier};

/// Public half: encrypt and verify.
#[derive(Debug, Clone, Default)]
pub struct PublicKeyHandle<C = JsonCodec> {
    key: Option<RsaPublicKey>,
    encrypter_options: Option<CipherOptions>,
    signer_options: Option<SignerOptions>,
    codec: C,
}

impl PublicKeyHandle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: ObjectCodec> PublicKeyHandle<C> {
    pub fn with_key(mut self, key: RsaPublicKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Decode and parse a text-encoded PKIX or PKCS#1 key.
    pub fn with_encoded_key(mut self, encoded: &str, encoding: &dyn Encoding) -> Result<Self> {
        self.key = Some(parse_encoded_public_key(encoded, encoding)?);
        Ok(self)
    }

    pub fn with_encrypter_options(mut self, options: CipherOptions) -> Self {
        self.encrypter_options = Some(options);
        self
    }

    pub fn with_signer_options(mut self, options: SignerOptions) -> Self {
        self.signer_options = Some(options);
        self
    }

    /// Shorthand for PKCS#1 v1.5 signatures over `hash`.
    pub fn with_signer_hash(self, hash: HashAlgorithm) -> Self {
        self.with_signer_options(SignerOptions::pkcs1v15(hash))
    }

    /// Apply the cipher and signer sections of `config`.
    pub fn with_config(self, config: &CryptoConfig) -> Result<Self> {
        let cipher = CipherOptions::try_from(&config.cipher)?;
        let signer = SignerOptions::try_from(&config.signer)?;
        Ok(self.with_encrypter_options(cipher).with_signer_options(signer))
    }

    pub fn with_codec<D: ObjectCodec>(self, codec: D) -> PublicKeyHandle<D> {
        PublicKeyHandle {
            key: self.key,
            encrypter_options: self.encrypter_options,
            signer_options: self.signer_options,
            codec,
        }
    }

    pub fn key(&self) -> Option<&RsaPublicKey> {
        self.key.as_ref()
    }

    /// Encrypt with the configured options, PKCS#1 v1.5 if none were set.
    pub fn encrypt(&self, plain: &[u8]) -> Result<Vec<u8>> {
        let key = self.key.as_ref().ok_or(RsaCryptoError::MissingKey)?;
        let options = self.encrypter_options.clone().unwrap_or_default();
        RsaEncrypter::new(key, options).encrypt(plain)
    }

    pub fn encrypt_and_encode(&self, plain: &[u8], encoding: &dyn Encoding) -> Result<String> {
        Ok(encoding.encode_to_string(&self.encrypt(plain)?))
    }

    /// Marshal `object` with the handle's codec, then encrypt the bytes.
    pub fn encrypt_object<T: Serialize + ?Sized>(&self, object: &T) -> Result<Vec<u8>> {
        let plain = zeroize::Zeroizing::new(self.codec.marshal(object)?);
        self.encrypt(&plain)
    }

    pub fn encrypt_object_and_encode<T: Serialize + ?Sized>(
        &self,
        object: &T,
        encoding: &dyn Encoding,
    ) -> Result<String> {
        Ok(encoding.encode_to_string(&self.encrypt_object(object)?))
    }

    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let options = self.signer_options.ok_or(RsaCryptoError::MissingSignerOptions)?;
        let key = self.key.as_ref().ok_or(RsaCryptoError::MissingKey)?;
        RsaVerifier::new(key, options).verify(data, signature)
    }

    pub fn decode_and_verify(
        &self,
        data: &[u8],
        signature: &str,
        encoding: &dyn Encoding,
    ) -> Result<()> {
        let signature = encoding.decode_string(signature)?;
        self.verify(data, &signature)
    }
}

/// Private half: decrypt and sign.
#[derive(Clone, Default)]
pub struct PrivateKeyHandle<C = JsonCodec> {
    key: Option<RsaPrivateKey>,
    decrypter_options: Option<CipherOptions>,
    signer_options: Option<SignerOptions>,
    codec: C,
}

impl PrivateKeyHandle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: ObjectCodec> PrivateKeyHandle<C> {
    pub fn with_key(mut self, key: RsaPrivateKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Decode and parse a text-encoded PKCS#8 or PKCS#1 key.
    pub fn with_encoded_key(mut self, encoded: &str, encoding: &dyn Encoding) -> Result<Self> {
        self.key = Some(parse_encoded_private_key(encoded, encoding)?);
        Ok(self)
    }

    pub fn with_decrypter_options(mut self, options: CipherOptions) -> Self {
        self.decrypter_options = Some(options);
        self
    }

    pub fn with_signer_options(mut self, options: SignerOptions) -> Self {
        self.signer_options = Some(options);
        self
    }

    /// Shorthand for PKCS#1 v1.5 signatures over `hash`.
    pub fn with_signer_hash(self, hash: HashAlgorithm) -> Self {
        self.with_signer_options(SignerOptions::pkcs1v15(hash))
    }

    /// Apply the cipher and signer sections of `config`.
    pub fn with_config(self, config: &CryptoConfig) -> Result<Self> {
        let cipher = CipherOptions::try_from(&config.cipher)?;
        let signer = SignerOptions::try_from(&config.signer)?;
        Ok(self.with_decrypter_options(cipher).with_signer_options(signer))
    }

    pub fn with_codec<D: ObjectCodec>(self, codec: D) -> PrivateKeyHandle<D> {
        PrivateKeyHandle {
            key: self.key,
            decrypter_options: self.decrypter_options,
            signer_options: self.signer_options,
            codec,
        }
    }

    pub fn key(&self) -> Option<&RsaPrivateKey> {
        self.key.as_ref()
    }

    /// A public handle for the same key, options, and codec.
    pub fn public_handle(&self) -> PublicKeyHandle<C>
    where
        C: Clone,
    {
        PublicKeyHandle {
            key: self.key.as_ref().map(RsaPrivateKey::to_public_key),
            encrypter_options: self.decrypter_options.clone(),
            signer_options: self.signer_options,
            codec: self.codec.clone(),
        }
    }

    /// Decrypt with the configured options, PKCS#1 v1.5 if none were set.
    pub fn decrypt(&self, cipher: &[u8]) -> Result<Vec<u8>> {
        let key = self.key.as_ref().ok_or(RsaCryptoError::MissingKey)?;
        let options = self.decrypter_options.clone().unwrap_or_default();
        RsaDecrypter::new(key, options).decrypt(cipher)
    }

    pub fn decode_and_decrypt(&self, cipher: &str, encoding: &dyn Encoding) -> Result<Vec<u8>> {
        let cipher = encoding.decode_string(cipher)?;
        self.decrypt(&cipher)
    }

    /// Decrypt, then unmarshal the plaintext with the handle's codec.
    pub fn decrypt_to_object<T: DeserializeOwned>(&self, cipher: &[u8]) -> Result<T> {
        let plain = zeroize::Zeroizing::new(self.decrypt(cipher)?);
        self.codec.unmarshal(&plain)
    }

    pub fn decode_and_decrypt_to_object<T: DeserializeOwned>(
        &self,
        cipher: &str,
        encoding: &dyn Encoding,
    ) -> Result<T> {
        let cipher = encoding.decode_string(cipher)?;
        self.decrypt_to_object(&cipher)
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let options = self.signer_options.ok_or(RsaCryptoError::MissingSignerOptions)?;
        let key = self.key.as_ref().ok_or(RsaCryptoError::MissingKey)?;
        RsaSigner::new(key, options).sign(data)
    }

    pub fn sign_and_encode(&self, data: &[u8], encoding: &dyn Encoding) -> Result<String> {
        Ok(encoding.encode_to_string(&self.sign(data)?))
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for PrivateKeyHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyHandle")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("decrypter_options", &self.decrypter_options)
            .field("signer_options", &self.signer_options)
            .field("codec", &self.codec)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TomlCodec;
    use crate::encoding::{HEX, STD_BASE64, URL_BASE64};
    use crate::fixtures;
    use rsacrypto_core::Scheme;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        mobile: String,
        #[serde(rename = "userName")]
        user_name: String,
    }

    fn handles(pair: &fixtures::KeyPair) -> (PublicKeyHandle, PrivateKeyHandle) {
        (
            PublicKeyHandle::new().with_key(pair.public.clone()),
            PrivateKeyHandle::new().with_key(pair.private.clone()),
        )
    }

    #[test]
    fn test_encrypt_and_encode_each_encoding() {
        let encodings: [&dyn Encoding; 3] = [&STD_BASE64, &URL_BASE64, &HEX];
        for pair in fixtures::pairs() {
            let (public, private) = handles(pair);
            for encoding in encodings {
                let cipher = public.encrypt_and_encode(b"A short message", encoding).unwrap();
                let plain = private.decode_and_decrypt(&cipher, encoding).unwrap();
                assert_eq!(plain, b"A short message");
            }
        }
    }

    #[test]
    fn test_wrong_encoding_fails() {
        let (public, private) = handles(fixtures::pair_1024());
        let cipher = public.encrypt_and_encode(b"A short message", &STD_BASE64).unwrap();

        let result = private.decode_and_decrypt(&cipher, &HEX);
        assert!(matches!(result, Err(RsaCryptoError::TextDecode(_))));

        // the alphabets only disagree when '+' or '/' shows up
        let result = private.decode_and_decrypt(&cipher, &URL_BASE64);
        if cipher.contains(['+', '/']) {
            assert!(matches!(result, Err(RsaCryptoError::TextDecode(_))));
        } else {
            assert_eq!(result.unwrap(), b"A short message");
        }
    }

    #[test]
    fn test_object_roundtrip() {
        let (public, private) = handles(fixtures::pair_2048());
        let user = User {
            mobile: "13800138000".into(),
            user_name: "张三".into(),
        };

        let cipher = public.encrypt_object_and_encode(&user, &STD_BASE64).unwrap();
        let back: User = private.decode_and_decrypt_to_object(&cipher, &STD_BASE64).unwrap();
        assert_eq!(back, user);

        // the default codec is JSON
        let plain = private.decode_and_decrypt(&cipher, &STD_BASE64).unwrap();
        assert_eq!(
            std::str::from_utf8(&plain).unwrap(),
            r#"{"mobile":"13800138000","userName":"张三"}"#
        );
    }

    #[test]
    fn test_custom_codec() {
        let pair = fixtures::pair_1024();
        let public = PublicKeyHandle::new().with_key(pair.public.clone()).with_codec(TomlCodec);
        let private = PrivateKeyHandle::new().with_key(pair.private.clone()).with_codec(TomlCodec);
        let user = User {
            mobile: "1".into(),
            user_name: "toml".into(),
        };

        let cipher = public.encrypt_object(&user).unwrap();
        let back: User = private.decrypt_to_object(&cipher).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_decrypt_into_wrong_type_is_codec_error() {
        let (public, private) = handles(fixtures::pair_1024());
        let cipher = public.encrypt(b"[1, 2, 3]").unwrap();
        let result: Result<User> = private.decrypt_to_object(&cipher);
        assert!(matches!(result, Err(RsaCryptoError::Codec(_))));
    }

    #[test]
    fn test_sign_and_verify_encoded() {
        let pair = fixtures::pair_2048();
        let public = PublicKeyHandle::new()
            .with_key(pair.public.clone())
            .with_signer_hash(HashAlgorithm::Sha256);
        let private = PrivateKeyHandle::new()
            .with_key(pair.private.clone())
            .with_signer_hash(HashAlgorithm::Sha256);

        for msg in fixtures::sample_messages() {
            let sig = private.sign_and_encode(msg.as_bytes(), &HEX).unwrap();
            public.decode_and_verify(msg.as_bytes(), &sig, &HEX).unwrap();
        }
    }

    #[test]
    fn test_missing_key() {
        let public = PublicKeyHandle::new();
        assert!(matches!(public.encrypt(b"x"), Err(RsaCryptoError::MissingKey)));

        let private = PrivateKeyHandle::new().with_signer_hash(HashAlgorithm::Sha1);
        assert!(matches!(private.decrypt(b""), Err(RsaCryptoError::MissingKey)));
        assert!(matches!(private.sign(b"x"), Err(RsaCryptoError::MissingKey)));
    }

    #[test]
    fn test_missing_signer_options() {
        let (public, private) = handles(fixtures::pair_1024());
        assert!(matches!(
            private.sign(b"x"),
            Err(RsaCryptoError::MissingSignerOptions)
        ));
        assert!(matches!(
            public.verify(b"x", &[0u8; 128]),
            Err(RsaCryptoError::MissingSignerOptions)
        ));
        // encryption still defaults to PKCS#1 v1.5
        assert_eq!(public.encrypt(b"x").unwrap().len(), 128);
    }

    #[test]
    fn test_public_handle_from_private() {
        let private = PrivateKeyHandle::new()
            .with_key(fixtures::pair_1024().private.clone())
            .with_decrypter_options(CipherOptions::oaep(HashAlgorithm::Sha256))
            .with_signer_options(SignerOptions::pss(HashAlgorithm::Sha256));
        let public = private.public_handle();

        assert_eq!(public.key(), Some(&fixtures::pair_1024().public));
        let cipher = public.encrypt(b"derived").unwrap();
        assert_eq!(private.decrypt(&cipher).unwrap(), b"derived");
        let sig = private.sign(b"derived").unwrap();
        public.verify(b"derived", &sig).unwrap();
    }

    #[test]
    fn test_handles_from_config() {
        let mut config = CryptoConfig::default();
        config.cipher.scheme = Scheme::Oaep;
        config.cipher.hash = HashAlgorithm::Sha1;
        config.signer.scheme = Scheme::Pss;

        let pair = fixtures::pair_1024();
        let public = PublicKeyHandle::new()
            .with_key(pair.public.clone())
            .with_config(&config)
            .unwrap();
        let private = PrivateKeyHandle::new()
            .with_key(pair.private.clone())
            .with_config(&config)
            .unwrap();

        let cipher = public.encrypt(b"configured").unwrap();
        assert_eq!(private.decrypt(&cipher).unwrap(), b"configured");
        let pkcs = PrivateKeyHandle::new().with_key(pair.private.clone());
        assert!(pkcs.decrypt(&cipher).is_err(), "OAEP ciphertext under PKCS#1 v1.5 must fail");

        config.cipher.scheme = Scheme::Pss;
        let result = PublicKeyHandle::new().with_config(&config);
        assert!(matches!(result, Err(RsaCryptoError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_private_handle_debug_redacts_key() {
        let (_, private) = handles(fixtures::pair_1024());
        let rendered = format!("{private:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("BigUint"));
    }

    #[test]
    fn test_handles_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PublicKeyHandle>();
        assert_send_sync::<PrivateKeyHandle>();

        let (public, private) = handles(fixtures::pair_1024());
        std::thread::scope(|s| {
            for i in 0..4u8 {
                let public = &public;
                let private = &private;
                s.spawn(move || {
                    let msg = vec![i; 200];
                    let cipher = public.encrypt(&msg).unwrap();
                    assert_eq!(private.decrypt(&cipher).unwrap(), msg);
                });
            }
        });
    }
}
