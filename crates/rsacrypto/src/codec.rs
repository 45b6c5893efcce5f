//! Structured object codecs used by the key handles
//!
//! A codec turns a typed value into the bytes that get encrypted, and back.
//! `JsonCodec` is the default; `TomlCodec` is available for table-shaped
//! values. Custom codecs implement [`ObjectCodec`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use rsacrypto_core::{Result, RsaCryptoError};

pub trait ObjectCodec {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec;

impl ObjectCodec for JsonCodec {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| RsaCryptoError::Codec(format!("json marshal: {e}")))
    }

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        serde_json::from_slice(data)
            .map_err(|e| RsaCryptoError::Codec(format!("json unmarshal: {e}")))
    }
}

impl ObjectCodec for TomlCodec {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        toml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| RsaCryptoError::Codec(format!("toml marshal: {e}")))
    }

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        let text = std::str::from_utf8(data)
            .map_err(|e| RsaCryptoError::Codec(format!("toml unmarshal: {e}")))?;
        toml::from_str(text).map_err(|e| RsaCryptoError::Codec(format!("toml unmarshal: {e}")))
    }
}
