//! Text encodings for ciphertexts, signatures, and keys
//!
//! Every adapter implements [`Encoding`]; callers may plug in their own.
//! Base64 decoding skips `\r` and `\n` so line-wrapped keys decode as-is.

use std::borrow::Cow;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use rsacrypto_core::{DecodeError, TextEncoding};

/// Transforms bytes to text and back.
pub trait Encoding: Send + Sync {
    fn encode_to_string(&self, bytes: &[u8]) -> String;

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, DecodeError>;
}

/// Standard-alphabet base64 with padding
#[derive(Debug, Clone, Copy, Default)]
pub struct StdBase64;

/// URL-safe base64 with padding
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlBase64;

/// Lowercase hexadecimal (decoding accepts either case)
#[derive(Debug, Clone, Copy, Default)]
pub struct Hex;

pub const STD_BASE64: StdBase64 = StdBase64;
pub const URL_BASE64: UrlBase64 = UrlBase64;
pub const HEX: Hex = Hex;

impl Encoding for StdBase64 {
    fn encode_to_string(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        STANDARD
            .decode(strip_newlines(s).as_bytes())
            .map_err(|e| DecodeError::new(e.to_string()))
    }
}

impl Encoding for UrlBase64 {
    fn encode_to_string(&self, bytes: &[u8]) -> String {
        URL_SAFE.encode(bytes)
    }

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        URL_SAFE
            .decode(strip_newlines(s).as_bytes())
            .map_err(|e| DecodeError::new(e.to_string()))
    }
}

impl Encoding for Hex {
    fn encode_to_string(&self, bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        hex::decode(s).map_err(|e| DecodeError::new(e.to_string()))
    }
}

impl Encoding for TextEncoding {
    fn encode_to_string(&self, bytes: &[u8]) -> String {
        self.adapter().encode_to_string(bytes)
    }

    fn decode_string(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        self.adapter().decode_string(s)
    }
}

/// Resolve a configured encoding name to its adapter.
pub trait TextEncodingExt {
    fn adapter(&self) -> &'static dyn Encoding;
}

impl TextEncodingExt for TextEncoding {
    fn adapter(&self) -> &'static dyn Encoding {
        match self {
            TextEncoding::Base64 => &STD_BASE64,
            TextEncoding::Base64Url => &URL_BASE64,
            TextEncoding::Hex => &HEX,
        }
    }
}

fn strip_newlines(s: &str) -> Cow<'_, str> {
    if s.contains(['\r', '\n']) {
        Cow::Owned(s.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
    } else {
        Cow::Borrowed(s)
    }
}
