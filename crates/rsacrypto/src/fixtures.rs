//! Test keys shared by the unit tests

use std::sync::OnceLock;

use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::keys::{parse_base64_private_key, parse_base64_public_key};

pub const PKCS8_2048_PRIVATE: &str = include_str!("../testdata/pkcs8_2048_private.b64");
pub const PKIX_2048_PUBLIC: &str = include_str!("../testdata/pkix_2048_public.b64");
pub const PKCS1_1024_PRIVATE: &str = include_str!("../testdata/pkcs1_1024_private.b64");
pub const PKIX_1024_PUBLIC: &str = include_str!("../testdata/pkix_1024_public.b64");

pub struct KeyPair {
    pub private: RsaPrivateKey,
    pub public: RsaPublicKey,
}

/// 2048-bit pair, private key stored as PKCS#8
pub fn pair_2048() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| KeyPair {
        private: parse_base64_private_key(PKCS8_2048_PRIVATE).unwrap(),
        public: parse_base64_public_key(PKIX_2048_PUBLIC).unwrap(),
    })
}

/// 1024-bit pair, private key stored as PKCS#1
pub fn pair_1024() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| KeyPair {
        private: parse_base64_private_key(PKCS1_1024_PRIVATE).unwrap(),
        public: parse_base64_public_key(PKIX_1024_PUBLIC).unwrap(),
    })
}

pub fn pairs() -> [&'static KeyPair; 2] {
    [pair_2048(), pair_1024()]
}

pub fn long_message() -> String {
    "This is a very very long message. 这是一段很长很长的消息。\n".repeat(62)
}

pub fn sample_messages() -> Vec<String> {
    vec![
        String::new(),
        "A short message".to_string(),
        long_message(),
        r#"{"json": "This is a json message", "int": 99, "null": null, "chinese": "这是一段中文。"}"#
            .to_string(),
        "<xml><data>hello xml world!</data></xml>".to_string(),
    ]
}
