use thiserror::Error;

pub type Result<T> = std::result::Result<T, RsaCryptoError>;

/// Failure reported by a text encoding adapter while decoding.
///
/// Carries the adapter's own message so it reaches the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum RsaCryptoError {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Every known key container was tried; one message per attempt, in trial order.
    #[error("malformed key data:\n{}", .0.join("\n"))]
    MalformedKeyData(Vec<String>),

    #[error("text decode error: {0}")]
    TextDecode(#[from] DecodeError),

    #[error("no key configured")]
    MissingKey,

    #[error("no signer options configured")]
    MissingSignerOptions,

    #[error("rsa primitive failed: {0}")]
    PrimitiveFailure(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("config error: {0}")]
    Config(String),
}

impl RsaCryptoError {
    pub(crate) fn config(msg: impl std::fmt::Display) -> Self {
        Self::Config(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_key_data_lists_every_attempt() {
        let err = RsaCryptoError::MalformedKeyData(vec![
            "pkix: unexpected tag".to_string(),
            "pkcs1: length mismatch".to_string(),
        ]);
        let msg = err.to_string();
        assert_eq!(
            msg,
            "malformed key data:\npkix: unexpected tag\npkcs1: length mismatch"
        );
    }

    #[test]
    fn decode_error_message_is_verbatim() {
        let err: RsaCryptoError = DecodeError::new("Invalid character 'g' at position 0").into();
        match &err {
            RsaCryptoError::TextDecode(inner) => {
                assert_eq!(inner.message(), "Invalid character 'g' at position 0")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().ends_with("Invalid character 'g' at position 0"));
    }
}
