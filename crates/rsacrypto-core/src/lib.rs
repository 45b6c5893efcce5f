pub mod config;
pub mod error;
pub mod types;

pub use config::CryptoConfig;
pub use error::{DecodeError, Result, RsaCryptoError};
pub use types::{HashAlgorithm, Scheme, TextEncoding};
