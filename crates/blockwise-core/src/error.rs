//! # Error Module
//!
//! Error types for padding, mode construction, the incremental drivers and
//! configuration loading.

use thiserror::Error;

/// Padding could not be added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaddingError {
    /// Trailing bytes do not form a valid padding for the scheme.
    #[error("invalid padding value")]
    InvalidPaddingValue,
    /// Message does not fit into a PKCS#1 encoded block.
    #[error("message too long for padding: max {max} bytes, got {got}")]
    MessageTooLong { max: usize, got: usize },
    /// The scheme cannot pad to this block size (zero, or too large for a
    /// one-byte pad length).
    #[error("padding does not support a {0} byte block")]
    UnsupportedBlockSize(usize),
}

/// Errors produced by cipher modes and the encryptor/decryptor drivers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("initialization vector required but not provided")]
    MissingInitializationVector,
    #[error("invalid initialization vector length: expected {expected}, got {got}")]
    InvalidInitializationVector { expected: usize, got: usize },
    #[error("invalid key length: {got} bytes")]
    InvalidKeyLength { got: usize },
    #[error("invalid authentication tag length: {0}")]
    InvalidTagLength(usize),
    #[error("invalid nonce length: expected {min}..={max}, got {got}")]
    InvalidNonceLength { min: usize, max: usize, got: usize },
    #[error("message length must be declared before encoding")]
    MissingMessageLength,
    #[error("message length mismatch: declared {expected}, processed {got}")]
    InvalidMessageLength { expected: usize, got: usize },
    #[error("{mode} does not support a {block_size}-byte block cipher")]
    UnsupportedBlockSize {
        mode: &'static str,
        block_size: usize,
    },
    /// Final data is not block aligned and the mode cannot handle a short block.
    #[error("data must be padded to a multiple of the block size")]
    DataPaddingRequired,
    /// AEAD tag did not verify.
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("authentication tag missing from input")]
    MissingAuthenticationTag,
    /// Operation not offered by this worker, e.g. `seek` on a chaining mode.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
    /// `update` or `seek` called after the session was finished.
    #[error("cryptor already finalized")]
    Finalized,
    #[error(transparent)]
    Padding(#[from] PaddingError),
}

/// Errors loading a cipher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid hex in `{field}`: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },
    #[error("no key provided (use key, key_file, or BLOCKWISE_KEY env)")]
    MissingKey,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

pub type Result<T> = std::result::Result<T, CipherError>;
