//! # blockwise-core
//!
//! Streaming block-cipher mode engine.
//!
//! This crate provides:
//! - Block modes: ECB, CBC, PCBC, CFB/CFB8, OFB, CTR and the AEAD modes GCM
//!   and CCM
//! - Incremental encryptors/decryptors that accept input in arbitrary chunks
//! - Padding schemes (PKCS#7/#5, ISO 10126, ISO 7816-4, zero, PKCS#1 v1.5)
//! - An AES primitive and a [`Cipher`] facade tying it all together
//! - Configuration handling (TOML-based)
//!
//! ```no_run
//! use blockwise_core::{Cipher, Cryptor, Gcm, Padding};
//!
//! # fn main() -> blockwise_core::Result<()> {
//! let cipher = Cipher::aes(&[0u8; 16], Gcm::new([0u8; 12]), Padding::NoPadding)?;
//!
//! let mut enc = cipher.make_encryptor()?;
//! let mut ct = enc.update(b"hello ", false)?;
//! ct.extend(enc.finish_with(b"world")?);
//!
//! assert_eq!(cipher.decrypt(&ct)?, b"hello world");
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod config;
pub mod constants;
pub mod cryptor;
pub mod error;
pub mod mode;
pub mod padding;
pub mod secure;
pub mod util;

// Re-export commonly used types
pub use cipher::{Aes, BlockCipher, Cipher};
pub use config::{CipherConfig, CipherSection, LoggingSection, ModeKind, EXAMPLE_CONFIG, KEY_ENV};
pub use cryptor::{Cryptor, CryptorState, Decryptor, Encryptor};
pub use error::{CipherError, ConfigError, PaddingError, Result};
pub use mode::{
    BlockMode, Cbc, Ccm, Cfb, Ctr, Direction, Ecb, Gcm, ModeOptions, Ofb, Pcbc, SegmentSize,
    TagPlacement,
};
pub use padding::Padding;
pub use secure::SecureBytes;
pub use util::{constant_time_compare, secure_zero};
