//! # Cipher Facade
//!
//! [`BlockCipher`] is the narrow seam to a raw single-block primitive.
//! [`Cipher`] binds a primitive, a [`BlockMode`] and a [`Padding`] and picks
//! the driver for the worker the mode builds: stream workers get
//! [`StreamEncryptor`]/[`StreamDecryptor`], everything else the block
//! drivers.

mod aes;

pub use self::aes::Aes;

use std::fmt;
use std::sync::Arc;

use crate::cryptor::{
    BlockDecryptor, BlockEncryptor, Cryptor, Decryptor, Encryptor, StreamDecryptor,
    StreamEncryptor,
};
use crate::error::{CipherError, Result};
use crate::mode::{BlockMode, Direction, ModeWorker, TagPlacement};
use crate::padding::Padding;

/// A keyed single-block permutation.
pub trait BlockCipher: Send + Sync {
    fn block_size(&self) -> usize;

    /// Encipher one block in place. `block.len() == self.block_size()`.
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decipher one block in place. `block.len() == self.block_size()`.
    fn decrypt_block(&self, block: &mut [u8]);
}

/// Primitive + mode + padding, ready to start sessions.
#[derive(Clone)]
pub struct Cipher {
    primitive: Arc<dyn BlockCipher>,
    mode: Arc<dyn BlockMode>,
    padding: Padding,
}

impl Cipher {
    pub fn new(
        primitive: Arc<dyn BlockCipher>,
        mode: impl BlockMode + 'static,
        padding: Padding,
    ) -> Self {
        Cipher {
            primitive,
            mode: Arc::new(mode),
            padding,
        }
    }

    /// AES with a 16, 24 or 32 byte key.
    pub fn aes(key: &[u8], mode: impl BlockMode + 'static, padding: Padding) -> Result<Self> {
        Ok(Cipher::new(Arc::new(Aes::new(key)?), mode, padding))
    }

    pub fn block_size(&self) -> usize {
        self.primitive.block_size()
    }

    pub fn mode(&self) -> &dyn BlockMode {
        self.mode.as_ref()
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Start an encryption session.
    pub fn make_encryptor(&self) -> Result<Encryptor> {
        let options = self.mode.options();
        let worker = self.mode.worker(self.primitive.clone(), Direction::Encrypt)?;
        log::debug!(
            "{} encryptor on {} driver, padding {}",
            self.mode.name(),
            driver_name(&worker),
            self.padding
        );
        Ok(match worker {
            ModeWorker::Block(w) => Encryptor::Block(BlockEncryptor::new(w, self.padding, options)),
            ModeWorker::Stream(w) => Encryptor::Stream(StreamEncryptor::new(w, self.padding)),
        })
    }

    /// Start a decryption session.
    pub fn make_decryptor(&self) -> Result<Decryptor> {
        let options = self.mode.options();
        let worker = self.mode.worker(self.primitive.clone(), Direction::Decrypt)?;
        log::debug!(
            "{} decryptor on {} driver, padding {}",
            self.mode.name(),
            driver_name(&worker),
            self.padding
        );
        Ok(match worker {
            ModeWorker::Block(w) => Decryptor::Block(BlockDecryptor::new(w, self.padding, options)),
            ModeWorker::Stream(w) => Decryptor::Stream(StreamDecryptor::new(w, self.padding)),
        })
    }

    /// One-shot encryption.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.make_encryptor()?.finish_with(plaintext)
    }

    /// One-shot decryption. For AEAD modes nothing is returned unless the
    /// tag verifies.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.make_decryptor()?.finish_with(ciphertext)
    }

    /// One-shot AEAD encryption returning `(ciphertext, tag)` separately,
    /// whatever the mode's tag placement.
    pub fn encrypt_detached(&self, plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let placement = self
            .mode
            .tag_placement()
            .ok_or(CipherError::Unsupported("detached tag"))?;
        let mut encryptor = self.make_encryptor()?;
        let mut ciphertext = encryptor.finish_with(plaintext)?;
        let tag = encryptor
            .authentication_tag()
            .ok_or(CipherError::MissingAuthenticationTag)?
            .to_vec();
        if placement == TagPlacement::Combined {
            ciphertext.truncate(ciphertext.len().saturating_sub(tag.len()));
        }
        Ok((ciphertext, tag))
    }
}

fn driver_name(worker: &ModeWorker) -> &'static str {
    if worker.is_stream() {
        "stream"
    } else {
        "block"
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("mode", &self.mode.name())
            .field("padding", &self.padding)
            .field("block_size", &self.primitive.block_size())
            .finish()
    }
}
