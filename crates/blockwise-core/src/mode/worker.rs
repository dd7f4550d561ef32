//! # Mode Workers
//!
//! A worker is the per-session state of one block mode bound to one block
//! cipher: the chaining register for CBC/CFB/OFB, the counter for CTR, the
//! GHASH or CBC-MAC accumulator for GCM/CCM. Drivers in [`crate::cryptor`]
//! feed it input and query its optional capabilities at runtime:
//!
//! - block vs stream: encoded in the [`ModeWorker`] variant returned by
//!   [`BlockMode::worker`]
//! - seeking: [`CipherModeWorker::as_seekable`]
//! - finalization hooks: [`CipherModeWorker::as_finalizing_encrypt`] and
//!   [`CipherModeWorker::as_finalizing_decrypt`]

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::cipher::BlockCipher;
use crate::error::{CipherError, Result};

bitflags! {
    /// Static properties of a block mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeOptions: u8 {
        /// Worker construction fails without an IV / nonce.
        const INITIALIZATION_VECTOR_REQUIRED = 1 << 0;
        /// Final data must be block aligned (after padding).
        const PADDING_REQUIRED = 1 << 1;
        /// Decryption only ever calls the primitive's forward direction.
        const USE_ENCRYPT_TO_DECRYPT = 1 << 2;
    }
}

/// Which way the worker will run. AEAD workers reserve trailing tag bytes
/// only when decrypting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Where an AEAD tag travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagPlacement {
    /// `ciphertext || tag`
    #[default]
    Combined,
    /// Ciphertext only; the tag is read from the encryptor and handed to the
    /// decrypting mode up front.
    Detached,
}

/// Per-session mode state.
///
/// Block workers receive exactly one block per call except for the final
/// call of a session, which may be shorter when the mode allows it. Stream
/// workers receive arbitrary lengths.
pub trait CipherModeWorker: Send {
    fn block_size(&self) -> usize;

    /// Trailing bytes the decrypt driver must hold back from `decrypt`
    /// (the combined AEAD tag).
    fn additional_buffer_size(&self) -> usize {
        0
    }

    /// Fails if accepting `len` more bytes would exceed a limit of the
    /// mode. Drivers call it before every `encrypt` / `decrypt`.
    fn reserve_input(&mut self, len: usize) -> Result<()> {
        let _ = len;
        Ok(())
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8>;

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8>;

    fn as_seekable(&mut self) -> Option<&mut dyn SeekableModeWorker> {
        None
    }

    fn as_finalizing_encrypt(&mut self) -> Option<&mut dyn FinalizingEncryptModeWorker> {
        None
    }

    fn as_finalizing_decrypt(&mut self) -> Option<&mut dyn FinalizingDecryptModeWorker> {
        None
    }

    /// Tag computed by a finished AEAD encryption.
    fn authentication_tag(&self) -> Option<&[u8]> {
        None
    }
}

/// Random access into the keystream.
pub trait SeekableModeWorker {
    /// Position the keystream at byte `position` of the message.
    fn seek(&mut self, position: u64) -> Result<()>;
}

/// Hook run once on the output of the last encrypt call.
pub trait FinalizingEncryptModeWorker {
    fn finalize_encrypt(&mut self, ciphertext: Vec<u8>) -> Result<Vec<u8>>;
}

/// Hooks run around the last decrypt call.
pub trait FinalizingDecryptModeWorker {
    /// Receives the withheld trailing bytes before the remaining ciphertext
    /// is decrypted.
    fn will_decrypt_last(&mut self, trailer: &[u8]) -> Result<()>;

    /// Post-processes the final plaintext, verifying the tag.
    fn finalize_decrypt(&mut self, plaintext: Vec<u8>) -> Result<Vec<u8>>;
}

/// A constructed worker, tagged with the driver it needs.
pub enum ModeWorker {
    Block(Box<dyn CipherModeWorker>),
    Stream(Box<dyn CipherModeWorker>),
}

impl ModeWorker {
    pub fn is_stream(&self) -> bool {
        matches!(self, ModeWorker::Stream(_))
    }

    pub fn into_inner(self) -> Box<dyn CipherModeWorker> {
        match self {
            ModeWorker::Block(w) | ModeWorker::Stream(w) => w,
        }
    }
}

impl fmt::Debug for ModeWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeWorker::Block(w) => write!(f, "ModeWorker::Block({} byte)", w.block_size()),
            ModeWorker::Stream(w) => write!(f, "ModeWorker::Stream({} byte)", w.block_size()),
        }
    }
}

/// A block mode configuration that can produce workers.
pub trait BlockMode: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn options(&self) -> ModeOptions;

    /// Where an AEAD mode puts its tag; `None` for unauthenticated modes.
    fn tag_placement(&self) -> Option<TagPlacement> {
        None
    }

    /// Validate the configuration against `cipher` and build a fresh worker.
    fn worker(&self, cipher: Arc<dyn BlockCipher>, direction: Direction) -> Result<ModeWorker>;
}

/// Shared IV check for the chaining modes.
pub(crate) fn check_iv(iv: &[u8], block_size: usize) -> Result<()> {
    if iv.is_empty() {
        return Err(CipherError::MissingInitializationVector);
    }
    if iv.len() != block_size {
        return Err(CipherError::InvalidInitializationVector {
            expected: block_size,
            got: iv.len(),
        });
    }
    Ok(())
}

/// One forward call of the primitive on a copy of `block`.
#[inline]
pub(crate) fn encrypt_copy(cipher: &dyn BlockCipher, block: &[u8]) -> Vec<u8> {
    let mut out = block.to_vec();
    cipher.encrypt_block(&mut out);
    out
}
