//! # Encryptors and Decryptors
//!
//! Incremental drivers that feed a mode worker from arbitrary input chunks.
//!
//! ```text
//! Ready --update(false)--> Updating --update(false)--> Updating
//!   \                          \
//!    `--update(true)--> Finished <--update(true)--'
//! ```
//!
//! - [`BlockEncryptor`] / [`BlockDecryptor`] hand the worker one block at a
//!   time, pad on the last encrypt and unpad on the last decrypt.
//! - [`StreamEncryptor`] / [`StreamDecryptor`] hand the worker whatever is
//!   available and support `seek` on seekable workers.
//!
//! Decryptors hold back the worker's `additional_buffer_size` trailing bytes
//! (the combined AEAD tag) and, with a padding scheme, the last block, so
//! that output does not depend on how the input was split.
//!
//! AEAD decryptors emit plaintext from non-final updates before the tag has
//! been checked. Callers that must not act on unverified data should use the
//! one-shot [`crate::Cipher::decrypt`], or discard everything if the final
//! update fails.

mod accumulator;
mod block;
mod stream;

pub use block::{BlockDecryptor, BlockEncryptor};
pub use stream::{StreamDecryptor, StreamEncryptor};

use accumulator::Accumulator;

use crate::error::{CipherError, Result};
use crate::mode::CipherModeWorker;
use crate::padding::Padding;

/// Position in the update protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CryptorState {
    #[default]
    Ready,
    Updating,
    Finished,
}

impl CryptorState {
    /// Move to the state after an `update(.., is_last)` call.
    pub(crate) fn advance(&mut self, is_last: bool) -> Result<()> {
        if *self == CryptorState::Finished {
            return Err(CipherError::Finalized);
        }
        *self = if is_last {
            CryptorState::Finished
        } else {
            CryptorState::Updating
        };
        Ok(())
    }
}

/// Incremental encryption or decryption session.
pub trait Cryptor {
    /// Process `bytes` and return whatever output is ready. With
    /// `is_last = true` the session is finalized: padding is applied or
    /// removed and AEAD tags are produced or verified.
    fn update(&mut self, bytes: &[u8], is_last: bool) -> Result<Vec<u8>>;

    fn finish(&mut self) -> Result<Vec<u8>> {
        self.update(&[], true)
    }

    fn finish_with(&mut self, bytes: &[u8]) -> Result<Vec<u8>> {
        self.update(bytes, true)
    }

    /// Reposition to byte `position` of the message. Only seekable workers
    /// support this; pending input is discarded.
    fn seek(&mut self, position: u64) -> Result<()>;

    fn state(&self) -> CryptorState;
}

/// Shared `seek` for all drivers.
pub(crate) fn seek_worker(
    state: CryptorState,
    worker: &mut dyn CipherModeWorker,
    accumulator: &mut Accumulator,
    position: u64,
) -> Result<()> {
    if state == CryptorState::Finished {
        return Err(CipherError::Finalized);
    }
    let seekable = worker
        .as_seekable()
        .ok_or(CipherError::Unsupported("seek"))?;
    seekable.seek(position)?;
    accumulator.clear();
    log::trace!("seek to {}", position);
    Ok(())
}

/// Bytes a decryptor keeps back between non-final updates.
pub(crate) fn decrypt_reserve(worker: &dyn CipherModeWorker, padding: Padding) -> usize {
    worker.additional_buffer_size() + usize::from(!padding.is_none())
}

/// Strip padding from final plaintext, scrubbing it on failure.
pub(crate) fn unpad(padding: Padding, mut plaintext: Vec<u8>, block_size: usize) -> Result<Vec<u8>> {
    if padding.is_none() {
        return Ok(plaintext);
    }
    let result = padding.remove(&plaintext, Some(block_size));
    crate::util::secure_zero(&mut plaintext);
    result.map_err(|err| {
        log::warn!("{} padding rejected on decrypt", padding);
        err.into()
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// DRIVER SELECTION
// ═══════════════════════════════════════════════════════════════════════════

/// An encrypting session on the driver its worker needs.
pub enum Encryptor {
    Block(BlockEncryptor),
    Stream(StreamEncryptor),
}

/// A decrypting session on the driver its worker needs.
pub enum Decryptor {
    Block(BlockDecryptor),
    Stream(StreamDecryptor),
}

impl Encryptor {
    /// Tag produced by a finished AEAD encryption; the only way to obtain it
    /// with detached placement.
    pub fn authentication_tag(&self) -> Option<&[u8]> {
        match self {
            Encryptor::Block(e) => e.authentication_tag(),
            Encryptor::Stream(e) => e.authentication_tag(),
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Encryptor::Stream(_))
    }
}

impl Decryptor {
    pub fn is_stream(&self) -> bool {
        matches!(self, Decryptor::Stream(_))
    }
}

impl Cryptor for Encryptor {
    fn update(&mut self, bytes: &[u8], is_last: bool) -> Result<Vec<u8>> {
        match self {
            Encryptor::Block(e) => e.update(bytes, is_last),
            Encryptor::Stream(e) => e.update(bytes, is_last),
        }
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        match self {
            Encryptor::Block(e) => e.seek(position),
            Encryptor::Stream(e) => e.seek(position),
        }
    }

    fn state(&self) -> CryptorState {
        match self {
            Encryptor::Block(e) => e.state(),
            Encryptor::Stream(e) => e.state(),
        }
    }
}

impl Cryptor for Decryptor {
    fn update(&mut self, bytes: &[u8], is_last: bool) -> Result<Vec<u8>> {
        match self {
            Decryptor::Block(d) => d.update(bytes, is_last),
            Decryptor::Stream(d) => d.update(bytes, is_last),
        }
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        match self {
            Decryptor::Block(d) => d.seek(position),
            Decryptor::Stream(d) => d.seek(position),
        }
    }

    fn state(&self) -> CryptorState {
        match self {
            Decryptor::Block(d) => d.state(),
            Decryptor::Stream(d) => d.state(),
        }
    }
}
