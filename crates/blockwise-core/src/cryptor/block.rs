//! Block-aligned drivers.

use zeroize::Zeroizing;

use super::{decrypt_reserve, seek_worker, unpad, Accumulator, Cryptor, CryptorState};
use crate::error::{CipherError, Result};
use crate::mode::{CipherModeWorker, ModeOptions};
use crate::padding::Padding;

/// Feeds a block worker whole blocks; pads the tail on the last update.
pub struct BlockEncryptor {
    worker: Box<dyn CipherModeWorker>,
    padding: Padding,
    options: ModeOptions,
    accumulator: Accumulator,
    state: CryptorState,
}

impl BlockEncryptor {
    pub(crate) fn new(
        worker: Box<dyn CipherModeWorker>,
        padding: Padding,
        options: ModeOptions,
    ) -> Self {
        BlockEncryptor {
            worker,
            padding,
            options,
            accumulator: Accumulator::new(),
            state: CryptorState::Ready,
        }
    }

    pub fn authentication_tag(&self) -> Option<&[u8]> {
        self.worker.authentication_tag()
    }
}

impl Cryptor for BlockEncryptor {
    fn update(&mut self, bytes: &[u8], is_last: bool) -> Result<Vec<u8>> {
        self.state.advance(is_last)?;
        self.accumulator.extend(bytes);
        let block_size = self.worker.block_size();

        if !is_last {
            let ready = self.accumulator.len() / block_size * block_size;
            self.worker.reserve_input(ready)?;
            let mut out = Vec::with_capacity(ready);
            for block in self.accumulator.as_slice()[..ready].chunks(block_size) {
                out.extend(self.worker.encrypt(block));
            }
            self.accumulator.consume(ready);
            log::trace!(
                "block encrypt: {} in, {} out, {} pending",
                bytes.len(),
                out.len(),
                self.accumulator.len()
            );
            return Ok(out);
        }

        let tail = Zeroizing::new(self.accumulator.take_all());
        let padded = Zeroizing::new(self.padding.add(&tail, block_size)?);
        if self.options.contains(ModeOptions::PADDING_REQUIRED) && padded.len() % block_size != 0 {
            return Err(CipherError::DataPaddingRequired);
        }
        self.worker.reserve_input(padded.len())?;

        let mut out = Vec::with_capacity(padded.len() + block_size);
        for block in padded.chunks(block_size) {
            out.extend(self.worker.encrypt(block));
        }
        if let Some(finalizing) = self.worker.as_finalizing_encrypt() {
            out = finalizing.finalize_encrypt(out)?;
        }
        log::trace!("block encrypt final: {} in, {} out", bytes.len(), out.len());
        Ok(out)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        seek_worker(self.state, &mut *self.worker, &mut self.accumulator, position)
    }

    fn state(&self) -> CryptorState {
        self.state
    }
}

/// Feeds a block worker whole blocks, withholding the tag and the padded
/// block until the last update.
pub struct BlockDecryptor {
    worker: Box<dyn CipherModeWorker>,
    padding: Padding,
    options: ModeOptions,
    accumulator: Accumulator,
    state: CryptorState,
}

impl BlockDecryptor {
    pub(crate) fn new(
        worker: Box<dyn CipherModeWorker>,
        padding: Padding,
        options: ModeOptions,
    ) -> Self {
        BlockDecryptor {
            worker,
            padding,
            options,
            accumulator: Accumulator::new(),
            state: CryptorState::Ready,
        }
    }
}

impl Cryptor for BlockDecryptor {
    fn update(&mut self, bytes: &[u8], is_last: bool) -> Result<Vec<u8>> {
        self.state.advance(is_last)?;
        self.accumulator.extend(bytes);
        let block_size = self.worker.block_size();

        if !is_last {
            let reserve = decrypt_reserve(&*self.worker, self.padding);
            let available = self.accumulator.len().saturating_sub(reserve);
            let ready = available / block_size * block_size;
            self.worker.reserve_input(ready)?;
            let mut out = Vec::with_capacity(ready);
            for block in self.accumulator.as_slice()[..ready].chunks(block_size) {
                out.extend(self.worker.decrypt(block));
            }
            self.accumulator.consume(ready);
            log::trace!(
                "block decrypt: {} in, {} out, {} pending",
                bytes.len(),
                out.len(),
                self.accumulator.len()
            );
            return Ok(out);
        }

        let data = self.accumulator.take_all();
        let tag_length = self.worker.additional_buffer_size();
        if data.len() < tag_length {
            return Err(CipherError::MissingAuthenticationTag);
        }
        let (body, trailer) = data.split_at(data.len() - tag_length);

        if let Some(finalizing) = self.worker.as_finalizing_decrypt() {
            finalizing.will_decrypt_last(trailer)?;
        }
        if self.options.contains(ModeOptions::PADDING_REQUIRED) && body.len() % block_size != 0 {
            return Err(CipherError::DataPaddingRequired);
        }
        self.worker.reserve_input(body.len())?;

        let mut out = Vec::with_capacity(body.len());
        for block in body.chunks(block_size) {
            out.extend(self.worker.decrypt(block));
        }
        if let Some(finalizing) = self.worker.as_finalizing_decrypt() {
            out = finalizing.finalize_decrypt(out)?;
        }
        let out = unpad(self.padding, out, block_size)?;
        log::trace!("block decrypt final: {} in, {} out", bytes.len(), out.len());
        Ok(out)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        seek_worker(self.state, &mut *self.worker, &mut self.accumulator, position)
    }

    fn state(&self) -> CryptorState {
        self.state
    }
}
