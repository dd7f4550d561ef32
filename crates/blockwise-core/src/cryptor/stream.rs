//! Keystream drivers.
//!
//! Without padding every input byte is processed as soon as it arrives
//! (minus the withheld AEAD tag on decrypt). With a padding scheme the
//! drivers fall back to whole blocks so the padded tail lines up.

use zeroize::Zeroizing;

use super::{decrypt_reserve, seek_worker, unpad, Accumulator, Cryptor, CryptorState};
use crate::error::{CipherError, Result};
use crate::mode::CipherModeWorker;
use crate::padding::Padding;

/// Bytes of `pending` that can be processed now.
fn ready_len(pending: usize, reserve: usize, block_size: usize, padding: Padding) -> usize {
    let available = pending.saturating_sub(reserve);
    if padding.is_none() {
        available
    } else {
        available / block_size * block_size
    }
}

pub struct StreamEncryptor {
    worker: Box<dyn CipherModeWorker>,
    padding: Padding,
    accumulator: Accumulator,
    state: CryptorState,
}

impl StreamEncryptor {
    pub(crate) fn new(worker: Box<dyn CipherModeWorker>, padding: Padding) -> Self {
        StreamEncryptor {
            worker,
            padding,
            accumulator: Accumulator::new(),
            state: CryptorState::Ready,
        }
    }

    pub fn authentication_tag(&self) -> Option<&[u8]> {
        self.worker.authentication_tag()
    }
}

impl Cryptor for StreamEncryptor {
    fn update(&mut self, bytes: &[u8], is_last: bool) -> Result<Vec<u8>> {
        self.state.advance(is_last)?;
        let block_size = self.worker.block_size();

        if !is_last {
            if self.padding.is_none() && self.accumulator.is_empty() {
                self.worker.reserve_input(bytes.len())?;
                let out = self.worker.encrypt(bytes);
                log::trace!("stream encrypt: {} in, {} out", bytes.len(), out.len());
                return Ok(out);
            }
            self.accumulator.extend(bytes);
            let ready = ready_len(self.accumulator.len(), 0, block_size, self.padding);
            self.worker.reserve_input(ready)?;
            let out = self.worker.encrypt(&self.accumulator.as_slice()[..ready]);
            self.accumulator.consume(ready);
            log::trace!(
                "stream encrypt: {} in, {} out, {} pending",
                bytes.len(),
                out.len(),
                self.accumulator.len()
            );
            return Ok(out);
        }

        self.accumulator.extend(bytes);
        let tail = Zeroizing::new(self.accumulator.take_all());
        let padded = Zeroizing::new(self.padding.add(&tail, block_size)?);
        self.worker.reserve_input(padded.len())?;
        let mut out = self.worker.encrypt(&padded);
        if let Some(finalizing) = self.worker.as_finalizing_encrypt() {
            out = finalizing.finalize_encrypt(out)?;
        }
        log::trace!("stream encrypt final: {} in, {} out", bytes.len(), out.len());
        Ok(out)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        seek_worker(self.state, &mut *self.worker, &mut self.accumulator, position)
    }

    fn state(&self) -> CryptorState {
        self.state
    }
}

pub struct StreamDecryptor {
    worker: Box<dyn CipherModeWorker>,
    padding: Padding,
    accumulator: Accumulator,
    state: CryptorState,
}

impl StreamDecryptor {
    pub(crate) fn new(worker: Box<dyn CipherModeWorker>, padding: Padding) -> Self {
        StreamDecryptor {
            worker,
            padding,
            accumulator: Accumulator::new(),
            state: CryptorState::Ready,
        }
    }
}

impl Cryptor for StreamDecryptor {
    fn update(&mut self, bytes: &[u8], is_last: bool) -> Result<Vec<u8>> {
        self.state.advance(is_last)?;
        self.accumulator.extend(bytes);
        let block_size = self.worker.block_size();

        if !is_last {
            let reserve = decrypt_reserve(&*self.worker, self.padding);
            let ready = ready_len(self.accumulator.len(), reserve, block_size, self.padding);
            self.worker.reserve_input(ready)?;
            let out = self.worker.decrypt(&self.accumulator.as_slice()[..ready]);
            self.accumulator.consume(ready);
            log::trace!(
                "stream decrypt: {} in, {} out, {} pending",
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
        self.worker.reserve_input(body.len())?;
        let mut out = self.worker.decrypt(body);
        if let Some(finalizing) = self.worker.as_finalizing_decrypt() {
            out = finalizing.finalize_decrypt(out)?;
        }
        let out = unpad(self.padding, out, block_size)?;
        log::trace!("stream decrypt final: {} in, {} out", bytes.len(), out.len());
        Ok(out)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        seek_worker(self.state, &mut *self.worker, &mut self.accumulator, position)
    }

    fn state(&self) -> CryptorState {
        self.state
    }
}
