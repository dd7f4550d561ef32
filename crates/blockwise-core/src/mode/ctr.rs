//! # CTR
//!
//! Counter mode (SP 800-38A section 6.5). The IV is the initial counter
//! block, `nonce || counter`, treated as one big-endian integer that is
//! incremented per block. Keystream is consumed byte by byte so the worker
//! runs on the stream driver and supports random access.

use std::sync::Arc;

use super::worker::{
    check_iv, BlockMode, CipherModeWorker, Direction, ModeOptions, ModeWorker, SeekableModeWorker,
};
use crate::cipher::BlockCipher;
use crate::error::Result;
use crate::util::{add_be, secure_zero};

#[derive(Debug, Clone)]
pub struct Ctr {
    iv: Vec<u8>,
    counter: u64,
}

impl Ctr {
    pub fn new(iv: impl Into<Vec<u8>>) -> Self {
        Ctr {
            iv: iv.into(),
            counter: 0,
        }
    }

    /// Start the keystream `counter` blocks past the IV.
    pub fn with_counter(iv: impl Into<Vec<u8>>, counter: u64) -> Self {
        Ctr {
            iv: iv.into(),
            counter,
        }
    }
}

impl BlockMode for Ctr {
    fn name(&self) -> &'static str {
        "CTR"
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::INITIALIZATION_VECTOR_REQUIRED | ModeOptions::USE_ENCRYPT_TO_DECRYPT
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, _direction: Direction) -> Result<ModeWorker> {
        let block_size = cipher.block_size();
        check_iv(&self.iv, block_size)?;
        let mut worker = CtrWorker {
            cipher,
            iv: self.iv.clone(),
            start: self.counter,
            counter: Vec::new(),
            keystream: vec![0u8; block_size],
            position: block_size,
        };
        worker.reposition(0, 0);
        Ok(ModeWorker::Stream(Box::new(worker)))
    }
}

struct CtrWorker {
    cipher: Arc<dyn BlockCipher>,
    iv: Vec<u8>,
    start: u64,
    /// Counter block for the next keystream refill.
    counter: Vec<u8>,
    keystream: Vec<u8>,
    /// Bytes of `keystream` already used; `block_size` means exhausted.
    position: usize,
}

impl CtrWorker {
    /// Point the counter at keystream block `block` and skip `offset` bytes
    /// into it.
    fn reposition(&mut self, block: u64, offset: usize) {
        self.counter.clone_from(&self.iv);
        add_be(&mut self.counter, self.start);
        add_be(&mut self.counter, block);
        if offset == 0 {
            self.position = self.keystream.len();
        } else {
            self.refill();
            self.position = offset;
        }
    }

    fn refill(&mut self) {
        self.keystream.copy_from_slice(&self.counter);
        self.cipher.encrypt_block(&mut self.keystream);
        add_be(&mut self.counter, 1);
        self.position = 0;
    }

    fn apply(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        for &byte in data {
            if self.position == self.keystream.len() {
                self.refill();
            }
            out.push(byte ^ self.keystream[self.position]);
            self.position += 1;
        }
        out
    }
}

impl CipherModeWorker for CtrWorker {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        self.apply(block)
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        self.apply(block)
    }

    fn as_seekable(&mut self) -> Option<&mut dyn SeekableModeWorker> {
        Some(self)
    }
}

impl SeekableModeWorker for CtrWorker {
    fn seek(&mut self, position: u64) -> Result<()> {
        let block_size = self.keystream.len() as u64;
        self.reposition(position / block_size, (position % block_size) as usize);
        Ok(())
    }
}

impl Drop for CtrWorker {
    fn drop(&mut self) {
        secure_zero(&mut self.keystream);
    }
}
