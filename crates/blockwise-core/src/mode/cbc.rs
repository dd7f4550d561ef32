//! # CBC
//!
//! `C[i] = E(P[i] ^ C[i-1])`, with `C[-1] = IV` (SP 800-38A section 6.2).

use std::sync::Arc;

use super::worker::{check_iv, BlockMode, CipherModeWorker, Direction, ModeOptions, ModeWorker};
use crate::cipher::BlockCipher;
use crate::error::Result;
use crate::util::xor_into;

#[derive(Debug, Clone)]
pub struct Cbc {
    iv: Vec<u8>,
}

impl Cbc {
    pub fn new(iv: impl Into<Vec<u8>>) -> Self {
        Cbc { iv: iv.into() }
    }
}

impl BlockMode for Cbc {
    fn name(&self) -> &'static str {
        "CBC"
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::INITIALIZATION_VECTOR_REQUIRED | ModeOptions::PADDING_REQUIRED
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, _direction: Direction) -> Result<ModeWorker> {
        check_iv(&self.iv, cipher.block_size())?;
        Ok(ModeWorker::Block(Box::new(CbcWorker {
            cipher,
            prev: self.iv.clone(),
        })))
    }
}

struct CbcWorker {
    cipher: Arc<dyn BlockCipher>,
    prev: Vec<u8>,
}

impl CipherModeWorker for CbcWorker {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = block.to_vec();
        xor_into(&mut out, &self.prev);
        self.cipher.encrypt_block(&mut out);
        self.prev.copy_from_slice(&out);
        out
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = block.to_vec();
        self.cipher.decrypt_block(&mut out);
        xor_into(&mut out, &self.prev);
        self.prev.copy_from_slice(block);
        out
    }
}
