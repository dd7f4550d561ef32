//! # ECB
//!
//! Every block is enciphered independently. No IV. Leaks equal plaintext
//! blocks; offered for interoperability.

use std::sync::Arc;

use super::worker::{BlockMode, CipherModeWorker, Direction, ModeOptions, ModeWorker};
use crate::cipher::BlockCipher;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ecb;

impl Ecb {
    pub fn new() -> Self {
        Ecb
    }
}

impl BlockMode for Ecb {
    fn name(&self) -> &'static str {
        "ECB"
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::PADDING_REQUIRED
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, _direction: Direction) -> Result<ModeWorker> {
        Ok(ModeWorker::Block(Box::new(EcbWorker { cipher })))
    }
}

struct EcbWorker {
    cipher: Arc<dyn BlockCipher>,
}

impl CipherModeWorker for EcbWorker {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = block.to_vec();
        self.cipher.encrypt_block(&mut out);
        out
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = block.to_vec();
        self.cipher.decrypt_block(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::testing::ToyCipher;

    #[test]
    fn test_ecb_equal_blocks_equal_output() {
        let mut worker = Ecb.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();
        let a = worker.encrypt(&[7u8; 8]);
        let b = worker.encrypt(&[7u8; 8]);
        assert_eq!(a, b);
        assert_eq!(worker.decrypt(&a), vec![7u8; 8]);
    }
}
