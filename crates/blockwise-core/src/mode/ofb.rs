//! # OFB
//!
//! Output feedback (SP 800-38A section 6.4): the register is enciphered
//! repeatedly and the result XORed with the data. The keystream never
//! depends on plaintext or ciphertext.

use std::sync::Arc;

use super::worker::{check_iv, BlockMode, CipherModeWorker, Direction, ModeOptions, ModeWorker};
use crate::cipher::BlockCipher;
use crate::error::Result;
use crate::util::xor;

#[derive(Debug, Clone)]
pub struct Ofb {
    iv: Vec<u8>,
}

impl Ofb {
    pub fn new(iv: impl Into<Vec<u8>>) -> Self {
        Ofb { iv: iv.into() }
    }
}

impl BlockMode for Ofb {
    fn name(&self) -> &'static str {
        "OFB"
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::INITIALIZATION_VECTOR_REQUIRED | ModeOptions::USE_ENCRYPT_TO_DECRYPT
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, _direction: Direction) -> Result<ModeWorker> {
        check_iv(&self.iv, cipher.block_size())?;
        Ok(ModeWorker::Block(Box::new(OfbWorker {
            cipher,
            register: self.iv.clone(),
        })))
    }
}

struct OfbWorker {
    cipher: Arc<dyn BlockCipher>,
    register: Vec<u8>,
}

impl OfbWorker {
    fn apply(&mut self, block: &[u8]) -> Vec<u8> {
        self.cipher.encrypt_block(&mut self.register);
        xor(block, &self.register)
    }
}

impl CipherModeWorker for OfbWorker {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        self.apply(block)
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        self.apply(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::testing::ToyCipher;

    #[test]
    fn test_ofb_keystream_independent_of_data() {
        let mode = Ofb::new([4u8; 8]);
        let mut a = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();
        let mut b = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();

        let _ = a.encrypt(&[0u8; 8]);
        let _ = b.encrypt(&[0xffu8; 8]);
        // second keystream block is the same regardless of the first input
        assert_eq!(a.encrypt(&[0u8; 8]), b.encrypt(&[0u8; 8]));
    }
}
