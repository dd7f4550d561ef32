//! # PCBC
//!
//! Propagating CBC: `C[i] = E(P[i] ^ P[i-1] ^ C[i-1])`, seeded with the IV.
//! A corrupted ciphertext block garbles every block after it.

use std::sync::Arc;

use super::worker::{check_iv, BlockMode, CipherModeWorker, Direction, ModeOptions, ModeWorker};
use crate::cipher::BlockCipher;
use crate::error::Result;
use crate::util::{xor, xor_into};

#[derive(Debug, Clone)]
pub struct Pcbc {
    iv: Vec<u8>,
}

impl Pcbc {
    pub fn new(iv: impl Into<Vec<u8>>) -> Self {
        Pcbc { iv: iv.into() }
    }
}

impl BlockMode for Pcbc {
    fn name(&self) -> &'static str {
        "PCBC"
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::INITIALIZATION_VECTOR_REQUIRED | ModeOptions::PADDING_REQUIRED
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, _direction: Direction) -> Result<ModeWorker> {
        check_iv(&self.iv, cipher.block_size())?;
        Ok(ModeWorker::Block(Box::new(PcbcWorker {
            cipher,
            feedback: self.iv.clone(),
        })))
    }
}

struct PcbcWorker {
    cipher: Arc<dyn BlockCipher>,
    feedback: Vec<u8>,
}

impl CipherModeWorker for PcbcWorker {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = xor(block, &self.feedback);
        self.cipher.encrypt_block(&mut out);
        self.feedback = xor(block, &out);
        out
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = block.to_vec();
        self.cipher.decrypt_block(&mut out);
        xor_into(&mut out, &self.feedback);
        self.feedback = xor(&out, block);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::testing::ToyCipher;

    #[test]
    fn test_pcbc_roundtrip() {
        let mode = Pcbc::new([9u8; 8]);
        let blocks: Vec<[u8; 8]> = vec![[1; 8], [2; 8], [3; 8]];

        let mut enc = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();
        let cts: Vec<Vec<u8>> = blocks.iter().map(|b| enc.encrypt(b)).collect();

        let mut dec = mode.worker(ToyCipher::shared(), Direction::Decrypt).unwrap().into_inner();
        for (ct, pt) in cts.iter().zip(&blocks) {
            assert_eq!(&dec.decrypt(ct), pt);
        }
    }

    #[test]
    fn test_pcbc_error_propagates() {
        let mode = Pcbc::new([9u8; 8]);
        let mut enc = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();
        let mut cts: Vec<Vec<u8>> = (1u8..=4).map(|i| enc.encrypt(&[i; 8])).collect();
        cts[1][0] ^= 0x01;

        let mut dec = mode.worker(ToyCipher::shared(), Direction::Decrypt).unwrap().into_inner();
        let pts: Vec<Vec<u8>> = cts.iter().map(|c| dec.decrypt(c)).collect();
        assert_eq!(pts[0], vec![1u8; 8]);
        assert_ne!(pts[2], vec![3u8; 8]);
        assert_ne!(pts[3], vec![4u8; 8]);
    }
}
