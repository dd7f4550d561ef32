//! # CFB
//!
//! Cipher feedback (SP 800-38A section 6.3). Two segment sizes:
//!
//! - `Cfb128`: one full block per primitive call, feedback is the previous
//!   ciphertext block. Runs on the block driver; the final block may be short.
//! - `Cfb8`: one byte per primitive call, the shift register absorbs each
//!   ciphertext byte. Runs on the stream driver.

use std::sync::Arc;

use super::worker::{
    check_iv, encrypt_copy, BlockMode, CipherModeWorker, Direction, ModeOptions, ModeWorker,
};
use crate::cipher::BlockCipher;
use crate::error::Result;
use crate::util::xor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentSize {
    Cfb8,
    #[default]
    Cfb128,
}

#[derive(Debug, Clone)]
pub struct Cfb {
    iv: Vec<u8>,
    segment: SegmentSize,
}

impl Cfb {
    /// Full-block CFB.
    pub fn new(iv: impl Into<Vec<u8>>) -> Self {
        Cfb {
            iv: iv.into(),
            segment: SegmentSize::Cfb128,
        }
    }

    pub fn with_segment_size(iv: impl Into<Vec<u8>>, segment: SegmentSize) -> Self {
        Cfb {
            iv: iv.into(),
            segment,
        }
    }
}

impl BlockMode for Cfb {
    fn name(&self) -> &'static str {
        match self.segment {
            SegmentSize::Cfb8 => "CFB8",
            SegmentSize::Cfb128 => "CFB",
        }
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::INITIALIZATION_VECTOR_REQUIRED | ModeOptions::USE_ENCRYPT_TO_DECRYPT
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, _direction: Direction) -> Result<ModeWorker> {
        check_iv(&self.iv, cipher.block_size())?;
        let register = self.iv.clone();
        Ok(match self.segment {
            SegmentSize::Cfb128 => ModeWorker::Block(Box::new(CfbWorker { cipher, register })),
            SegmentSize::Cfb8 => ModeWorker::Stream(Box::new(Cfb8Worker { cipher, register })),
        })
    }
}

struct CfbWorker {
    cipher: Arc<dyn BlockCipher>,
    register: Vec<u8>,
}

impl CipherModeWorker for CfbWorker {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let keystream = encrypt_copy(self.cipher.as_ref(), &self.register);
        let out = xor(block, &keystream);
        if out.len() == self.register.len() {
            self.register.copy_from_slice(&out);
        }
        out
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let keystream = encrypt_copy(self.cipher.as_ref(), &self.register);
        let out = xor(block, &keystream);
        if block.len() == self.register.len() {
            self.register.copy_from_slice(block);
        }
        out
    }
}

struct Cfb8Worker {
    cipher: Arc<dyn BlockCipher>,
    register: Vec<u8>,
}

impl Cfb8Worker {
    fn shift_in(&mut self, byte: u8) {
        self.register.rotate_left(1);
        if let Some(last) = self.register.last_mut() {
            *last = byte;
        }
    }

    fn keystream_byte(&self) -> u8 {
        encrypt_copy(self.cipher.as_ref(), &self.register)[0]
    }
}

impl CipherModeWorker for Cfb8Worker {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(block.len());
        for &p in block {
            let c = p ^ self.keystream_byte();
            self.shift_in(c);
            out.push(c);
        }
        out
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(block.len());
        for &c in block {
            out.push(c ^ self.keystream_byte());
            self.shift_in(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::testing::ToyCipher;

    #[test]
    fn test_cfb_short_final_block() {
        let mode = Cfb::new([3u8; 8]);
        let mut enc = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();
        let c1 = enc.encrypt(&[1u8; 8]);
        let c2 = enc.encrypt(&[2u8; 5]);
        assert_eq!(c2.len(), 5);

        let mut dec = mode.worker(ToyCipher::shared(), Direction::Decrypt).unwrap().into_inner();
        assert_eq!(dec.decrypt(&c1), vec![1u8; 8]);
        assert_eq!(dec.decrypt(&c2), vec![2u8; 5]);
    }

    #[test]
    fn test_cfb8_is_stream_worker() {
        let mode = Cfb::with_segment_size([3u8; 8], SegmentSize::Cfb8);
        let worker = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap();
        assert!(worker.is_stream());
        assert_eq!(mode.name(), "CFB8");
    }

    #[test]
    fn test_cfb8_byte_granular() {
        let mode = Cfb::with_segment_size([3u8; 8], SegmentSize::Cfb8);
        let data: Vec<u8> = (0u8..21).collect();

        let mut whole = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();
        let expected = whole.encrypt(&data);

        let mut split = mode.worker(ToyCipher::shared(), Direction::Encrypt).unwrap().into_inner();
        let mut got = split.encrypt(&data[..3]);
        got.extend(split.encrypt(&data[3..]));
        assert_eq!(got, expected);

        let mut dec = mode.worker(ToyCipher::shared(), Direction::Decrypt).unwrap().into_inner();
        assert_eq!(dec.decrypt(&expected), data);
    }
}
