//! # GCM
//!
//! Galois/Counter Mode (NIST SP 800-38D). Confidentiality from CTR with a
//! 32-bit counter starting at `inc32(J0)`; integrity from GHASH over
//! `AAD || ciphertext || len(AAD) || len(C)`, masked with `E(J0)`.
//!
//! GHASH is updated incrementally as blocks pass through the worker, so the
//! tag is available as soon as the last block is processed.

use std::sync::Arc;

use super::worker::{
    encrypt_copy, BlockMode, CipherModeWorker, Direction, FinalizingDecryptModeWorker,
    FinalizingEncryptModeWorker, ModeOptions, ModeWorker, TagPlacement,
};
use crate::cipher::BlockCipher;
use crate::constants::{GCM_BLOCK_SIZE, GCM_DEFAULT_TAG_SIZE, GCM_NONCE_SIZE, GCM_TAG_SIZES};
use crate::error::{CipherError, Result};
use crate::util::{constant_time_compare, inc32, secure_zero, xor};

/// GCM configuration.
#[derive(Debug, Clone)]
pub struct Gcm {
    iv: Vec<u8>,
    aad: Vec<u8>,
    tag_length: usize,
    placement: TagPlacement,
    expected_tag: Option<Vec<u8>>,
}

impl Gcm {
    /// Combined placement, 16-byte tag, no AAD.
    pub fn new(iv: impl Into<Vec<u8>>) -> Self {
        Gcm {
            iv: iv.into(),
            aad: Vec::new(),
            tag_length: GCM_DEFAULT_TAG_SIZE,
            placement: TagPlacement::Combined,
            expected_tag: None,
        }
    }

    pub fn with_aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.aad = aad.into();
        self
    }

    pub fn with_tag_length(mut self, tag_length: usize) -> Self {
        self.tag_length = tag_length;
        self
    }

    pub fn with_placement(mut self, placement: TagPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Detached decryption: the tag to verify against.
    pub fn with_authentication_tag(mut self, tag: impl Into<Vec<u8>>) -> Self {
        self.expected_tag = Some(tag.into());
        self.placement = TagPlacement::Detached;
        self
    }

    pub fn tag_length(&self) -> usize {
        self.tag_length
    }

    pub fn placement(&self) -> TagPlacement {
        self.placement
    }
}

impl BlockMode for Gcm {
    fn name(&self) -> &'static str {
        "GCM"
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::INITIALIZATION_VECTOR_REQUIRED | ModeOptions::USE_ENCRYPT_TO_DECRYPT
    }

    fn tag_placement(&self) -> Option<TagPlacement> {
        Some(self.placement)
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, direction: Direction) -> Result<ModeWorker> {
        if cipher.block_size() != GCM_BLOCK_SIZE {
            return Err(CipherError::UnsupportedBlockSize {
                mode: "GCM",
                block_size: cipher.block_size(),
            });
        }
        if self.iv.is_empty() {
            return Err(CipherError::MissingInitializationVector);
        }
        if !GCM_TAG_SIZES.contains(&self.tag_length) {
            return Err(CipherError::InvalidTagLength(self.tag_length));
        }

        let expected_tag = match (direction, self.placement) {
            (Direction::Decrypt, TagPlacement::Detached) => {
                let tag = self
                    .expected_tag
                    .clone()
                    .ok_or(CipherError::MissingAuthenticationTag)?;
                if tag.len() != self.tag_length {
                    return Err(CipherError::InvalidTagLength(tag.len()));
                }
                Some(tag)
            }
            _ => None,
        };

        let h = block_from(&encrypt_copy(cipher.as_ref(), &[0u8; GCM_BLOCK_SIZE]));
        let j0 = if self.iv.len() == GCM_NONCE_SIZE {
            let mut j0 = [0u8; GCM_BLOCK_SIZE];
            j0[..GCM_NONCE_SIZE].copy_from_slice(&self.iv);
            j0[15] = 1;
            j0
        } else {
            let mut ghash = Ghash::new(h, &[]);
            ghash.update(&self.iv);
            ghash.finalize()
        };
        let mut counter = j0;
        inc32(&mut counter);

        log::debug!(
            "GCM worker: {} byte iv, {} byte aad, {} byte tag, {:?}",
            self.iv.len(),
            self.aad.len(),
            self.tag_length,
            self.placement
        );

        Ok(ModeWorker::Block(Box::new(GcmWorker {
            cipher,
            j0,
            counter,
            ghash: Ghash::new(h, &self.aad),
            tag_length: self.tag_length,
            placement: self.placement,
            direction,
            expected_tag,
            tag: None,
        })))
    }
}

fn block_from(bytes: &[u8]) -> [u8; GCM_BLOCK_SIZE] {
    let mut block = [0u8; GCM_BLOCK_SIZE];
    block.copy_from_slice(&bytes[..GCM_BLOCK_SIZE]);
    block
}

// ═══════════════════════════════════════════════════════════════════════════
// GHASH
// ═══════════════════════════════════════════════════════════════════════════

/// Multiplication in GF(2^128) with the GCM bit order (SP 800-38D
/// algorithm 1). Branch-free over the bits of `x`.
fn gf_mult(x: u128, y: u128) -> u128 {
    const R: u128 = 0xe1 << 120;
    let mut z = 0u128;
    let mut v = y;
    for i in 0..128 {
        let bit = (x >> (127 - i)) & 1;
        z ^= v & 0u128.wrapping_sub(bit);
        let lsb = v & 1;
        v = (v >> 1) ^ (R & 0u128.wrapping_sub(lsb));
    }
    z
}

/// Incremental GHASH: AAD at construction, then ciphertext in any split.
pub(crate) struct Ghash {
    h: u128,
    y: u128,
    buffer: [u8; 16],
    buffer_len: usize,
    aad_len: u64,
    data_len: u64,
}

impl Ghash {
    pub(crate) fn new(h: [u8; 16], aad: &[u8]) -> Self {
        let mut ghash = Ghash {
            h: u128::from_be_bytes(h),
            y: 0,
            buffer: [0u8; 16],
            buffer_len: 0,
            aad_len: aad.len() as u64,
            data_len: 0,
        };
        ghash.absorb(aad);
        ghash.flush();
        ghash
    }

    fn block(&mut self, block: &[u8; 16]) {
        self.y = gf_mult(self.y ^ u128::from_be_bytes(*block), self.h);
    }

    fn absorb(&mut self, mut data: &[u8]) {
        if self.buffer_len > 0 {
            let take = data.len().min(16 - self.buffer_len);
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];
            if self.buffer_len == 16 {
                let block = self.buffer;
                self.block(&block);
                self.buffer_len = 0;
            }
        }

        while data.len() >= 16 {
            let mut block = [0u8; 16];
            block.copy_from_slice(&data[..16]);
            self.block(&block);
            data = &data[16..];
        }

        if !data.is_empty() {
            self.buffer[..data.len()].copy_from_slice(data);
            self.buffer_len = data.len();
        }
    }

    /// Zero-pad and absorb a pending partial block.
    fn flush(&mut self) {
        if self.buffer_len > 0 {
            let mut block = [0u8; 16];
            block[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
            self.block(&block);
            self.buffer_len = 0;
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        self.data_len += data.len() as u64;
        self.absorb(data);
    }

    pub(crate) fn finalize(mut self) -> [u8; 16] {
        self.flush();
        let mut lengths = [0u8; 16];
        lengths[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
        lengths[8..].copy_from_slice(&(self.data_len * 8).to_be_bytes());
        self.block(&lengths);
        self.y.to_be_bytes()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKER
// ═══════════════════════════════════════════════════════════════════════════

struct GcmWorker {
    cipher: Arc<dyn BlockCipher>,
    j0: [u8; 16],
    counter: [u8; 16],
    ghash: Ghash,
    tag_length: usize,
    placement: TagPlacement,
    direction: Direction,
    expected_tag: Option<Vec<u8>>,
    tag: Option<Vec<u8>>,
}

impl GcmWorker {
    fn keystream(&mut self) -> Vec<u8> {
        let keystream = encrypt_copy(self.cipher.as_ref(), &self.counter);
        inc32(&mut self.counter);
        keystream
    }

    fn compute_tag(&mut self) -> Vec<u8> {
        let ghash = std::mem::replace(&mut self.ghash, Ghash::new([0u8; 16], &[]));
        let s = ghash.finalize();
        let mask = encrypt_copy(self.cipher.as_ref(), &self.j0);
        let mut tag = xor(&s, &mask);
        tag.truncate(self.tag_length);
        tag
    }
}

impl CipherModeWorker for GcmWorker {
    fn block_size(&self) -> usize {
        GCM_BLOCK_SIZE
    }

    fn additional_buffer_size(&self) -> usize {
        match (self.direction, self.placement) {
            (Direction::Decrypt, TagPlacement::Combined) => self.tag_length,
            _ => 0,
        }
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let keystream = self.keystream();
        let out = xor(block, &keystream);
        self.ghash.update(&out);
        out
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        self.ghash.update(block);
        let keystream = self.keystream();
        xor(block, &keystream)
    }

    fn as_finalizing_encrypt(&mut self) -> Option<&mut dyn FinalizingEncryptModeWorker> {
        Some(self)
    }

    fn as_finalizing_decrypt(&mut self) -> Option<&mut dyn FinalizingDecryptModeWorker> {
        Some(self)
    }

    fn authentication_tag(&self) -> Option<&[u8]> {
        self.tag.as_deref()
    }
}

impl FinalizingEncryptModeWorker for GcmWorker {
    fn finalize_encrypt(&mut self, mut ciphertext: Vec<u8>) -> Result<Vec<u8>> {
        let tag = self.compute_tag();
        if self.placement == TagPlacement::Combined {
            ciphertext.extend_from_slice(&tag);
        }
        self.tag = Some(tag);
        Ok(ciphertext)
    }
}

impl FinalizingDecryptModeWorker for GcmWorker {
    fn will_decrypt_last(&mut self, trailer: &[u8]) -> Result<()> {
        if self.placement == TagPlacement::Combined {
            if trailer.len() != self.tag_length {
                return Err(CipherError::MissingAuthenticationTag);
            }
            self.expected_tag = Some(trailer.to_vec());
        }
        Ok(())
    }

    fn finalize_decrypt(&mut self, mut plaintext: Vec<u8>) -> Result<Vec<u8>> {
        let computed = self.compute_tag();
        let verified = self
            .expected_tag
            .as_deref()
            .is_some_and(|expected| constant_time_compare(expected, &computed));
        if !verified {
            secure_zero(&mut plaintext);
            log::warn!("GCM authentication failed");
            return Err(CipherError::AuthenticationFailed);
        }
        Ok(plaintext)
    }
}
