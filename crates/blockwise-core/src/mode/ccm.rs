//! # CCM
//!
//! Counter with CBC-MAC (NIST SP 800-38C). The tag is a CBC-MAC over the
//! formatted block `B0`, the length-prefixed AAD and the plaintext; both the
//! payload and the tag are encrypted with a CTR keystream whose counter
//! blocks are `flags || N || [i]_q`.
//!
//! `B0` encodes the total message length, so it has to be declared up front
//! with [`Ccm::with_message_length`]. The worker runs on the stream driver
//! and is not seekable: the MAC depends on every byte in order.

use std::sync::Arc;

use super::worker::{
    encrypt_copy, BlockMode, CipherModeWorker, Direction, FinalizingDecryptModeWorker,
    FinalizingEncryptModeWorker, ModeOptions, ModeWorker, TagPlacement,
};
use crate::cipher::BlockCipher;
use crate::constants::{CCM_BLOCK_SIZE, CCM_NONCE_MAX, CCM_NONCE_MIN, CCM_TAG_SIZES};
use crate::error::{CipherError, Result};
use crate::util::{add_be, constant_time_compare, secure_zero, xor, xor_into};

/// CCM configuration.
#[derive(Debug, Clone)]
pub struct Ccm {
    nonce: Vec<u8>,
    aad: Vec<u8>,
    tag_length: usize,
    message_length: Option<usize>,
    placement: TagPlacement,
    expected_tag: Option<Vec<u8>>,
}

impl Ccm {
    pub fn new(nonce: impl Into<Vec<u8>>, tag_length: usize) -> Self {
        Ccm {
            nonce: nonce.into(),
            aad: Vec::new(),
            tag_length,
            message_length: None,
            placement: TagPlacement::Combined,
            expected_tag: None,
        }
    }

    /// Plaintext length in bytes, excluding any tag.
    pub fn with_message_length(mut self, message_length: usize) -> Self {
        self.message_length = Some(message_length);
        self
    }

    pub fn with_aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.aad = aad.into();
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

impl BlockMode for Ccm {
    fn name(&self) -> &'static str {
        "CCM"
    }

    fn options(&self) -> ModeOptions {
        ModeOptions::INITIALIZATION_VECTOR_REQUIRED | ModeOptions::USE_ENCRYPT_TO_DECRYPT
    }

    fn tag_placement(&self) -> Option<TagPlacement> {
        Some(self.placement)
    }

    fn worker(&self, cipher: Arc<dyn BlockCipher>, direction: Direction) -> Result<ModeWorker> {
        if cipher.block_size() != CCM_BLOCK_SIZE {
            return Err(CipherError::UnsupportedBlockSize {
                mode: "CCM",
                block_size: cipher.block_size(),
            });
        }
        if self.nonce.is_empty() {
            return Err(CipherError::MissingInitializationVector);
        }
        if !(CCM_NONCE_MIN..=CCM_NONCE_MAX).contains(&self.nonce.len()) {
            return Err(CipherError::InvalidNonceLength {
                min: CCM_NONCE_MIN,
                max: CCM_NONCE_MAX,
                got: self.nonce.len(),
            });
        }
        if !CCM_TAG_SIZES.contains(&self.tag_length) {
            return Err(CipherError::InvalidTagLength(self.tag_length));
        }
        let message_length = self.message_length.ok_or(CipherError::MissingMessageLength)?;

        let q = 15 - self.nonce.len();
        let max_length = if q >= 8 { u64::MAX } else { (1u64 << (8 * q)) - 1 };
        if message_length as u64 > max_length {
            return Err(CipherError::InvalidMessageLength {
                expected: max_length as usize,
                got: message_length,
            });
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

        // B0 = flags || N || Q
        let mut b0 = [0u8; CCM_BLOCK_SIZE];
        b0[0] = (u8::from(!self.aad.is_empty()) << 6)
            | ((((self.tag_length - 2) / 2) as u8) << 3)
            | (q as u8 - 1);
        b0[1..=self.nonce.len()].copy_from_slice(&self.nonce);
        let length_bytes = (message_length as u64).to_be_bytes();
        b0[16 - q..].copy_from_slice(&length_bytes[8 - q..]);

        let mut mac = CbcMac::new(cipher.clone());
        mac.absorb(&b0);
        if !self.aad.is_empty() {
            mac.absorb(&encode_aad_length(self.aad.len()));
            mac.absorb(&self.aad);
            mac.flush();
        }

        // Ctr0 = flags || N || 0
        let mut ctr0 = [0u8; CCM_BLOCK_SIZE];
        ctr0[0] = q as u8 - 1;
        ctr0[1..=self.nonce.len()].copy_from_slice(&self.nonce);
        let s0 = encrypt_copy(cipher.as_ref(), &ctr0);

        log::debug!(
            "CCM worker: {} byte nonce, {} byte aad, {} byte tag, message length {}",
            self.nonce.len(),
            self.aad.len(),
            self.tag_length,
            message_length
        );

        Ok(ModeWorker::Stream(Box::new(CcmWorker {
            cipher,
            mac,
            ctr0,
            q,
            block_index: 1,
            keystream: [0u8; CCM_BLOCK_SIZE],
            position: CCM_BLOCK_SIZE,
            s0,
            tag_length: self.tag_length,
            message_length,
            processed: 0,
            placement: self.placement,
            direction,
            expected_tag,
            tag: None,
        })))
    }
}

/// AAD length prefix, SP 800-38C appendix A.2.2.
fn encode_aad_length(len: usize) -> Vec<u8> {
    let len = len as u64;
    if len < 0xff00 {
        (len as u16).to_be_bytes().to_vec()
    } else if len <= u64::from(u32::MAX) {
        let mut out = vec![0xff, 0xfe];
        out.extend_from_slice(&(len as u32).to_be_bytes());
        out
    } else {
        let mut out = vec![0xff, 0xff];
        out.extend_from_slice(&len.to_be_bytes());
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CBC-MAC
// ═══════════════════════════════════════════════════════════════════════════

struct CbcMac {
    cipher: Arc<dyn BlockCipher>,
    state: [u8; CCM_BLOCK_SIZE],
    buffer: Vec<u8>,
}

impl CbcMac {
    fn new(cipher: Arc<dyn BlockCipher>) -> Self {
        CbcMac {
            cipher,
            state: [0u8; CCM_BLOCK_SIZE],
            buffer: Vec::with_capacity(CCM_BLOCK_SIZE),
        }
    }

    fn absorb(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = data.len().min(CCM_BLOCK_SIZE - self.buffer.len());
            self.buffer.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.buffer.len() == CCM_BLOCK_SIZE {
                self.chain();
            }
        }
    }

    fn chain(&mut self) {
        xor_into(&mut self.state, &self.buffer);
        self.cipher.encrypt_block(&mut self.state);
        self.buffer.clear();
    }

    /// Zero-pad a pending partial block and absorb it.
    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer.resize(CCM_BLOCK_SIZE, 0);
            self.chain();
        }
    }

    fn finalize(&mut self) -> [u8; CCM_BLOCK_SIZE] {
        self.flush();
        self.state
    }
}

impl Drop for CbcMac {
    fn drop(&mut self) {
        secure_zero(&mut self.state);
        secure_zero(&mut self.buffer);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKER
// ═══════════════════════════════════════════════════════════════════════════

struct CcmWorker {
    cipher: Arc<dyn BlockCipher>,
    mac: CbcMac,
    ctr0: [u8; CCM_BLOCK_SIZE],
    /// Width of the counter field at the end of each counter block.
    q: usize,
    /// Counter index of the next keystream block.
    block_index: u64,
    keystream: [u8; CCM_BLOCK_SIZE],
    position: usize,
    s0: Vec<u8>,
    tag_length: usize,
    message_length: usize,
    processed: usize,
    placement: TagPlacement,
    direction: Direction,
    expected_tag: Option<Vec<u8>>,
    tag: Option<Vec<u8>>,
}

impl CcmWorker {
    fn apply(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        for &byte in data {
            if self.position == CCM_BLOCK_SIZE {
                self.keystream = self.ctr0;
                // Never carries into the nonce: the declared length caps the index.
                add_be(&mut self.keystream[CCM_BLOCK_SIZE - self.q..], self.block_index);
                self.cipher.encrypt_block(&mut self.keystream);
                self.block_index += 1;
                self.position = 0;
            }
            out.push(byte ^ self.keystream[self.position]);
            self.position += 1;
        }
        self.processed += data.len();
        out
    }

    fn compute_tag(&mut self) -> Result<Vec<u8>> {
        if self.processed != self.message_length {
            return Err(CipherError::InvalidMessageLength {
                expected: self.message_length,
                got: self.processed,
            });
        }
        let mac = self.mac.finalize();
        let mut tag = xor(&mac, &self.s0);
        tag.truncate(self.tag_length);
        Ok(tag)
    }
}

impl CipherModeWorker for CcmWorker {
    fn block_size(&self) -> usize {
        CCM_BLOCK_SIZE
    }

    fn additional_buffer_size(&self) -> usize {
        match (self.direction, self.placement) {
            (Direction::Decrypt, TagPlacement::Combined) => self.tag_length,
            _ => 0,
        }
    }

    fn reserve_input(&mut self, len: usize) -> Result<()> {
        match self.processed.checked_add(len) {
            Some(total) if total <= self.message_length => Ok(()),
            total => Err(CipherError::InvalidMessageLength {
                expected: self.message_length,
                got: total.unwrap_or(usize::MAX),
            }),
        }
    }

    fn encrypt(&mut self, block: &[u8]) -> Vec<u8> {
        self.mac.absorb(block);
        self.apply(block)
    }

    fn decrypt(&mut self, block: &[u8]) -> Vec<u8> {
        let plaintext = self.apply(block);
        self.mac.absorb(&plaintext);
        plaintext
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

impl FinalizingEncryptModeWorker for CcmWorker {
    fn finalize_encrypt(&mut self, mut ciphertext: Vec<u8>) -> Result<Vec<u8>> {
        let tag = self.compute_tag()?;
        if self.placement == TagPlacement::Combined {
            ciphertext.extend_from_slice(&tag);
        }
        self.tag = Some(tag);
        Ok(ciphertext)
    }
}

impl FinalizingDecryptModeWorker for CcmWorker {
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
        let computed = match self.compute_tag() {
            Ok(tag) => tag,
            Err(err) => {
                secure_zero(&mut plaintext);
                return Err(err);
            }
        };
        let verified = self
            .expected_tag
            .as_deref()
            .is_some_and(|expected| constant_time_compare(expected, &computed));
        if !verified {
            secure_zero(&mut plaintext);
            log::warn!("CCM authentication failed");
            return Err(CipherError::AuthenticationFailed);
        }
        Ok(plaintext)
    }
}

impl Drop for CcmWorker {
    fn drop(&mut self) {
        secure_zero(&mut self.keystream);
        secure_zero(&mut self.s0);
    }
}
