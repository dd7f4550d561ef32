//! # AES Primitive
//!
//! AES-128/192/256 single-block transform (FIPS-197) from RustCrypto's
//! `aes` crate. Key size selects the variant.
//!
//! Only the expanded schedule is kept. It lives in locked memory and the
//! `aes` crate's `zeroize` feature wipes it on drop.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};

use super::BlockCipher;
use crate::constants::AES_BLOCK_SIZE;
use crate::error::{CipherError, Result};
use crate::secure::Pinned;

enum Schedule {
    Aes128(aes::Aes128),
    Aes192(aes::Aes192),
    Aes256(aes::Aes256),
}

/// AES block cipher (RustCrypto implementation)
pub struct Aes {
    schedule: Pinned<Schedule>,
    key_bits: usize,
}

impl Aes {
    /// Build from a 16, 24 or 32 byte key.
    pub fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| CipherError::InvalidKeyLength { got: key.len() };
        let schedule = match key.len() {
            16 => Schedule::Aes128(aes::Aes128::new_from_slice(key).map_err(invalid)?),
            24 => Schedule::Aes192(aes::Aes192::new_from_slice(key).map_err(invalid)?),
            32 => Schedule::Aes256(aes::Aes256::new_from_slice(key).map_err(invalid)?),
            got => return Err(CipherError::InvalidKeyLength { got }),
        };
        Ok(Aes {
            schedule: Pinned::new(schedule),
            key_bits: key.len() * 8,
        })
    }

    /// Key length in bits.
    pub fn key_bits(&self) -> usize {
        self.key_bits
    }
}

impl BlockCipher for Aes {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), AES_BLOCK_SIZE);
        let block = GenericArray::from_mut_slice(block);
        match &*self.schedule {
            Schedule::Aes128(c) => c.encrypt_block(block),
            Schedule::Aes192(c) => c.encrypt_block(block),
            Schedule::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), AES_BLOCK_SIZE);
        let block = GenericArray::from_mut_slice(block);
        match &*self.schedule {
            Schedule::Aes128(c) => c.decrypt_block(block),
            Schedule::Aes192(c) => c.decrypt_block(block),
            Schedule::Aes256(c) => c.decrypt_block(block),
        }
    }
}

impl std::fmt::Debug for Aes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AES-{}", self.key_bits())
    }
}
