//! PKCS#7 block padding and the PKCS#1 v1.5 encoding blocks.

use rand_core::{OsRng, RngCore};

use crate::constants::PKCS1_OVERHEAD;
use crate::error::PaddingError;

// ═══════════════════════════════════════════════════════════════════════════
// PKCS#7
// ═══════════════════════════════════════════════════════════════════════════

/// Pad length for schemes that store it in one trailing byte.
pub(super) fn length_byte_pad(len: usize, block_size: usize) -> Result<u8, PaddingError> {
    if block_size == 0 || block_size > usize::from(u8::MAX) {
        return Err(PaddingError::UnsupportedBlockSize(block_size));
    }
    Ok((block_size - len % block_size) as u8)
}

pub(super) fn pkcs7_add(bytes: &[u8], block_size: usize) -> Result<Vec<u8>, PaddingError> {
    let pad = length_byte_pad(bytes.len(), block_size)?;
    let mut out = Vec::with_capacity(bytes.len() + usize::from(pad));
    out.extend_from_slice(bytes);
    out.resize(bytes.len() + usize::from(pad), pad);
    Ok(out)
}

pub(super) fn pkcs7_remove(bytes: &[u8], block_size: Option<usize>) -> Result<Vec<u8>, PaddingError> {
    let Some(&last) = bytes.last() else {
        return Err(PaddingError::InvalidPaddingValue);
    };
    let pad = last as usize;
    if pad == 0 || pad > bytes.len() || block_size.is_some_and(|bs| pad > bs) {
        return Err(PaddingError::InvalidPaddingValue);
    }

    // Inspect every pad byte before deciding.
    let diff = bytes[bytes.len() - pad..]
        .iter()
        .fold(0u8, |acc, &b| acc | (b ^ last));
    if diff != 0 {
        return Err(PaddingError::InvalidPaddingValue);
    }
    Ok(bytes[..bytes.len() - pad].to_vec())
}

// ═══════════════════════════════════════════════════════════════════════════
// PKCS#1 v1.5 (RFC 8017)
// ═══════════════════════════════════════════════════════════════════════════

const EMSA_BLOCK_TYPE: u8 = 0x01;
const EME_BLOCK_TYPE: u8 = 0x02;

fn check_capacity(len: usize, modulus_len: usize) -> Result<usize, PaddingError> {
    let max = modulus_len.saturating_sub(PKCS1_OVERHEAD);
    if modulus_len < PKCS1_OVERHEAD || len > max {
        return Err(PaddingError::MessageTooLong { max, got: len });
    }
    Ok(modulus_len - 3 - len)
}

fn encode(block_type: u8, filler: &[u8], message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 + filler.len() + message.len());
    out.push(0x00);
    out.push(block_type);
    out.extend_from_slice(filler);
    out.push(0x00);
    out.extend_from_slice(message);
    out
}

/// `0x00 || 0x02 || PS (random, nonzero) || 0x00 || M`
pub(super) fn eme_add(bytes: &[u8], modulus_len: usize) -> Result<Vec<u8>, PaddingError> {
    let ps_len = check_capacity(bytes.len(), modulus_len)?;
    let mut filler = vec![0u8; ps_len];
    OsRng.fill_bytes(&mut filler);
    for byte in filler.iter_mut() {
        while *byte == 0 {
            let mut one = [0u8; 1];
            OsRng.fill_bytes(&mut one);
            *byte = one[0];
        }
    }
    Ok(encode(EME_BLOCK_TYPE, &filler, bytes))
}

/// `0x00 || 0x01 || PS (0xff..) || 0x00 || M`
pub(super) fn emsa_add(bytes: &[u8], modulus_len: usize) -> Result<Vec<u8>, PaddingError> {
    let ps_len = check_capacity(bytes.len(), modulus_len)?;
    Ok(encode(EMSA_BLOCK_TYPE, &vec![0xff; ps_len], bytes))
}

fn decode(bytes: &[u8], block_type: u8) -> Result<(&[u8], &[u8]), PaddingError> {
    if bytes.len() < PKCS1_OVERHEAD || bytes[0] != 0x00 || bytes[1] != block_type {
        return Err(PaddingError::InvalidPaddingValue);
    }
    let separator = bytes[2..]
        .iter()
        .position(|&b| b == 0x00)
        .map(|p| p + 2)
        .ok_or(PaddingError::InvalidPaddingValue)?;
    // PS must be at least eight bytes long
    if separator < 10 {
        return Err(PaddingError::InvalidPaddingValue);
    }
    Ok((&bytes[2..separator], &bytes[separator + 1..]))
}

pub(super) fn eme_remove(bytes: &[u8]) -> Result<Vec<u8>, PaddingError> {
    let (_, message) = decode(bytes, EME_BLOCK_TYPE)?;
    Ok(message.to_vec())
}

pub(super) fn emsa_remove(bytes: &[u8]) -> Result<Vec<u8>, PaddingError> {
    let (filler, message) = decode(bytes, EMSA_BLOCK_TYPE)?;
    if filler.iter().any(|&b| b != 0xff) {
        return Err(PaddingError::InvalidPaddingValue);
    }
    Ok(message.to_vec())
}
