//! ISO 10126 and ISO/IEC 7816-4 padding.

use rand_core::{OsRng, RngCore};

use super::pkcs::length_byte_pad;
use crate::error::PaddingError;

const ISO7816_MARKER: u8 = 0x80;

/// Random filler followed by a single length byte.
pub(super) fn iso10126_add(bytes: &[u8], block_size: usize) -> Result<Vec<u8>, PaddingError> {
    let pad = length_byte_pad(bytes.len(), block_size)?;
    let mut filler = vec![0u8; usize::from(pad) - 1];
    OsRng.fill_bytes(&mut filler);

    let mut out = Vec::with_capacity(bytes.len() + usize::from(pad));
    out.extend_from_slice(bytes);
    out.extend_from_slice(&filler);
    out.push(pad);
    Ok(out)
}

/// Only the length byte is validated; the filler is random by definition.
pub(super) fn iso10126_remove(bytes: &[u8], block_size: Option<usize>) -> Result<Vec<u8>, PaddingError> {
    let Some(&last) = bytes.last() else {
        return Err(PaddingError::InvalidPaddingValue);
    };
    let pad = last as usize;
    if pad == 0 || pad > bytes.len() || block_size.is_some_and(|bs| pad > bs) {
        return Err(PaddingError::InvalidPaddingValue);
    }
    Ok(bytes[..bytes.len() - pad].to_vec())
}

/// `0x80` followed by zeros up to the block boundary; always adds one byte.
pub(super) fn iso7816_add(bytes: &[u8], block_size: usize) -> Vec<u8> {
    let pad = block_size - (bytes.len() % block_size);
    let mut out = Vec::with_capacity(bytes.len() + pad);
    out.extend_from_slice(bytes);
    out.push(ISO7816_MARKER);
    out.resize(bytes.len() + pad, 0x00);
    out
}

/// Skip trailing zeros; the next byte must be the `0x80` marker.
pub(super) fn iso7816_remove(bytes: &[u8]) -> Result<Vec<u8>, PaddingError> {
    match bytes.iter().rposition(|&b| b != 0x00) {
        Some(idx) if bytes[idx] == ISO7816_MARKER => Ok(bytes[..idx].to_vec()),
        _ => Err(PaddingError::InvalidPaddingValue),
    }
}
