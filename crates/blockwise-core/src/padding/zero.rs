//! Zero padding. Aligned input is left untouched.

pub(super) fn add(bytes: &[u8], block_size: usize) -> Vec<u8> {
    let rem = bytes.len() % block_size;
    let mut out = bytes.to_vec();
    if rem != 0 {
        out.resize(bytes.len() + block_size - rem, 0x00);
    }
    out
}

/// Strips every trailing zero, including zeros that belonged to the message.
pub(super) fn remove(bytes: &[u8]) -> Vec<u8> {
    let end = bytes.iter().rposition(|&b| b != 0x00).map_or(0, |i| i + 1);
    bytes[..end].to_vec()
}
