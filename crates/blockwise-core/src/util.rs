//! # Cryptographic Utilities
//!
//! Constant-time comparison, secure zeroing and the byte arithmetic shared by
//! the mode workers.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Constant-time comparison (prevents timing attacks)
///
/// Length is not secret: slices of different length compare unequal
/// immediately.
#[inline(never)]
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Secure memory zeroing
#[inline(never)]
pub fn secure_zero(data: &mut [u8]) {
    data.zeroize();
}

/// XOR `src` into `dst` over the shorter of the two lengths.
#[inline]
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Return `a ^ b` truncated to the shorter input.
#[inline]
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// Add `n` to a big-endian integer in place, wrapping on overflow.
pub fn add_be(counter: &mut [u8], n: u64) {
    let mut carry = n as u128;
    for byte in counter.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = *byte as u128 + (carry & 0xff);
        *byte = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
}

/// Increment the rightmost 32 bits of a block modulo 2^32 (GCM `inc32`).
#[inline]
pub fn inc32(block: &mut [u8; 16]) {
    let ctr = u32::from_be_bytes([block[12], block[13], block[14], block[15]]).wrapping_add(1);
    block[12..].copy_from_slice(&ctr.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"ab"));
        assert!(constant_time_compare(b"", b""));
    }

    #[test]
    fn test_secure_zero() {
        let mut data = [0xaau8; 8];
        secure_zero(&mut data);
        assert_eq!(data, [0u8; 8]);
    }

    #[test]
    fn test_xor_truncates() {
        assert_eq!(xor(&[0xff, 0x0f, 0x01], &[0x0f, 0x0f]), vec![0xf0, 0x00]);
        let mut dst = [1u8, 2, 3];
        xor_into(&mut dst, &[1, 1]);
        assert_eq!(dst, [0, 3, 3]);
    }

    #[test]
    fn test_add_be_carries() {
        let mut c = [0x00, 0x00, 0xff, 0xff];
        add_be(&mut c, 1);
        assert_eq!(c, [0x00, 0x01, 0x00, 0x00]);

        let mut c = [0x00, 0x00, 0x00, 0xfe];
        add_be(&mut c, 0x0102);
        assert_eq!(c, [0x00, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn test_add_be_wraps() {
        let mut c = [0xff; 4];
        add_be(&mut c, 2);
        assert_eq!(c, [0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_add_be_large_increment() {
        let mut c = [0u8; 16];
        add_be(&mut c, u64::MAX);
        assert_eq!(&c[8..], &[0xff; 8]);
        add_be(&mut c, 1);
        assert_eq!(c[7], 1);
        assert_eq!(&c[8..], &[0u8; 8]);
    }

    #[test]
    fn test_inc32_wraps_low_word_only() {
        let mut block = [0xffu8; 16];
        inc32(&mut block);
        assert_eq!(&block[..12], &[0xff; 12]);
        assert_eq!(&block[12..], &[0, 0, 0, 0]);
    }
}
