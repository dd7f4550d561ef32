//! # Constants
//!
//! Shared sizes for primitives and modes.

// ═══════════════════════════════════════════════════════════════════════════
// AES
// ═══════════════════════════════════════════════════════════════════════════

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// Accepted AES key sizes in bytes (AES-128, AES-192, AES-256)
pub const AES_KEY_SIZES: [usize; 3] = [16, 24, 32];

// ═══════════════════════════════════════════════════════════════════════════
// GCM (NIST SP 800-38D)
// ═══════════════════════════════════════════════════════════════════════════

/// GCM only runs over 128-bit block ciphers
pub const GCM_BLOCK_SIZE: usize = 16;

/// Recommended IV length; other lengths go through GHASH
pub const GCM_NONCE_SIZE: usize = 12;

/// Default authentication tag length
pub const GCM_DEFAULT_TAG_SIZE: usize = 16;

/// Tag lengths permitted by SP 800-38D section 5.2.1.2
pub const GCM_TAG_SIZES: [usize; 7] = [4, 8, 12, 13, 14, 15, 16];

// ═══════════════════════════════════════════════════════════════════════════
// CCM (NIST SP 800-38C)
// ═══════════════════════════════════════════════════════════════════════════

pub const CCM_BLOCK_SIZE: usize = 16;

/// Nonce length bounds: 15 - q where q is the width of the length field (2..=8)
pub const CCM_NONCE_MIN: usize = 7;
pub const CCM_NONCE_MAX: usize = 13;

/// Tag lengths permitted by SP 800-38C appendix A.1
pub const CCM_TAG_SIZES: [usize; 7] = [4, 6, 8, 10, 12, 14, 16];

// ═══════════════════════════════════════════════════════════════════════════
// PKCS#1 v1.5
// ═══════════════════════════════════════════════════════════════════════════

/// Minimum overhead of an EME/EMSA-PKCS1-v1_5 encoded block:
/// 0x00 || type || at least 8 filler bytes || 0x00
pub const PKCS1_OVERHEAD: usize = 11;
