//! # Padding
//!
//! Block padding schemes. `add` is applied to the final, partial tail of a
//! message when encryption finishes; `remove` is applied to the final
//! plaintext when decryption finishes.
//!
//! ZeroPadding and ISO 7816-4 are ambiguous when the plaintext itself ends in
//! `0x00` (or in `0x80 0x00..`): `remove` strips those bytes too. This is a
//! property of the schemes, not something the engine tries to repair.

mod iso;
mod pkcs;
mod zero;

use crate::error::PaddingError;

/// Supported padding schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// Identity. Input must already be aligned unless the mode handles short
    /// blocks itself (CFB, OFB, CTR, GCM, CCM).
    #[default]
    NoPadding,
    ZeroPadding,
    Pkcs7,
    /// PKCS#5 is PKCS#7 restricted to 8-byte blocks; encoded identically.
    Pkcs5,
    Iso10126,
    Iso78164,
    /// EME-PKCS1-v1_5 (RFC 8017 section 7.2), `block_size` is the modulus length
    EmePkcs1v15,
    /// EMSA-PKCS1-v1_5 (RFC 8017 section 9.2), `block_size` is the modulus length
    EmsaPkcs1v15,
}

impl Padding {
    /// Pad `bytes` up to a multiple of `block_size`.
    pub fn add(&self, bytes: &[u8], block_size: usize) -> Result<Vec<u8>, PaddingError> {
        let aligning = matches!(self, Padding::ZeroPadding | Padding::Iso78164);
        if aligning && block_size == 0 {
            return Err(PaddingError::UnsupportedBlockSize(0));
        }
        match self {
            Padding::NoPadding => Ok(bytes.to_vec()),
            Padding::ZeroPadding => Ok(zero::add(bytes, block_size)),
            Padding::Pkcs7 | Padding::Pkcs5 => pkcs::pkcs7_add(bytes, block_size),
            Padding::Iso10126 => iso::iso10126_add(bytes, block_size),
            Padding::Iso78164 => Ok(iso::iso7816_add(bytes, block_size)),
            Padding::EmePkcs1v15 => pkcs::eme_add(bytes, block_size),
            Padding::EmsaPkcs1v15 => pkcs::emsa_add(bytes, block_size),
        }
    }

    /// Strip the padding from the end of `bytes`.
    ///
    /// `block_size`, when given, bounds the pad length a scheme will accept.
    pub fn remove(&self, bytes: &[u8], block_size: Option<usize>) -> Result<Vec<u8>, PaddingError> {
        match self {
            Padding::NoPadding => Ok(bytes.to_vec()),
            Padding::ZeroPadding => Ok(zero::remove(bytes)),
            Padding::Pkcs7 | Padding::Pkcs5 => pkcs::pkcs7_remove(bytes, block_size),
            Padding::Iso10126 => iso::iso10126_remove(bytes, block_size),
            Padding::Iso78164 => iso::iso7816_remove(bytes),
            Padding::EmePkcs1v15 => pkcs::eme_remove(bytes),
            Padding::EmsaPkcs1v15 => pkcs::emsa_remove(bytes),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Padding::NoPadding)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Padding::NoPadding => "none",
            Padding::ZeroPadding => "zero",
            Padding::Pkcs7 => "pkcs7",
            Padding::Pkcs5 => "pkcs5",
            Padding::Iso10126 => "iso10126",
            Padding::Iso78164 => "iso7816-4",
            Padding::EmePkcs1v15 => "eme-pkcs1v15",
            Padding::EmsaPkcs1v15 => "emsa-pkcs1v15",
        }
    }
}

impl std::fmt::Display for Padding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
