//! # Configuration
//!
//! TOML description of a cipher: algorithm, key source, mode parameters and
//! padding. [`CipherSection::build`] turns it into a ready [`Cipher`].
//!
//! ```toml
//! [cipher]
//! key_file = "/etc/blockwise/key"
//! mode = "gcm"
//! iv = "cafebabefacedbaddecaf888"
//! aad = "feedfacedeadbeef"
//!
//! [logging]
//! level = "info"
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::cipher::{Aes, BlockCipher, Cipher};
use crate::constants::GCM_DEFAULT_TAG_SIZE;
use crate::error::{CipherError, ConfigError};
use crate::mode::{Cbc, Ccm, Cfb, Ctr, Ecb, Gcm, Ofb, Pcbc, SegmentSize, TagPlacement};
use crate::padding::Padding;
use crate::secure::SecureBytes;

/// Environment variable consulted when neither `key` nor `key_file` is set.
pub const KEY_ENV: &str = "BLOCKWISE_KEY";

/// Starting point written by `blockwise init`.
pub const EXAMPLE_CONFIG: &str = r#"# blockwise cipher configuration

[cipher]
algorithm = "aes"
# 16, 24 or 32 bytes of hex. Alternatively key_file = "path" or BLOCKWISE_KEY.
key = "000102030405060708090a0b0c0d0e0f"
# ecb | cbc | pcbc | cfb | cfb8 | ofb | ctr | gcm | ccm
mode = "gcm"
# none | zero | pkcs7 | pkcs5 | iso10126 | iso7816-4
padding = "none"
# Never reuse an IV / nonce with the same key.
iv = "cafebabefacedbaddecaf888"
# aad = "feedfacedeadbeef"
# tag_length = 16
# tag_placement = "combined"
# counter = 0
# message_length = 0

[logging]
level = "info"
"#;

/// Block cipher primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Aes,
}

/// Block mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Ecb,
    Cbc,
    Pcbc,
    Cfb,
    Cfb8,
    Ofb,
    Ctr,
    #[default]
    Gcm,
    Ccm,
}

impl ModeKind {
    pub fn is_aead(&self) -> bool {
        matches!(self, ModeKind::Gcm | ModeKind::Ccm)
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModeKind::Ecb => "ECB",
            ModeKind::Cbc => "CBC",
            ModeKind::Pcbc => "PCBC",
            ModeKind::Cfb => "CFB",
            ModeKind::Cfb8 => "CFB8",
            ModeKind::Ofb => "OFB",
            ModeKind::Ctr => "CTR",
            ModeKind::Gcm => "GCM",
            ModeKind::Ccm => "CCM",
        };
        f.write_str(name)
    }
}

/// Padding selector. The PKCS#1 encodings are not offered here: they only
/// make sense at a modulus-sized block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum PaddingKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "zero")]
    Zero,
    #[serde(rename = "pkcs7")]
    Pkcs7,
    #[serde(rename = "pkcs5")]
    Pkcs5,
    #[serde(rename = "iso10126")]
    Iso10126,
    #[serde(rename = "iso7816-4")]
    Iso78164,
}

impl From<PaddingKind> for Padding {
    fn from(kind: PaddingKind) -> Self {
        match kind {
            PaddingKind::None => Padding::NoPadding,
            PaddingKind::Zero => Padding::ZeroPadding,
            PaddingKind::Pkcs7 => Padding::Pkcs7,
            PaddingKind::Pkcs5 => Padding::Pkcs5,
            PaddingKind::Iso10126 => Padding::Iso10126,
            PaddingKind::Iso78164 => Padding::Iso78164,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKind {
    #[default]
    Combined,
    Detached,
}

impl From<PlacementKind> for TagPlacement {
    fn from(kind: PlacementKind) -> Self {
        match kind {
            PlacementKind::Combined => TagPlacement::Combined,
            PlacementKind::Detached => TagPlacement::Detached,
        }
    }
}

/// Whole configuration file
#[derive(Debug, Deserialize)]
pub struct CipherConfig {
    pub cipher: CipherSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl CipherConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Cipher parameters
#[derive(Debug, Deserialize)]
pub struct CipherSection {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub key_file: Option<String>,
    #[serde(default)]
    pub mode: ModeKind,
    #[serde(default)]
    pub padding: PaddingKind,
    #[serde(default)]
    pub iv: Option<String>,
    #[serde(default)]
    pub aad: Option<String>,
    #[serde(default)]
    pub tag_length: Option<usize>,
    #[serde(default)]
    pub tag_placement: PlacementKind,
    #[serde(default)]
    pub counter: u64,
    #[serde(default)]
    pub message_length: Option<usize>,
}

impl CipherSection {
    /// Key bytes from `key_file`, then `key`, then `BLOCKWISE_KEY`.
    pub fn key(&self) -> Result<SecureBytes, ConfigError> {
        self.key_with_env(std::env::var(KEY_ENV).ok().map(Zeroizing::new))
    }

    fn key_with_env(&self, env: Option<Zeroizing<String>>) -> Result<SecureBytes, ConfigError> {
        if let Some(ref path) = self.key_file {
            let content = Zeroizing::new(fs::read_to_string(path)?);
            return decode_key(content.trim());
        }
        if let Some(ref hex) = self.key {
            return decode_key(hex);
        }
        if let Some(hex) = env {
            return decode_key(hex.trim());
        }
        Err(ConfigError::MissingKey)
    }

    pub fn iv(&self) -> Result<Vec<u8>, ConfigError> {
        decode_optional("iv", self.iv.as_deref())
    }

    pub fn aad(&self) -> Result<Vec<u8>, ConfigError> {
        decode_optional("aad", self.aad.as_deref())
    }

    /// Build the configured cipher.
    ///
    /// `message_length` is used by CCM when the file does not declare one.
    /// `expected_tag` switches an AEAD mode to detached verification.
    pub fn build(
        &self,
        message_length: Option<usize>,
        expected_tag: Option<&[u8]>,
    ) -> Result<Cipher, ConfigError> {
        let key = self.key()?;
        let iv = self.iv()?;
        let aad = self.aad()?;
        let padding = Padding::from(self.padding);
        let placement = TagPlacement::from(self.tag_placement);

        if !self.mode.is_aead() && (!aad.is_empty() || expected_tag.is_some()) {
            return Err(ConfigError::Invalid(format!(
                "{} does not authenticate: remove aad / tag",
                self.mode
            )));
        }

        let primitive: Arc<dyn BlockCipher> = match self.algorithm {
            Algorithm::Aes => Arc::new(Aes::new(key.as_slice())?),
        };

        let cipher = match self.mode {
            ModeKind::Ecb => Cipher::new(primitive, Ecb, padding),
            ModeKind::Cbc => Cipher::new(primitive, Cbc::new(iv), padding),
            ModeKind::Pcbc => Cipher::new(primitive, Pcbc::new(iv), padding),
            ModeKind::Cfb => Cipher::new(primitive, Cfb::new(iv), padding),
            ModeKind::Cfb8 => Cipher::new(
                primitive,
                Cfb::with_segment_size(iv, SegmentSize::Cfb8),
                padding,
            ),
            ModeKind::Ofb => Cipher::new(primitive, Ofb::new(iv), padding),
            ModeKind::Ctr => Cipher::new(primitive, Ctr::with_counter(iv, self.counter), padding),
            ModeKind::Gcm => {
                let mut gcm = Gcm::new(iv)
                    .with_aad(aad)
                    .with_tag_length(self.tag_length.unwrap_or(GCM_DEFAULT_TAG_SIZE))
                    .with_placement(placement);
                if let Some(tag) = expected_tag {
                    gcm = gcm.with_authentication_tag(tag);
                }
                Cipher::new(primitive, gcm, padding)
            }
            ModeKind::Ccm => {
                let tag_length = self
                    .tag_length
                    .ok_or_else(|| ConfigError::Invalid("ccm requires tag_length".into()))?;
                let length = self
                    .message_length
                    .or(message_length)
                    .ok_or(CipherError::MissingMessageLength)?;
                let mut ccm = Ccm::new(iv, tag_length)
                    .with_message_length(length)
                    .with_aad(aad)
                    .with_placement(placement);
                if let Some(tag) = expected_tag {
                    ccm = ccm.with_authentication_tag(tag);
                }
                Cipher::new(primitive, ccm, padding)
            }
        };

        log::debug!(
            "configured {:?}-{} with {} padding",
            self.algorithm,
            self.mode,
            padding
        );
        Ok(cipher)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            level: default_log_level(),
        }
    }
}

pub fn default_log_level() -> String {
    "info".to_string()
}

// ═══════════════════════════════════════════════════════════════════════════
// HEX
// ═══════════════════════════════════════════════════════════════════════════

fn decode_key(hex: &str) -> Result<SecureBytes, ConfigError> {
    let bytes = hex::decode(hex).map_err(|source| ConfigError::InvalidHex {
        field: "key",
        source,
    })?;
    Ok(SecureBytes::from(bytes))
}

fn decode_optional(field: &'static str, hex: Option<&str>) -> Result<Vec<u8>, ConfigError> {
    match hex {
        Some(hex) => hex::decode(hex.trim()).map_err(|source| ConfigError::InvalidHex { field, source }),
        None => Ok(Vec::new()),
    }
}
