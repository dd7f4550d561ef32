//! # Block Modes
//!
//! Mode configurations ([`BlockMode`]) and the per-session workers they
//! build.
//!
//! | Mode | Driver | IV | Padding required | Seekable | AEAD |
//! |------|--------|----|------------------|----------|------|
//! | ECB  | block  | -  | yes | - | - |
//! | CBC  | block  | yes | yes | - | - |
//! | PCBC | block  | yes | yes | - | - |
//! | CFB  | block  | yes | - | - | - |
//! | CFB8 | stream | yes | - | - | - |
//! | OFB  | block  | yes | - | - | - |
//! | CTR  | stream | yes | - | yes | - |
//! | GCM  | block  | yes | - | - | yes |
//! | CCM  | stream | yes | - | - | yes |

mod worker;

mod cbc;
mod ccm;
mod cfb;
mod ctr;
mod ecb;
mod gcm;
mod ofb;
mod pcbc;

pub use cbc::Cbc;
pub use ccm::Ccm;
pub use cfb::{Cfb, SegmentSize};
pub use ctr::Ctr;
pub use ecb::Ecb;
pub use gcm::Gcm;
pub use ofb::Ofb;
pub use pcbc::Pcbc;
pub use worker::{
    BlockMode, CipherModeWorker, Direction, FinalizingDecryptModeWorker,
    FinalizingEncryptModeWorker, ModeOptions, ModeWorker, SeekableModeWorker, TagPlacement,
};
