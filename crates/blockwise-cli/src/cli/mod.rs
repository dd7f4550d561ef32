//! # CLI Module
//!
//! Command-line interface for blockwise.

mod app;
mod commands;
mod output;

pub use app::{exit_with_error, run};

use blockwise_core::{CipherError, ConfigError};
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
