//! # CLI Output Helpers
//!
//! Status lines go to stderr so that stdout carries only cipher output.

use console::{style, StyledObject};

/// Output icons with platform-specific spacing
pub struct Icons;

impl Icons {
    #[cfg(unix)]
    pub const SUCCESS: &'static str = "✅";
    #[cfg(windows)]
    pub const SUCCESS: &'static str = "[OK] ";

    #[cfg(unix)]
    pub const ERROR: &'static str = "❌";
    #[cfg(windows)]
    pub const ERROR: &'static str = "[ERR] ";

    #[cfg(unix)]
    pub const WARNING: &'static str = "⚡";
    #[cfg(windows)]
    pub const WARNING: &'static str = "[!] ";
}

fn icon_success() -> StyledObject<&'static str> {
    style(Icons::SUCCESS).green().bold()
}

fn icon_error() -> StyledObject<&'static str> {
    style(Icons::ERROR).red().bold()
}

fn icon_warning() -> StyledObject<&'static str> {
    style(Icons::WARNING).yellow().bold()
}

pub fn print_success(msg: &str) {
    eprintln!(" {}{}", icon_success(), msg);
}

pub fn print_error(msg: impl std::fmt::Display) {
    eprintln!(" {}Error: {}", icon_error(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!(" {}{}", icon_warning(), msg);
}

/// `label: value` with the label dimmed
pub fn print_field(label: &str, value: &str) {
    eprintln!("   {} {}", style(format!("{}:", label)).dim(), style(value).cyan());
}
