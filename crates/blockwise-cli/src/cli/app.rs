//! # CLI Application
//!
//! CLI definition and command dispatch using clap.

use clap::{Parser, Subcommand, ValueEnum};

use super::commands::{cmd_decrypt, cmd_encrypt, cmd_genkey, cmd_init, DecryptArgs, EncryptArgs};
use super::output;
use super::Result;

/// blockwise - streaming block-cipher mode engine
#[derive(Parser)]
#[command(
    name = "blockwise",
    version = env!("CARGO_PKG_VERSION"),
    about = "Encrypt and decrypt with AES in ECB, CBC, PCBC, CFB, OFB, CTR, GCM or CCM mode",
    long_about = None,
    after_help = "Examples:\n  \
        blockwise init > cipher.toml\n  \
        blockwise genkey -b 256 -o aes.key\n  \
        blockwise encrypt -c cipher.toml -i notes.txt -o notes.enc\n  \
        blockwise decrypt -c cipher.toml -i notes.enc\n  \
        echo -n hello | blockwise enc -c cipher.toml --hex",
    styles = get_styles(),
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt input with the configured cipher
    #[command(visible_alias = "enc")]
    Encrypt {
        /// Config file path
        #[arg(short, long, default_value = "cipher.toml")]
        config: String,

        /// Input file (stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Write ciphertext as hex
        #[arg(long)]
        hex: bool,

        /// Where to write a detached tag (hex); printed to stderr if omitted
        #[arg(long)]
        tag_out: Option<String>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Decrypt input with the configured cipher
    #[command(visible_alias = "dec")]
    Decrypt {
        /// Config file path
        #[arg(short, long, default_value = "cipher.toml")]
        config: String,

        /// Input file (stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Read ciphertext as hex
        #[arg(long)]
        hex: bool,

        /// Detached authentication tag (hex)
        #[arg(short, long)]
        tag: Option<String>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a random AES key
    #[command(visible_alias = "key")]
    Genkey {
        /// Key size in bits
        #[arg(short, long, value_enum, default_value = "256")]
        bits: KeyBits,

        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print an example config
    Init {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// AES key size for genkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyBits {
    #[value(name = "128")]
    Aes128,
    #[value(name = "192")]
    Aes192,
    #[value(name = "256")]
    Aes256,
}

impl KeyBits {
    pub fn key_len(self) -> usize {
        match self {
            KeyBits::Aes128 => 16,
            KeyBits::Aes192 => 24,
            KeyBits::Aes256 => 32,
        }
    }
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            clap::builder::styling::AnsiColor::BrightCyan
                .on_default()
                .bold(),
        )
        .header(
            clap::builder::styling::AnsiColor::BrightCyan
                .on_default()
                .bold(),
        )
        .literal(clap::builder::styling::AnsiColor::BrightGreen.on_default())
        .placeholder(clap::builder::styling::AnsiColor::Cyan.on_default())
        .valid(clap::builder::styling::AnsiColor::BrightGreen.on_default())
        .invalid(clap::builder::styling::AnsiColor::BrightRed.on_default())
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt {
            config,
            input,
            output,
            hex,
            tag_out,
            verbose,
        } => cmd_encrypt(&EncryptArgs {
            config,
            input,
            output,
            hex,
            tag_out,
            verbose,
        }),

        Commands::Decrypt {
            config,
            input,
            output,
            hex,
            tag,
            verbose,
        } => cmd_decrypt(&DecryptArgs {
            config,
            input,
            output,
            hex,
            tag,
            verbose,
        }),

        Commands::Genkey { bits, output } => cmd_genkey(bits, output.as_deref()),

        Commands::Init { output } => cmd_init(output.as_deref()),
    }
}

/// Print error and exit
pub fn exit_with_error(e: impl std::fmt::Display) -> ! {
    output::print_error(e);
    std::process::exit(1);
}
