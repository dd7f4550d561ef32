//! # CLI Commands
//!
//! Implementation of all CLI commands.

use std::fs;
use std::io::{self, Read, Write};

use blockwise_core::config::PlacementKind;
use blockwise_core::constants::AES_BLOCK_SIZE;
use blockwise_core::{CipherConfig, CipherError, CipherSection, Cryptor, ModeKind, Padding, EXAMPLE_CONFIG};
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

use super::app::KeyBits;
use super::output;
use super::{CliError, Result};

/// Bytes handed to the cryptor per update
const CHUNK_SIZE: usize = 64 * 1024;

pub struct EncryptArgs {
    pub config: String,
    pub input: Option<String>,
    pub output: Option<String>,
    pub hex: bool,
    pub tag_out: Option<String>,
    pub verbose: bool,
}

pub struct DecryptArgs {
    pub config: String,
    pub input: Option<String>,
    pub output: Option<String>,
    pub hex: bool,
    pub tag: Option<String>,
    pub verbose: bool,
}

// ═══════════════════════════════════════════════════════════════════════════
// ENCRYPT / DECRYPT
// ═══════════════════════════════════════════════════════════════════════════

pub fn cmd_encrypt(args: &EncryptArgs) -> Result<()> {
    let config = CipherConfig::from_file(&args.config)?;
    setup_logging(args.verbose, &config.logging.level);

    let plaintext = Zeroizing::new(read_input(args.input.as_deref())?);
    let length = encrypt_message_length(&config.cipher, plaintext.len())?;
    let cipher = config.cipher.build(length, None)?;

    let mut enc = cipher.make_encryptor()?;
    let mut ciphertext = Vec::with_capacity(plaintext.len() + 2 * AES_BLOCK_SIZE);
    for chunk in plaintext.chunks(CHUNK_SIZE) {
        ciphertext.extend(enc.update(chunk, false)?);
    }
    ciphertext.extend(enc.finish()?);
    log::info!("{}: {} -> {} bytes", cipher.mode().name(), plaintext.len(), ciphertext.len());

    if args.hex {
        let mut encoded = hex::encode(&ciphertext);
        encoded.push('\n');
        write_output(args.output.as_deref(), encoded.as_bytes())?;
    } else {
        write_output(args.output.as_deref(), &ciphertext)?;
    }

    let detached = config.cipher.tag_placement == PlacementKind::Detached;
    match (enc.authentication_tag(), detached) {
        (Some(tag), true) => {
            let tag = hex::encode(tag);
            match args.tag_out.as_deref() {
                Some(path) => {
                    fs::write(path, format!("{}\n", tag))?;
                    output::print_success(&format!("Tag written to {}", path));
                }
                None => output::print_field("tag", &tag),
            }
        }
        _ if args.tag_out.is_some() => {
            output::print_warning("No detached tag for this configuration; --tag-out ignored")
        }
        _ => {}
    }
    Ok(())
}

pub fn cmd_decrypt(args: &DecryptArgs) -> Result<()> {
    let config = CipherConfig::from_file(&args.config)?;
    setup_logging(args.verbose, &config.logging.level);

    let raw = read_input(args.input.as_deref())?;
    let ciphertext = if args.hex { decode_hex(&raw)? } else { raw };
    let tag = args.tag.as_deref().map(|t| decode_hex(t.as_bytes())).transpose()?;

    let length = decrypt_message_length(&config.cipher, ciphertext.len(), tag.is_some());
    let cipher = config.cipher.build(length, tag.as_deref())?;

    // Held back until the session verifies; nothing is written on failure.
    let mut dec = cipher.make_decryptor()?;
    let mut plaintext = Zeroizing::new(Vec::with_capacity(ciphertext.len()));
    for chunk in ciphertext.chunks(CHUNK_SIZE) {
        plaintext.extend(dec.update(chunk, false)?);
    }
    plaintext.extend(dec.finish()?);
    log::info!("{}: {} -> {} bytes", cipher.mode().name(), ciphertext.len(), plaintext.len());

    write_output(args.output.as_deref(), &plaintext)
}

/// CCM length to declare when the config leaves it out: the padded
/// plaintext length.
fn encrypt_message_length(section: &CipherSection, plaintext_len: usize) -> Result<Option<usize>> {
    if section.mode != ModeKind::Ccm || section.message_length.is_some() {
        return Ok(None);
    }
    let tail = plaintext_len % AES_BLOCK_SIZE;
    let padded_tail = Padding::from(section.padding)
        .add(&vec![0u8; tail], AES_BLOCK_SIZE)
        .map_err(CipherError::from)?;
    Ok(Some(plaintext_len - tail + padded_tail.len()))
}

/// CCM length to declare on decrypt: the ciphertext without its tag.
fn decrypt_message_length(section: &CipherSection, input_len: usize, detached_tag: bool) -> Option<usize> {
    if section.mode != ModeKind::Ccm || section.message_length.is_some() {
        return None;
    }
    let combined = section.tag_placement == PlacementKind::Combined && !detached_tag;
    let tag_len = if combined { section.tag_length.unwrap_or(0) } else { 0 };
    Some(input_len.saturating_sub(tag_len))
}

// ═══════════════════════════════════════════════════════════════════════════
// GENKEY / INIT
// ═══════════════════════════════════════════════════════════════════════════

/// Generate a random AES key as hex
pub fn cmd_genkey(bits: KeyBits, output: Option<&str>) -> Result<()> {
    let mut key = Zeroizing::new(vec![0u8; bits.key_len()]);
    OsRng.fill_bytes(&mut key);
    let encoded = Zeroizing::new(hex::encode(&*key));

    match output {
        Some(path) => {
            write_secret(path, format!("{}\n", *encoded).as_bytes())?;
            output::print_success(&format!("AES-{} key saved to {}", bits.key_len() * 8, path));
        }
        None => println!("{}", *encoded),
    }
    Ok(())
}

/// Create config template
pub fn cmd_init(output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, EXAMPLE_CONFIG)?;
            output::print_success(&format!("Config written to {}", path));
            output::print_warning("Replace the example key and IV before use");
        }
        None => print!("{}", EXAMPLE_CONFIG),
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Setup logging; `--verbose` overrides the config level.
pub fn setup_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read(path)?),
    }
}

fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<()> {
    match path {
        None | Some("-") => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
        Some(path) => fs::write(path, bytes)?,
    }
    Ok(())
}

fn write_secret(path: &str, bytes: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)?.write_all(bytes)?;
    Ok(())
}

/// Hex with any whitespace (line breaks from `--hex` output) ignored
fn decode_hex(raw: &[u8]) -> Result<Vec<u8>> {
    let digits: Vec<u8> = raw.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() && !raw.is_empty() {
        return Err(CliError::Usage("hex input contains only whitespace".into()));
    }
    Ok(hex::decode(digits)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blockwise-cli-{}-{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn path(dir: &PathBuf, file: &str) -> String {
        dir.join(file).to_string_lossy().into_owned()
    }

    fn section(toml: &str) -> CipherSection {
        CipherConfig::from_toml_str(toml).unwrap().cipher
    }

    const GCM_CONFIG: &str = r#"
[cipher]
key = "feffe9928665731c6d6a8f9467308308"
mode = "gcm"
iv = "cafebabefacedbaddecaf888"
aad = "feedfacedeadbeef"

[logging]
level = "warn"
"#;

    const CCM_DETACHED_CONFIG: &str = r#"
[cipher]
key = "404142434445464748494a4b4c4d4e4f"
mode = "ccm"
padding = "pkcs7"
iv = "10111213141516"
tag_length = 8
tag_placement = "detached"
"#;

    #[test]
    fn test_gcm_hex_round_trip() {
        let dir = scratch("gcm");
        let config = path(&dir, "cipher.toml");
        fs::write(&config, GCM_CONFIG).unwrap();
        fs::write(dir.join("plain.txt"), b"attack at dawn, bring snacks").unwrap();

        cmd_encrypt(&EncryptArgs {
            config: config.clone(),
            input: Some(path(&dir, "plain.txt")),
            output: Some(path(&dir, "cipher.hex")),
            hex: true,
            tag_out: None,
            verbose: false,
        })
        .unwrap();

        let encoded = fs::read_to_string(dir.join("cipher.hex")).unwrap();
        assert_eq!(hex::decode(encoded.trim()).unwrap().len(), 28 + 16);

        cmd_decrypt(&DecryptArgs {
            config,
            input: Some(path(&dir, "cipher.hex")),
            output: Some(path(&dir, "plain.out")),
            hex: true,
            tag: None,
            verbose: false,
        })
        .unwrap();
        assert_eq!(fs::read(dir.join("plain.out")).unwrap(), b"attack at dawn, bring snacks");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_ccm_detached_round_trip() {
        let dir = scratch("ccm");
        let config = path(&dir, "cipher.toml");
        fs::write(&config, CCM_DETACHED_CONFIG).unwrap();
        fs::write(dir.join("plain.bin"), [0x5au8; 21]).unwrap();

        cmd_encrypt(&EncryptArgs {
            config: config.clone(),
            input: Some(path(&dir, "plain.bin")),
            output: Some(path(&dir, "cipher.bin")),
            hex: false,
            tag_out: Some(path(&dir, "tag.hex")),
            verbose: false,
        })
        .unwrap();
        assert_eq!(fs::read(dir.join("cipher.bin")).unwrap().len(), 32);

        let tag = fs::read_to_string(dir.join("tag.hex")).unwrap();
        assert_eq!(tag.trim().len(), 16);

        cmd_decrypt(&DecryptArgs {
            config,
            input: Some(path(&dir, "cipher.bin")),
            output: Some(path(&dir, "plain.out")),
            hex: false,
            tag: Some(tag.trim().to_string()),
            verbose: false,
        })
        .unwrap();
        assert_eq!(fs::read(dir.join("plain.out")).unwrap(), vec![0x5au8; 21]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_tampered_input_writes_nothing() {
        let dir = scratch("tamper");
        let config = path(&dir, "cipher.toml");
        fs::write(&config, GCM_CONFIG).unwrap();
        fs::write(dir.join("plain.txt"), b"integrity matters").unwrap();

        cmd_encrypt(&EncryptArgs {
            config: config.clone(),
            input: Some(path(&dir, "plain.txt")),
            output: Some(path(&dir, "cipher.bin")),
            hex: false,
            tag_out: None,
            verbose: false,
        })
        .unwrap();

        let mut ct = fs::read(dir.join("cipher.bin")).unwrap();
        ct[3] ^= 0x80;
        fs::write(dir.join("cipher.bin"), &ct).unwrap();

        let err = cmd_decrypt(&DecryptArgs {
            config,
            input: Some(path(&dir, "cipher.bin")),
            output: Some(path(&dir, "plain.out")),
            hex: false,
            tag: None,
            verbose: false,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Cipher(CipherError::AuthenticationFailed)));
        assert!(!dir.join("plain.out").exists());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_ccm_message_lengths() {
        let padded = section(CCM_DETACHED_CONFIG);
        assert_eq!(encrypt_message_length(&padded, 5).unwrap(), Some(16));
        assert_eq!(encrypt_message_length(&padded, 16).unwrap(), Some(32));
        assert_eq!(decrypt_message_length(&padded, 32, true), Some(32));

        let combined = section(
            "[cipher]\nkey = \"00000000000000000000000000000000\"\nmode = \"ccm\"\niv = \"10111213141516\"\ntag_length = 8\n",
        );
        assert_eq!(encrypt_message_length(&combined, 5).unwrap(), Some(5));
        assert_eq!(decrypt_message_length(&combined, 13, false), Some(5));
        assert_eq!(decrypt_message_length(&combined, 3, false), Some(0));

        let gcm = section(GCM_CONFIG);
        assert_eq!(encrypt_message_length(&gcm, 5).unwrap(), None);
        assert_eq!(decrypt_message_length(&gcm, 40, false), None);
    }

    #[test]
    fn test_genkey_writes_hex_key() {
        let dir = scratch("genkey");
        let key_path = path(&dir, "aes.key");
        cmd_genkey(KeyBits::Aes192, Some(&key_path)).unwrap();

        let key = hex::decode(fs::read_to_string(&key_path).unwrap().trim()).unwrap();
        assert_eq!(key.len(), 24);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&key_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = scratch("init");
        let config_path = path(&dir, "cipher.toml");
        cmd_init(Some(&config_path)).unwrap();

        let config = CipherConfig::from_file(&config_path).unwrap();
        assert_eq!(config.cipher.mode, ModeKind::Gcm);
        assert!(config.cipher.build(None, None).is_ok());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_decode_hex_ignores_line_breaks() {
        assert_eq!(decode_hex(b"00ff\n10\r\n").unwrap(), vec![0x00, 0xff, 0x10]);
        assert_eq!(decode_hex(b"").unwrap(), Vec::<u8>::new());
        assert!(matches!(decode_hex(b" \n"), Err(CliError::Usage(_))));
        assert!(matches!(decode_hex(b"zz"), Err(CliError::Hex(_))));
    }
}
