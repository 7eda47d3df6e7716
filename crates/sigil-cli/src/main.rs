//! Sigil CLI - hashing, MACs and AES from the command line.
//!
//! A thin front end over `sigil-crypto`. Keys, IVs and counters are given as
//! hex arguments; data is read from a file or stdin. Defaults for the hash,
//! scheme and output encoding come from the layered configuration.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sigil_crypto::{EncryptionScheme, HashAlgorithm};
use sigil_telemetry::{LogConfig, setup_logging};

mod commands;
mod config_bridge;
mod io;

use commands::cipher::{Direction, Streams};
use commands::{cipher, config, digest, random};
use config_bridge::Defaults;
use io::Encoding;

/// Sigil - software SHA-2, HMAC and AES
#[derive(Parser)]
#[command(name = "sigil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "SIGIL_CONFIG")]
    config: Option<PathBuf>,

    /// Output encoding (overrides crypto.output_encoding)
    #[arg(short, long, global = true, value_enum)]
    encoding: Option<Encoding>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a file or stdin
    Hash {
        /// Hash algorithm (sha256, sha512)
        #[arg(short, long)]
        algorithm: Option<HashAlgorithm>,

        /// Input file (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// Compute or verify an HMAC
    Hmac {
        /// Hash algorithm (sha256, sha512)
        #[arg(short, long)]
        algorithm: Option<HashAlgorithm>,

        /// Key as hex
        #[arg(short, long)]
        key: String,

        /// Expected tag as hex; prints OK or fails
        #[arg(long)]
        verify: Option<String>,

        /// Input file (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// AES-CTR transform (encrypts and decrypts)
    Ctr {
        /// 16, 24 or 32-byte key as hex
        #[arg(short, long)]
        key: String,

        /// 16-byte initial counter block as hex
        #[arg(short, long)]
        counter: String,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Encrypt with a 32-byte key
    Encrypt {
        #[command(flatten)]
        args: SchemeArgs,
    },

    /// Decrypt with a 32-byte key
    Decrypt {
        #[command(flatten)]
        args: SchemeArgs,
    },

    /// Print random bytes from the OS generator
    Random {
        /// Number of bytes
        #[arg(default_value = "32")]
        len: usize,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args)]
struct SchemeArgs {
    /// Scheme (aes-cbc-pkcs7, aes-ctr-no-padding)
    #[arg(short, long)]
    scheme: Option<EncryptionScheme>,

    /// 32-byte key as hex
    #[arg(short, long)]
    key: String,

    /// 16-byte IV as hex
    #[arg(long)]
    iv: String,

    #[command(flatten)]
    io: IoArgs,
}

#[derive(clap::Args)]
struct IoArgs {
    /// Input file (stdin if omitted)
    input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How the input is encoded
    #[arg(long, value_enum, default_value = "raw")]
    input_encoding: Encoding,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration with value sources
    Show {
        /// Output format: toml or json
        #[arg(short, long, default_value = "toml")]
        format: String,

        /// Only show one section (e.g. crypto, logging)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Show where configuration is read from
    Paths,
}

impl IoArgs {
    fn streams(&self, output_encoding: Encoding) -> Streams<'_> {
        Streams {
            input: self.input.as_deref(),
            input_encoding: self.input_encoding,
            output: self.output.as_deref(),
            output_encoding,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = sigil_config::Config::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    let mut log_config = LogConfig::try_from(&resolved.config.logging)?;
    if cli.verbose {
        log_config = log_config.with_level("debug");
    }
    if let Err(e) = setup_logging(&log_config) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let defaults = Defaults::from_config(&resolved.config)?;
    let encoding = cli.encoding.unwrap_or(defaults.encoding);
    tracing::debug!(files = ?resolved.loaded_files, ?defaults, "configuration resolved");

    match cli.command {
        Commands::Hash { algorithm, input } => {
            digest::run_hash(
                algorithm.unwrap_or(defaults.hash),
                input.as_deref(),
                encoding,
            )?;
        },
        Commands::Hmac {
            algorithm,
            key,
            verify,
            input,
        } => {
            digest::run_hmac(
                algorithm.unwrap_or(defaults.hash),
                &key,
                input.as_deref(),
                verify.as_deref(),
                encoding,
            )?;
        },
        Commands::Ctr { key, counter, io } => {
            cipher::run_ctr(&key, &counter, io.streams(encoding))?;
        },
        Commands::Encrypt { args } => {
            run_scheme(Direction::Encrypt, &args, defaults.scheme, encoding)?;
        },
        Commands::Decrypt { args } => {
            run_scheme(Direction::Decrypt, &args, defaults.scheme, encoding)?;
        },
        Commands::Random { len } => {
            random::run_random(len, encoding)?;
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format, section } => {
                config::show(&resolved, &format, section.as_deref())?;
            },
            ConfigCommands::Paths => config::paths()?,
        },
    }

    Ok(())
}

fn run_scheme(
    direction: Direction,
    args: &SchemeArgs,
    default_scheme: EncryptionScheme,
    encoding: Encoding,
) -> Result<()> {
    cipher::run_scheme(
        direction,
        args.scheme.unwrap_or(default_scheme),
        &args.key,
        &args.iv,
        args.io.streams(encoding),
    )
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_hash() {
        let cli = Cli::try_parse_from(["sigil", "hash", "-a", "sha512", "file.bin"]).unwrap();
        match cli.command {
            Commands::Hash { algorithm, input } => {
                assert_eq!(algorithm, Some(HashAlgorithm::Sha512));
                assert_eq!(input, Some(PathBuf::from("file.bin")));
            },
            _ => panic!("expected hash"),
        }
    }

    #[test]
    fn test_parse_encrypt() {
        let cli = Cli::try_parse_from([
            "sigil",
            "encrypt",
            "--scheme",
            "aes-ctr-no-padding",
            "--key",
            "00",
            "--iv",
            "01",
            "-o",
            "out.bin",
            "--encoding",
            "base64",
        ])
        .unwrap();
        assert_eq!(cli.encoding, Some(Encoding::Base64));
        match cli.command {
            Commands::Encrypt { args } => {
                assert_eq!(args.scheme, Some(EncryptionScheme::AesCtrNoPadding));
                assert_eq!(args.io.output, Some(PathBuf::from("out.bin")));
                assert_eq!(args.io.input_encoding, Encoding::Raw);
            },
            _ => panic!("expected encrypt"),
        }
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        assert!(Cli::try_parse_from(["sigil", "hash", "-a", "md5"]).is_err());
    }
}
