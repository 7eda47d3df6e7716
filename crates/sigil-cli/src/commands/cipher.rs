//! `ctr`, `encrypt` and `decrypt` commands.

use std::path::Path;

use anyhow::{Context, Result};
use sigil_crypto::{CryptoProvider, EncryptionScheme, SoftwareProvider, aes_ctr_transform};

use crate::io::{Encoding, block_hex, read_input, secret_hex, write_output};

/// Where data comes from and goes to, and how it is encoded on each side.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Streams<'a> {
    pub(crate) input: Option<&'a Path>,
    pub(crate) input_encoding: Encoding,
    pub(crate) output: Option<&'a Path>,
    pub(crate) output_encoding: Encoding,
}

impl Streams<'_> {
    fn read(&self) -> Result<Vec<u8>> {
        self.input_encoding.decode(&read_input(self.input)?)
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        write_output(self.output, &self.output_encoding.encode(bytes))
    }
}

/// AES-CTR transform with any AES key size. Encrypts and decrypts alike.
pub(crate) fn run_ctr(key_hex: &str, counter_hex: &str, streams: Streams<'_>) -> Result<()> {
    let key = secret_hex("key", key_hex)?;
    let counter = block_hex("counter", counter_hex)?;
    let data = streams.read()?;
    let output = aes_ctr_transform(&key, &counter, &data).context("AES-CTR failed")?;
    streams.write(&output)
}

/// Direction for [`run_scheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

/// Provider-level AES-256 encryption or decryption.
pub(crate) fn run_scheme(
    direction: Direction,
    scheme: EncryptionScheme,
    key_hex: &str,
    iv_hex: &str,
    streams: Streams<'_>,
) -> Result<()> {
    let key = secret_hex("key", key_hex)?;
    let iv = hex::decode(iv_hex.trim()).context("--iv must be hex")?;
    let data = streams.read()?;

    let provider = SoftwareProvider::new();
    let output = match direction {
        Direction::Encrypt => provider.encrypt(&data, scheme, &key, &iv),
        Direction::Decrypt => provider.decrypt(&data, scheme, &key, &iv),
    }
    .with_context(|| format!("{scheme} {direction:?} failed").to_lowercase())?;
    streams.write(&output)
}
