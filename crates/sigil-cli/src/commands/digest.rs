//! `hash` and `hmac` commands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use sigil_crypto::{CryptoError, HashAlgorithm, Hasher, HmacState};

use crate::io::{Encoding, read_input, secret_hex, write_output};

/// Hash the input and print the digest.
pub(crate) fn run_hash(
    algorithm: HashAlgorithm,
    input: Option<&Path>,
    encoding: Encoding,
) -> Result<()> {
    let data = read_input(input)?;
    let mut hasher = Hasher::new(algorithm);
    hasher.update(&data)?;
    let digest = hasher.finalize()?;
    write_output(None, &encoding.encode(digest.as_bytes()))
}

/// MAC the input, then print the tag or check it against `expected`.
pub(crate) fn run_hmac(
    algorithm: HashAlgorithm,
    key_hex: &str,
    input: Option<&Path>,
    expected: Option<&str>,
    encoding: Encoding,
) -> Result<()> {
    let key = secret_hex("key", key_hex)?;
    let data = read_input(input)?;
    let mut mac = HmacState::new(algorithm, &key);
    mac.update(&data)?;

    let Some(expected) = expected else {
        let tag = mac.finalize()?;
        return write_output(None, &encoding.encode(tag.as_bytes()));
    };

    let expected = hex::decode(expected.trim()).context("--verify must be hex")?;
    match mac.verify(&expected) {
        Ok(()) => {
            println!("OK");
            Ok(())
        },
        Err(CryptoError::TagMismatch) => bail!("tag mismatch"),
        Err(e) => Err(e.into()),
    }
}
