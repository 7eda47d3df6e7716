//! `random` command.

use anyhow::{Result, ensure};
use sigil_crypto::{CryptoProvider, SoftwareProvider};

use crate::io::{Encoding, write_output};

/// Largest request accepted in one call.
const MAX_RANDOM_BYTES: usize = 1 << 20;

/// Print `len` bytes from the OS RNG.
pub(crate) fn run_random(len: usize, encoding: Encoding) -> Result<()> {
    ensure!(
        len <= MAX_RANDOM_BYTES,
        "refusing to generate more than {MAX_RANDOM_BYTES} bytes"
    );
    let bytes = SoftwareProvider::new().random(len)?;
    write_output(None, &encoding.encode(&bytes))
}
