//! Input, output and argument encoding helpers shared by the commands.

use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::ValueEnum;
use zeroize::Zeroizing;

/// How binary data is rendered on output or interpreted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Encoding {
    /// Lowercase hexadecimal.
    #[default]
    Hex,
    /// Standard base64 with padding.
    Base64,
    /// Bytes as-is.
    Raw,
}

impl FromStr for Encoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            "raw" => Ok(Self::Raw),
            other => bail!("unknown encoding '{other}'"),
        }
    }
}

impl Encoding {
    /// Render `bytes`. Text encodings end with a newline.
    pub(crate) fn encode(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Hex => format!("{}\n", hex::encode(bytes)).into_bytes(),
            Self::Base64 => format!("{}\n", BASE64.encode(bytes)).into_bytes(),
            Self::Raw => bytes.to_vec(),
        }
    }

    /// Parse `data` produced by [`encode`](Self::encode) or typed by hand.
    ///
    /// Surrounding whitespace is ignored for the text encodings.
    pub(crate) fn decode(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Raw => Ok(data.to_vec()),
            Self::Hex | Self::Base64 => {
                let text = std::str::from_utf8(data).context("encoded input is not UTF-8")?;
                let text = text.trim();
                if self == Self::Hex {
                    hex::decode(text).context("input is not valid hex")
                } else {
                    BASE64.decode(text).context("input is not valid base64")
                }
            },
        }
    }
}

/// Read all of `path`, or stdin when `path` is `None` or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    match path {
        Some(p) if p != Path::new("-") => {
            data = std::fs::read(p).with_context(|| format!("failed to read {}", p.display()))?;
        },
        _ => {
            std::io::stdin()
                .read_to_end(&mut data)
                .context("failed to read stdin")?;
        },
    }
    Ok(data)
}

/// Write `bytes` to `path`, or stdout when `path` is `None`.
pub(crate) fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, bytes).with_context(|| format!("failed to write {}", p.display()))
        },
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write stdout")?;
            stdout.flush().context("failed to flush stdout")
        },
    }
}

/// Decode a hex command-line argument holding key material.
pub(crate) fn secret_hex(name: &str, value: &str) -> Result<Zeroizing<Vec<u8>>> {
    hex::decode(value.trim())
        .map(Zeroizing::new)
        .with_context(|| format!("--{name} must be hex"))
}

/// Decode a hex argument that must be exactly one cipher block.
pub(crate) fn block_hex(name: &str, value: &str) -> Result<[u8; 16]> {
    let bytes = hex::decode(value.trim()).with_context(|| format!("--{name} must be hex"))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("--{name} must be 16 bytes (32 hex digits), got {len} bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_text() {
        let bytes = [0u8, 1, 0xfe, 0xff];
        for encoding in [Encoding::Hex, Encoding::Base64, Encoding::Raw] {
            let encoded = encoding.encode(&bytes);
            assert_eq!(encoding.decode(&encoded).unwrap(), bytes);
        }
        assert_eq!(Encoding::Hex.encode(&bytes), b"0001feff\n");
        assert_eq!(Encoding::Base64.encode(b"abc"), b"YWJj\n");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Encoding::Hex.decode(b"zz").is_err());
        assert!(Encoding::Base64.decode(b"!!!").is_err());
    }

    #[test]
    fn test_encoding_from_config_name() {
        assert_eq!("base64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert!("base32".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_block_hex() {
        assert_eq!(
            block_hex("iv", "000102030405060708090a0b0c0d0e0f").unwrap()[15],
            0x0f
        );
        let err = block_hex("iv", "0001").unwrap_err();
        assert!(err.to_string().contains("16 bytes"));
        assert!(block_hex("iv", "not hex").is_err());
    }

    #[test]
    fn test_secret_hex_trims() {
        assert_eq!(secret_hex("key", " 0a0b \n").unwrap().as_slice(), &[0x0a, 0x0b]);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        write_output(Some(&path), b"payload").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), b"payload");
    }
}
