//! Bridge from `sigil_config::Config` to domain types.

use anyhow::{Context, Result};
use sigil_config::Config;
use sigil_crypto::{EncryptionScheme, HashAlgorithm};

use crate::io::Encoding;

/// Per-invocation defaults taken from the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Defaults {
    pub(crate) hash: HashAlgorithm,
    pub(crate) scheme: EncryptionScheme,
    pub(crate) encoding: Encoding,
}

impl Defaults {
    /// Parse the `[crypto]` section.
    pub(crate) fn from_config(config: &Config) -> Result<Self> {
        let crypto = &config.crypto;
        Ok(Self {
            hash: crypto
                .default_hash
                .parse()
                .context("crypto.default_hash")?,
            scheme: crypto
                .default_scheme
                .parse()
                .context("crypto.default_scheme")?,
            encoding: crypto
                .output_encoding
                .parse()
                .context("crypto.output_encoding")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let defaults = Defaults::from_config(&Config::default()).unwrap();
        assert_eq!(defaults.hash, HashAlgorithm::Sha256);
        assert_eq!(defaults.scheme, EncryptionScheme::AesCbcPkcs7);
        assert_eq!(defaults.encoding, Encoding::Hex);
    }

    #[test]
    fn test_custom_config() {
        let mut config = Config::default();
        config.crypto.default_hash = "sha512".to_owned();
        config.crypto.default_scheme = "aes-ctr-no-padding".to_owned();
        config.crypto.output_encoding = "base64".to_owned();
        let defaults = Defaults::from_config(&config).unwrap();
        assert_eq!(defaults.hash, HashAlgorithm::Sha512);
        assert_eq!(defaults.scheme, EncryptionScheme::AesCtrNoPadding);
        assert_eq!(defaults.encoding, Encoding::Base64);
    }
}
