//! Capability facade over the primitives.
//!
//! [`CryptoProvider`] is the message-level interface: random bytes,
//! HMAC-SHA256, SHA-512 and AES-256 encryption by [`EncryptionScheme`].
//! [`CryptoBackend`] is the lower-level capability set (hash, MAC, single
//! block). [`SoftwareProvider`] implements both on top of this crate.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::aes::{Aes, KeySize};
use crate::cbc::{cbc_decrypt, cbc_encrypt};
use crate::cipher::{BLOCK_LEN, Block, BlockCipher};
use crate::ctr::CtrStream;
use crate::digest::Digest;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{HashAlgorithm, HashFunction, Sha512, hash};
use crate::hmac::{HmacSha256, hmac};

/// Key length accepted by [`CryptoProvider::encrypt`] and
/// [`CryptoProvider::decrypt`].
pub const PROVIDER_KEY_LEN: usize = 32;

/// Message encryption scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncryptionScheme {
    /// AES-CBC with PKCS#7 padding.
    #[default]
    AesCbcPkcs7,
    /// AES-CTR; ciphertext length equals plaintext length.
    AesCtrNoPadding,
}

impl EncryptionScheme {
    /// Canonical name, as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AesCbcPkcs7 => "aes-cbc-pkcs7",
            Self::AesCtrNoPadding => "aes-ctr-no-padding",
        }
    }
}

impl fmt::Display for EncryptionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncryptionScheme {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aes-cbc-pkcs7" | "cbc" => Ok(Self::AesCbcPkcs7),
            "aes-ctr-no-padding" | "aes-ctr" | "ctr" => Ok(Self::AesCtrNoPadding),
            _ => Err(CryptoError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Message-level cryptographic capabilities.
pub trait CryptoProvider: Send + Sync {
    /// `len` bytes from a cryptographically secure source.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomGeneration`] if the source fails.
    fn random(&self, len: usize) -> CryptoResult<Vec<u8>>;

    /// HMAC-SHA256 of `message` under `key`.
    fn hmac_sha256(&self, message: &[u8], key: &[u8]) -> Digest;

    /// SHA-512 of `message`.
    ///
    /// # Errors
    ///
    /// Implementations backed by fallible hardware may fail; the software
    /// provider never does.
    fn sha512(&self, message: &[u8]) -> CryptoResult<Digest>;

    /// Encrypt `message` with a 32-byte key and 16-byte IV.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidMessage`] for an empty message,
    /// [`CryptoError::InvalidKeySize`] unless `key` is 32 bytes, or
    /// [`CryptoError::InvalidIvLength`] unless `iv` is 16 bytes.
    fn encrypt(
        &self,
        message: &[u8],
        scheme: EncryptionScheme,
        key: &[u8],
        iv: &[u8],
    ) -> CryptoResult<Vec<u8>>;

    /// Decrypt `message` with a 32-byte key and 16-byte IV.
    ///
    /// # Errors
    ///
    /// As for [`encrypt`](Self::encrypt), plus the CBC length and padding
    /// errors.
    fn decrypt(
        &self,
        message: &[u8],
        scheme: EncryptionScheme,
        key: &[u8],
        iv: &[u8],
    ) -> CryptoResult<Vec<u8>>;
}

/// Low-level capability set: hash, MAC and single-block encryption.
pub trait CryptoBackend: Send + Sync {
    /// One-shot hash.
    fn hash(&self, algorithm: HashAlgorithm, data: &[u8]) -> Digest;

    /// One-shot MAC.
    fn hmac(&self, algorithm: HashAlgorithm, key: &[u8], data: &[u8]) -> Digest;

    /// Encrypt one block in place under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeySize`] for a bad key.
    fn block_encrypt(&self, key: &[u8], block: &mut Block) -> CryptoResult<()>;
}

/// Provider backed by this crate's software primitives and the OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareProvider;

impl SoftwareProvider {
    /// Create a software provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn checked_inputs(message: &[u8], key: &[u8], iv: &[u8]) -> CryptoResult<(Aes, Block)> {
        if message.is_empty() {
            tracing::warn!("rejecting empty message");
            return Err(CryptoError::InvalidMessage("message is empty".into()));
        }
        if key.len() != PROVIDER_KEY_LEN {
            tracing::warn!(key_len = key.len(), "rejecting non AES-256 key");
            return Err(CryptoError::InvalidKeySize { actual: key.len() });
        }
        let iv: Block = iv.try_into().map_err(|_| {
            tracing::warn!(iv_len = iv.len(), "rejecting IV of wrong length");
            CryptoError::InvalidIvLength {
                expected: BLOCK_LEN,
                actual: iv.len(),
            }
        })?;
        let cipher = Aes::new(key)?;
        debug_assert_eq!(cipher.key_size(), KeySize::Aes256);
        Ok((cipher, iv))
    }
}

impl CryptoProvider for SoftwareProvider {
    fn random(&self, len: usize) -> CryptoResult<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::RandomGeneration(e.to_string()))?;
        Ok(bytes)
    }

    fn hmac_sha256(&self, message: &[u8], key: &[u8]) -> Digest {
        HmacSha256::mac(key, message)
    }

    fn sha512(&self, message: &[u8]) -> CryptoResult<Digest> {
        Ok(Sha512::digest(message))
    }

    fn encrypt(
        &self,
        message: &[u8],
        scheme: EncryptionScheme,
        key: &[u8],
        iv: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let (cipher, iv) = Self::checked_inputs(message, key, iv)?;
        tracing::debug!(%scheme, len = message.len(), "encrypting");
        match scheme {
            EncryptionScheme::AesCbcPkcs7 => Ok(cbc_encrypt(&cipher, &iv, message)),
            EncryptionScheme::AesCtrNoPadding => CtrStream::new(cipher, iv).process(message),
        }
    }

    fn decrypt(
        &self,
        message: &[u8],
        scheme: EncryptionScheme,
        key: &[u8],
        iv: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let (cipher, iv) = Self::checked_inputs(message, key, iv)?;
        tracing::debug!(%scheme, len = message.len(), "decrypting");
        match scheme {
            EncryptionScheme::AesCbcPkcs7 => cbc_decrypt(&cipher, &iv, message),
            EncryptionScheme::AesCtrNoPadding => CtrStream::new(cipher, iv).process(message),
        }
    }
}

impl CryptoBackend for SoftwareProvider {
    fn hash(&self, algorithm: HashAlgorithm, data: &[u8]) -> Digest {
        hash(algorithm, data)
    }

    fn hmac(&self, algorithm: HashAlgorithm, key: &[u8], data: &[u8]) -> Digest {
        hmac(algorithm, key, data)
    }

    fn block_encrypt(&self, key: &[u8], block: &mut Block) -> CryptoResult<()> {
        Aes::new(key)?.encrypt_block(block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x5a; 32];
    const IV: [u8; 16] = [0xc3; 16];

    #[test]
    fn test_scheme_names() {
        for scheme in [EncryptionScheme::AesCbcPkcs7, EncryptionScheme::AesCtrNoPadding] {
            assert_eq!(scheme.to_string().parse::<EncryptionScheme>().unwrap(), scheme);
        }
        assert_eq!(
            "CTR".parse::<EncryptionScheme>().unwrap(),
            EncryptionScheme::AesCtrNoPadding
        );
        assert!("gcm".parse::<EncryptionScheme>().is_err());
    }

    #[test]
    fn test_scheme_serde() {
        let json = serde_json::to_string(&EncryptionScheme::AesCtrNoPadding).unwrap();
        assert_eq!(json, "\"aes-ctr-no-padding\"");
        let parsed: EncryptionScheme = serde_json::from_str("\"aes-cbc-pkcs7\"").unwrap();
        assert_eq!(parsed, EncryptionScheme::AesCbcPkcs7);
    }

    #[test]
    fn test_random() {
        let provider = SoftwareProvider::new();
        let a = provider.random(32).unwrap();
        let b = provider.random(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(provider.random(0).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_both_schemes() {
        let provider = SoftwareProvider::new();
        let message = b"provider level round trip";
        for scheme in [EncryptionScheme::AesCbcPkcs7, EncryptionScheme::AesCtrNoPadding] {
            let ct = provider.encrypt(message, scheme, &KEY, &IV).unwrap();
            assert_ne!(ct.as_slice(), message.as_slice());
            assert_eq!(provider.decrypt(&ct, scheme, &KEY, &IV).unwrap(), message);
        }
    }

    #[test]
    fn test_ctr_preserves_length() {
        let provider = SoftwareProvider::new();
        let ct = provider
            .encrypt(b"seventeen bytes!!", EncryptionScheme::AesCtrNoPadding, &KEY, &IV)
            .unwrap();
        assert_eq!(ct.len(), 17);
    }

    #[test]
    fn test_guards() {
        let provider = SoftwareProvider::new();
        let scheme = EncryptionScheme::AesCbcPkcs7;
        assert!(matches!(
            provider.encrypt(b"", scheme, &KEY, &IV),
            Err(CryptoError::InvalidMessage(_))
        ));
        assert!(matches!(
            provider.decrypt(b"", scheme, &KEY, &IV),
            Err(CryptoError::InvalidMessage(_))
        ));
        assert_eq!(
            provider.encrypt(b"m", scheme, &[0u8; 16], &IV),
            Err(CryptoError::InvalidKeySize { actual: 16 })
        );
        assert_eq!(
            provider.encrypt(b"m", scheme, &KEY, &[0u8; 12]),
            Err(CryptoError::InvalidIvLength {
                expected: 16,
                actual: 12
            })
        );
    }

    #[test]
    fn test_digests_match_engines() {
        let provider = SoftwareProvider::new();
        assert_eq!(
            provider.sha512(b"").unwrap(),
            hash(HashAlgorithm::Sha512, b"")
        );
        assert_eq!(
            provider.hmac_sha256(b"data", b"key"),
            hmac(HashAlgorithm::Sha256, b"key", b"data")
        );
        assert_eq!(
            CryptoBackend::hmac(&provider, HashAlgorithm::Sha512, b"key", b"data"),
            hmac(HashAlgorithm::Sha512, b"key", b"data")
        );
    }

    #[test]
    fn test_block_encrypt() {
        // FIPS 197 Appendix C.1
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let mut block: Block = hex::decode("00112233445566778899aabbccddeeff")
            .unwrap()
            .try_into()
            .unwrap();
        SoftwareProvider.block_encrypt(&key, &mut block).unwrap();
        assert_eq!(hex::encode(block), "69c4e0d86a7b0430d8cdb78070b4c55a");
        assert!(SoftwareProvider.block_encrypt(&[0u8; 12], &mut block).is_err());
    }
}
