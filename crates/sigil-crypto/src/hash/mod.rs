//! Secure hash functions (SHA-256, SHA-512).
//!
//! Two layers are provided:
//! - [`Sha256`] and [`Sha512`]: typed cores implementing [`HashFunction`],
//!   whose `finalize` consumes the state.
//! - [`Hasher`]: algorithm chosen at runtime, with a terminal state that
//!   reports [`CryptoError::InvalidStateReuse`] on misuse.

mod buffer;
mod sha256;
mod sha512;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::digest::Digest;
use crate::error::{CryptoError, CryptoResult};

pub use sha256::Sha256;
pub use sha512::Sha512;

/// Supported hash algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256: 64-byte blocks, 32-byte digest.
    #[default]
    Sha256,
    /// SHA-512: 128-byte blocks, 64-byte digest.
    Sha512,
}

impl HashAlgorithm {
    /// Internal block size in bytes.
    #[must_use]
    pub const fn block_len(self) -> usize {
        match self {
            Self::Sha256 => Sha256::BLOCK_LEN,
            Self::Sha512 => Sha512::BLOCK_LEN,
        }
    }

    /// Digest size in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => Sha256::OUTPUT_LEN,
            Self::Sha512 => Sha512::OUTPUT_LEN,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CryptoError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// A Merkle-Damgard hash function with a fixed block and output size.
pub trait HashFunction: Clone + Zeroize + Send + Sync {
    /// Algorithm identifier.
    const ALGORITHM: HashAlgorithm;
    /// Internal block size in bytes.
    const BLOCK_LEN: usize;
    /// Digest size in bytes.
    const OUTPUT_LEN: usize;

    /// Fresh state seeded with the initial hash value.
    fn new() -> Self;

    /// Absorb `data`. Any number of calls, including empty slices.
    fn update(&mut self, data: &[u8]);

    /// Pad, flush and serialize the digest.
    fn finalize(self) -> Digest;

    /// One-shot hash of `data`.
    #[must_use]
    fn digest(data: &[u8]) -> Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

#[derive(Clone)]
enum HasherCore {
    Sha256(Sha256),
    Sha512(Sha512),
}

/// Hash state with the algorithm selected at construction time.
///
/// After [`finalize`](Self::finalize) the state is terminal: further
/// `update` or `finalize` calls return [`CryptoError::InvalidStateReuse`].
///
/// A `Hasher` is not internally synchronized. Callers sharing one across
/// threads must serialize access themselves.
#[derive(Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    core: Option<HasherCore>,
}

impl Hasher {
    /// Create a new hash state for `algorithm`.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let core = match algorithm {
            HashAlgorithm::Sha256 => HasherCore::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => HasherCore::Sha512(Sha512::new()),
        };
        Self {
            algorithm,
            core: Some(core),
        }
    }

    /// The algorithm this state computes.
    #[must_use]
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Whether `finalize` has already been called.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.core.is_none()
    }

    /// Absorb more input.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidStateReuse`] if the state was finalized.
    pub fn update(&mut self, data: &[u8]) -> CryptoResult<()> {
        match self.core.as_mut() {
            Some(HasherCore::Sha256(h)) => h.update(data),
            Some(HasherCore::Sha512(h)) => h.update(data),
            None => return Err(CryptoError::InvalidStateReuse { operation: "update" }),
        }
        Ok(())
    }

    /// Produce the digest and leave the state terminal.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidStateReuse`] on a second call.
    pub fn finalize(&mut self) -> CryptoResult<Digest> {
        let core = self.core.take().ok_or(CryptoError::InvalidStateReuse {
            operation: "finalize",
        })?;
        Ok(match core {
            HasherCore::Sha256(h) => h.finalize(),
            HasherCore::Sha512(h) => h.finalize(),
        })
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("algorithm", &self.algorithm)
            .field("finalized", &self.is_finalized())
            .finish()
    }
}

/// One-shot hash of `data` with `algorithm`.
#[must_use]
pub fn hash(algorithm: HashAlgorithm, data: &[u8]) -> Digest {
    match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(data),
        HashAlgorithm::Sha512 => Sha512::digest(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_sizes() {
        assert_eq!(HashAlgorithm::Sha256.block_len(), 64);
        assert_eq!(HashAlgorithm::Sha256.output_len(), 32);
        assert_eq!(HashAlgorithm::Sha512.block_len(), 128);
        assert_eq!(HashAlgorithm::Sha512.output_len(), 64);
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA-512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert!(matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(CryptoError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_hasher_matches_one_shot() {
        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
            let mut hasher = Hasher::new(algorithm);
            hasher.update(b"hello").unwrap();
            hasher.update(b"").unwrap();
            hasher.update(b" world").unwrap();
            assert_eq!(hasher.finalize().unwrap(), hash(algorithm, b"hello world"));
        }
    }

    #[test]
    fn test_finalize_twice_is_rejected() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha256);
        hasher.finalize().unwrap();
        assert!(hasher.is_finalized());
        assert_eq!(
            hasher.finalize(),
            Err(CryptoError::InvalidStateReuse {
                operation: "finalize"
            })
        );
    }

    #[test]
    fn test_update_after_finalize_is_rejected() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha512);
        hasher.finalize().unwrap();
        assert_eq!(
            hasher.update(b"late"),
            Err(CryptoError::InvalidStateReuse { operation: "update" })
        );
    }

    #[test]
    fn test_hash_is_pure() {
        let first = hash(HashAlgorithm::Sha512, b"repeatable");
        let second = hash(HashAlgorithm::Sha512, b"repeatable");
        assert_eq!(first, second);
        assert_eq!(first.algorithm(), HashAlgorithm::Sha512);
    }
}
