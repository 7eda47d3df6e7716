//! HMAC (RFC 2104) over the SHA-2 hashes.
//!
//! `HMAC(K, m) = H((K' ^ opad) || H((K' ^ ipad) || m))`, where `K'` is the key
//! hashed (if longer than a block) and zero-padded to the hash block size.

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

use crate::digest::Digest;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{HashAlgorithm, HashFunction, Sha256, Sha512};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC over a typed hash core.
///
/// Both contexts are seeded from the padded key at construction; the key
/// itself is not retained. The contexts zeroize themselves on drop.
#[derive(Clone)]
pub struct Hmac<H: HashFunction> {
    inner: H,
    outer: H,
}

impl<H: HashFunction> Hmac<H> {
    /// Create a MAC keyed with `key` (any length).
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        let mut block_key = Zeroizing::new(vec![0u8; H::BLOCK_LEN]);
        if key.len() > H::BLOCK_LEN {
            let mut hashed = H::digest(key);
            block_key[..H::OUTPUT_LEN].copy_from_slice(hashed.as_bytes());
            hashed.zeroize();
        } else {
            block_key[..key.len()].copy_from_slice(key);
        }

        Self {
            inner: seeded::<H>(&block_key, IPAD),
            outer: seeded::<H>(&block_key, OPAD),
        }
    }

    /// Feed message bytes into the inner context.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Complete the inner hash and fold it into the outer context.
    #[must_use]
    pub fn finalize(self) -> Digest {
        let Self { inner, mut outer } = self;
        let mut inner_digest = inner.finalize();
        outer.update(inner_digest.as_bytes());
        inner_digest.zeroize();
        outer.finalize()
    }

    /// Finalize and compare against `expected` in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::TagMismatch`] if the tags differ.
    pub fn verify(self, expected: &[u8]) -> CryptoResult<()> {
        if self.finalize().ct_eq(expected) {
            Ok(())
        } else {
            Err(CryptoError::TagMismatch)
        }
    }

    /// One-shot MAC of `data` under `key`.
    #[must_use]
    pub fn mac(key: &[u8], data: &[u8]) -> Digest {
        let mut mac = Self::new(key);
        mac.update(data);
        mac.finalize()
    }
}

impl<H: HashFunction> fmt::Debug for Hmac<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmac")
            .field("algorithm", &H::ALGORITHM)
            .finish_non_exhaustive()
    }
}

/// Hash context that has already absorbed `K' ^ pad`.
fn seeded<H: HashFunction>(block_key: &[u8], pad: u8) -> H {
    let padded: Zeroizing<Vec<u8>> = Zeroizing::new(block_key.iter().map(|b| b ^ pad).collect());
    let mut hasher = H::new();
    hasher.update(&padded);
    hasher
}

/// HMAC-SHA256.
pub type HmacSha256 = Hmac<Sha256>;
/// HMAC-SHA512.
pub type HmacSha512 = Hmac<Sha512>;

#[derive(Clone)]
enum MacCore {
    Sha256(HmacSha256),
    Sha512(HmacSha512),
}

/// HMAC state with the hash algorithm selected at construction time.
///
/// Finalization is single use: a second `finalize` (or `verify`), or an
/// `update` after it, returns [`CryptoError::InvalidStateReuse`].
///
/// Not internally synchronized; concurrent use of one instance must be
/// serialized by the caller.
#[derive(Clone)]
pub struct HmacState {
    algorithm: HashAlgorithm,
    core: Option<MacCore>,
}

impl HmacState {
    /// Key a new MAC for `algorithm`.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, key: &[u8]) -> Self {
        tracing::trace!(%algorithm, key_len = key.len(), "initializing HMAC");
        let core = match algorithm {
            HashAlgorithm::Sha256 => MacCore::Sha256(Hmac::new(key)),
            HashAlgorithm::Sha512 => MacCore::Sha512(Hmac::new(key)),
        };
        Self {
            algorithm,
            core: Some(core),
        }
    }

    /// The underlying hash algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Whether the tag has already been produced.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.core.is_none()
    }

    /// Feed message bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidStateReuse`] after finalization.
    pub fn update(&mut self, data: &[u8]) -> CryptoResult<()> {
        match self.core.as_mut() {
            Some(MacCore::Sha256(mac)) => mac.update(data),
            Some(MacCore::Sha512(mac)) => mac.update(data),
            None => return Err(CryptoError::InvalidStateReuse { operation: "update" }),
        }
        Ok(())
    }

    /// Produce the tag.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidStateReuse`] on a second call.
    pub fn finalize(&mut self) -> CryptoResult<Digest> {
        let core = self.take_core("finalize")?;
        Ok(match core {
            MacCore::Sha256(mac) => mac.finalize(),
            MacCore::Sha512(mac) => mac.finalize(),
        })
    }

    /// Produce the tag and compare it against `expected` in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::TagMismatch`] if the tags differ, or
    /// [`CryptoError::InvalidStateReuse`] if already finalized.
    pub fn verify(&mut self, expected: &[u8]) -> CryptoResult<()> {
        match self.take_core("verify")? {
            MacCore::Sha256(mac) => mac.verify(expected),
            MacCore::Sha512(mac) => mac.verify(expected),
        }
    }

    fn take_core(&mut self, operation: &'static str) -> CryptoResult<MacCore> {
        self.core
            .take()
            .ok_or(CryptoError::InvalidStateReuse { operation })
    }
}

impl fmt::Debug for HmacState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacState")
            .field("algorithm", &self.algorithm)
            .field("finalized", &self.is_finalized())
            .finish()
    }
}

/// One-shot HMAC of `data` under `key` with `algorithm`.
#[must_use]
pub fn hmac(algorithm: HashAlgorithm, key: &[u8], data: &[u8]) -> Digest {
    match algorithm {
        HashAlgorithm::Sha256 => HmacSha256::mac(key, data),
        HashAlgorithm::Sha512 => HmacSha512::mac(key, data),
    }
}
