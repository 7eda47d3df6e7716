//! Fixed-length digest and tag values.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::hash::HashAlgorithm;

/// Largest output of any supported hash (SHA-512).
pub const MAX_OUTPUT_LEN: usize = 64;

/// The output of a hash or HMAC computation.
///
/// Holds the raw bytes in the order produced by finalization, together with
/// the algorithm that produced them. Text encodings are provided as helpers
/// only; the bytes themselves are the contract.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Zeroize)]
pub struct Digest {
    #[zeroize(skip)]
    algorithm: HashAlgorithm,
    bytes: [u8; MAX_OUTPUT_LEN],
}

impl Digest {
    /// Build a digest from finalized output. `bytes` must be the algorithm's
    /// output length.
    pub(crate) fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), algorithm.output_len());
        let mut buf = [0u8; MAX_OUTPUT_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self {
            algorithm,
            bytes: buf,
        }
    }

    /// Try to create from a slice.
    ///
    /// Returns `None` if the slice length differs from the algorithm's
    /// output length.
    #[must_use]
    pub fn try_from_slice(algorithm: HashAlgorithm, slice: &[u8]) -> Option<Self> {
        if slice.len() != algorithm.output_len() {
            return None;
        }
        Some(Self::new(algorithm, slice))
    }

    /// The algorithm that produced this digest.
    #[must_use]
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Get the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.algorithm.output_len()]
    }

    /// Copy the raw bytes into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Compare against `other` in constant time.
    ///
    /// Slices of a different length compare unequal.
    #[must_use]
    pub fn ct_eq(&self, other: &[u8]) -> bool {
        self.as_bytes().ct_eq(other).into()
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Decode from hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or has the wrong length
    /// for `algorithm`.
    pub fn from_hex(algorithm: HashAlgorithm, s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        Self::try_from_slice(algorithm, &bytes).ok_or(hex::FromHexError::InvalidStringLength)
    }

    /// Encode as base64 string.
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(self.as_bytes())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}:{})", self.algorithm, &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_follows_algorithm() {
        let short = Digest::new(HashAlgorithm::Sha256, &[7u8; 32]);
        let long = Digest::new(HashAlgorithm::Sha512, &[7u8; 64]);
        assert_eq!(short.as_bytes().len(), 32);
        assert_eq!(long.as_bytes().len(), 64);
    }

    #[test]
    fn test_try_from_slice_rejects_wrong_length() {
        assert!(Digest::try_from_slice(HashAlgorithm::Sha256, &[0u8; 31]).is_none());
        assert!(Digest::try_from_slice(HashAlgorithm::Sha512, &[0u8; 32]).is_none());
        assert!(Digest::try_from_slice(HashAlgorithm::Sha256, &[0u8; 32]).is_some());
    }

    #[test]
    fn test_hex_encoding() {
        let digest = Digest::new(HashAlgorithm::Sha256, &[0xab; 32]);
        let decoded = Digest::from_hex(HashAlgorithm::Sha256, &digest.to_hex()).unwrap();
        assert_eq!(digest, decoded);
        assert!(Digest::from_hex(HashAlgorithm::Sha512, &digest.to_hex()).is_err());
    }

    #[test]
    fn test_ct_eq() {
        let digest = Digest::new(HashAlgorithm::Sha256, &[1u8; 32]);
        assert!(digest.ct_eq(&[1u8; 32]));
        assert!(!digest.ct_eq(&[2u8; 32]));
        assert!(!digest.ct_eq(&[1u8; 31]));
    }

    #[test]
    fn test_zeroize() {
        let mut digest = Digest::new(HashAlgorithm::Sha256, &[0xff; 32]);
        digest.zeroize();
        assert_eq!(digest.as_bytes(), &[0u8; 32]);
    }
}
