//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Cipher key has an unsupported length.
    #[error("invalid key size: {actual} bytes")]
    InvalidKeySize {
        /// Actual length in bytes.
        actual: usize,
    },

    /// A hash or MAC state was used after it was finalized.
    #[error("invalid state reuse: {operation} called after finalize")]
    InvalidStateReuse {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The counter block would wrap past 2^128 - 1.
    #[error("counter overflow: keystream exhausted for this key and nonce")]
    CounterOverflow,

    /// Invalid initialization vector length.
    #[error("invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// The message was rejected before processing.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Ciphertext length is not a positive multiple of the block size.
    #[error("invalid ciphertext length: {0} bytes")]
    InvalidCiphertextLength(usize),

    /// PKCS#7 padding did not verify after decryption.
    #[error("invalid padding")]
    InvalidPadding,

    /// Authentication tag did not match.
    #[error("authentication tag mismatch")]
    TagMismatch,

    /// Unrecognized algorithm or scheme name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The operating system RNG failed.
    #[error("random generation failed: {0}")]
    RandomGeneration(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
