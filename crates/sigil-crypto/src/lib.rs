//! Sigil Crypto - software SHA-2, HMAC and AES primitives.
//!
//! This crate provides:
//! - SHA-256 and SHA-512 (FIPS 180-4), streaming and one-shot
//! - HMAC over either hash (RFC 2104)
//! - The AES block cipher with 128, 192 and 256-bit keys (FIPS 197)
//! - AES counter mode with a big-endian 128-bit counter
//! - AES-CBC with PKCS#7 padding
//! - A [`CryptoProvider`] facade for message-level encryption and MACs
//!
//! Every primitive is implemented in this crate. Key material lives only in
//! engine state and is zeroized on drop.
//!
//! # Example
//!
//! ```
//! use sigil_crypto::{HashAlgorithm, Hasher, aes_ctr_transform, hash, hmac};
//!
//! // One-shot and streaming hashing agree
//! let digest = hash(HashAlgorithm::Sha256, b"abc");
//! let mut hasher = Hasher::new(HashAlgorithm::Sha256);
//! hasher.update(b"a").unwrap();
//! hasher.update(b"bc").unwrap();
//! assert_eq!(hasher.finalize().unwrap(), digest);
//!
//! // Message authentication
//! let tag = hmac(HashAlgorithm::Sha512, b"key", b"message");
//! assert_eq!(tag.as_bytes().len(), 64);
//!
//! // Counter mode is its own inverse
//! let key = [0u8; 16];
//! let counter = [0u8; 16];
//! let ciphertext = aes_ctr_transform(&key, &counter, b"plaintext").unwrap();
//! let plaintext = aes_ctr_transform(&key, &counter, &ciphertext).unwrap();
//! assert_eq!(plaintext, b"plaintext");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod aes;
mod cbc;
mod cipher;
mod ctr;
mod digest;
mod error;
mod hash;
mod hmac;
mod provider;

pub use aes::{Aes, KeySize};
pub use cbc::{aes_cbc_decrypt, aes_cbc_encrypt, cbc_decrypt, cbc_encrypt};
pub use cipher::{BLOCK_LEN, Block, BlockCipher};
pub use ctr::{CtrStream, aes_ctr_transform};
pub use digest::{Digest, MAX_OUTPUT_LEN};
pub use error::{CryptoError, CryptoResult};
pub use hash::{HashAlgorithm, HashFunction, Hasher, Sha256, Sha512, hash};
pub use hmac::{Hmac, HmacSha256, HmacSha512, HmacState, hmac};
pub use provider::{
    CryptoBackend, CryptoProvider, EncryptionScheme, PROVIDER_KEY_LEN, SoftwareProvider,
};
