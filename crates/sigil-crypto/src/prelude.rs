//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sigil_crypto::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use sigil_crypto::prelude::*;
//!
//! let key = [7u8; 32];
//! let iv = [1u8; 16];
//! let provider = SoftwareProvider::new();
//! let ct = provider
//!     .encrypt(b"hello", EncryptionScheme::AesCbcPkcs7, &key, &iv)
//!     .unwrap();
//! let pt = provider
//!     .decrypt(&ct, EncryptionScheme::AesCbcPkcs7, &key, &iv)
//!     .unwrap();
//! assert_eq!(pt, b"hello");
//! ```

// Errors
pub use crate::{CryptoError, CryptoResult};

// Hashing
pub use crate::{Digest, HashAlgorithm, HashFunction, Hasher, hash};

// MACs
pub use crate::{HmacState, hmac};

// Block cipher and modes
pub use crate::{Aes, Block, BlockCipher, CtrStream, aes_ctr_transform};

// Providers
pub use crate::{CryptoBackend, CryptoProvider, EncryptionScheme, SoftwareProvider};
