//! AES block cipher (FIPS 197) for 128, 192 and 256-bit keys.
//!
//! The state is kept as 16 bytes in FIPS column-major order
//! (`state[row + 4 * col]`), matching the input byte order directly.

// Byte and word indices are bounded by the fixed round and block sizes.
#![allow(clippy::arithmetic_side_effects)]

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cipher::{BLOCK_LEN, Block, BlockCipher};
use crate::error::{CryptoError, CryptoResult};

/// Forward S-box.
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Inverse S-box.
const INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

/// Key schedule round constants `x^(i-1)` in GF(2^8), starting at i = 1.
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Upper bound on round keys (AES-256 uses 14 rounds + the initial key).
const MAX_ROUND_KEYS: usize = 15;

/// Supported AES key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 128-bit key, 10 rounds.
    Aes128,
    /// 192-bit key, 12 rounds.
    Aes192,
    /// 256-bit key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Map a key length in bytes to its key size.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeySize`] for anything but 16, 24 or 32.
    pub const fn from_len(len: usize) -> CryptoResult<Self> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            actual => Err(CryptoError::InvalidKeySize { actual }),
        }
    }

    /// Key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Key length in bits.
    #[must_use]
    pub const fn bits(self) -> usize {
        self.key_len() * 8
    }

    /// Number of cipher rounds.
    #[must_use]
    pub const fn rounds(self) -> usize {
        match self {
            Self::Aes128 => 10,
            Self::Aes192 => 12,
            Self::Aes256 => 14,
        }
    }
}

/// An expanded AES key schedule.
///
/// Immutable after construction; the round keys are zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Aes {
    #[zeroize(skip)]
    key_size: KeySize,
    round_keys: [Block; MAX_ROUND_KEYS],
}

impl Aes {
    /// Expand `key` into a round-key schedule.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeySize`] unless `key` is 16, 24 or 32
    /// bytes long.
    pub fn new(key: &[u8]) -> CryptoResult<Self> {
        let key_size = KeySize::from_len(key.len())?;
        tracing::trace!(bits = key_size.bits(), "expanding AES key schedule");
        Ok(Self {
            key_size,
            round_keys: expand_key(key, key_size),
        })
    }

    /// The key size this schedule was built from.
    #[must_use]
    pub const fn key_size(&self) -> KeySize {
        self.key_size
    }

    fn rounds(&self) -> usize {
        self.key_size.rounds()
    }
}

impl BlockCipher for Aes {
    fn encrypt_block(&self, block: &mut Block) {
        let last = self.rounds();
        add_round_key(block, &self.round_keys[0]);
        for round_key in &self.round_keys[1..last] {
            sub_bytes(block);
            shift_rows(block);
            mix_columns(block);
            add_round_key(block, round_key);
        }
        sub_bytes(block);
        shift_rows(block);
        add_round_key(block, &self.round_keys[last]);
    }

    fn decrypt_block(&self, block: &mut Block) {
        let last = self.rounds();
        add_round_key(block, &self.round_keys[last]);
        for round_key in self.round_keys[1..last].iter().rev() {
            inv_shift_rows(block);
            inv_sub_bytes(block);
            add_round_key(block, round_key);
            inv_mix_columns(block);
        }
        inv_shift_rows(block);
        inv_sub_bytes(block);
        add_round_key(block, &self.round_keys[0]);
    }
}

impl fmt::Debug for Aes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes")
            .field("key_size", &self.key_size)
            .finish_non_exhaustive()
    }
}

fn expand_key(key: &[u8], key_size: KeySize) -> [Block; MAX_ROUND_KEYS] {
    let nk = key_size.key_len() / 4;
    let total_words = 4 * (key_size.rounds() + 1);

    let mut words = [[0u8; 4]; 4 * MAX_ROUND_KEYS];
    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        word.copy_from_slice(chunk);
    }

    for i in nk..total_words {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp.rotate_left(1);
            sub_word(&mut temp);
            temp[0] ^= RCON[i / nk - 1];
        } else if nk > 6 && i % nk == 4 {
            sub_word(&mut temp);
        }
        for (j, byte) in temp.iter().enumerate() {
            words[i][j] = words[i - nk][j] ^ byte;
        }
        temp.zeroize();
    }

    let mut round_keys = [[0u8; BLOCK_LEN]; MAX_ROUND_KEYS];
    for (round_key, group) in round_keys.iter_mut().zip(words.chunks_exact(4)) {
        for (column, word) in round_key.chunks_exact_mut(4).zip(group) {
            column.copy_from_slice(word);
        }
    }
    words.zeroize();
    round_keys
}

fn sub_word(word: &mut [u8; 4]) {
    for byte in word.iter_mut() {
        *byte = SBOX[usize::from(*byte)];
    }
}

fn add_round_key(state: &mut Block, round_key: &Block) {
    for (byte, key) in state.iter_mut().zip(round_key) {
        *byte ^= key;
    }
}

fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = SBOX[usize::from(*byte)];
    }
}

fn inv_sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = INV_SBOX[usize::from(*byte)];
    }
}

/// Row `r` rotates left by `r` columns.
fn shift_rows(state: &mut Block) {
    let input = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[row + 4 * col] = input[row + 4 * ((col + row) % 4)];
        }
    }
}

fn inv_shift_rows(state: &mut Block) {
    let input = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[row + 4 * ((col + row) % 4)] = input[row + 4 * col];
        }
    }
}

/// Multiply by `x` in GF(2^8) modulo `x^8 + x^4 + x^3 + x + 1`.
const fn xtime(a: u8) -> u8 {
    (a << 1) ^ (((a >> 7) & 1) * 0x1b)
}

fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [column[0], column[1], column[2], column[3]];
        let all = a0 ^ a1 ^ a2 ^ a3;
        column[0] = a0 ^ all ^ xtime(a0 ^ a1);
        column[1] = a1 ^ all ^ xtime(a1 ^ a2);
        column[2] = a2 ^ all ^ xtime(a2 ^ a3);
        column[3] = a3 ^ all ^ xtime(a3 ^ a0);
    }
}

/// InvMixColumns as a pre-multiplication by `{04}x^2 + {05}` followed by
/// MixColumns.
fn inv_mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let even = xtime(xtime(column[0] ^ column[2]));
        let odd = xtime(xtime(column[1] ^ column[3]));
        column[0] ^= even;
        column[1] ^= odd;
        column[2] ^= even;
        column[3] ^= odd;
    }
    mix_columns(state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(hex_str: &str) -> Block {
        let mut out = [0u8; BLOCK_LEN];
        out.copy_from_slice(&hex::decode(hex_str).unwrap());
        out
    }

    #[test]
    fn test_fips197_appendix_b() {
        let aes = Aes::new(&hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap()).unwrap();
        let mut state = block("3243f6a8885a308d313198a2e0370734");
        aes.encrypt_block(&mut state);
        assert_eq!(state, block("3925841d02dc09fbdc118597196a0b32"));
        aes.decrypt_block(&mut state);
        assert_eq!(state, block("3243f6a8885a308d313198a2e0370734"));
    }

    #[test]
    fn test_key_sizes() {
        for (len, rounds) in [(16, 10), (24, 12), (32, 14)] {
            let aes = Aes::new(&vec![0u8; len]).unwrap();
            assert_eq!(aes.key_size().rounds(), rounds);
            assert_eq!(aes.key_size().key_len(), len);
        }
    }

    #[test]
    fn test_invalid_key_size() {
        // 100 bits does not fit any AES variant.
        for len in [0, 12, 13, 15, 17, 31, 33, 64] {
            assert_eq!(
                Aes::new(&vec![0u8; len]).unwrap_err(),
                CryptoError::InvalidKeySize { actual: len }
            );
        }
    }

    #[test]
    fn test_key_schedule_last_round_key_aes128() {
        // FIPS 197 Appendix A.1: w[40..44].
        let aes = Aes::new(&hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap()).unwrap();
        assert_eq!(aes.round_keys[10], block("d014f9a8c9ee2589e13f0cc8b6630ca6"));
    }

    #[test]
    fn test_xtime() {
        assert_eq!(xtime(0x57), 0xae);
        assert_eq!(xtime(0xae), 0x47);
        assert_eq!(xtime(0x47), 0x8e);
        assert_eq!(xtime(0x8e), 0x07);
    }

    #[test]
    fn test_inv_mix_columns_inverts() {
        let original = block("db135345f20a225c01010101c6c6c6c6");
        let mut state = original;
        mix_columns(&mut state);
        assert_eq!(state, block("8e4da1bc9fdc589d01010101c6c6c6c6"));
        inv_mix_columns(&mut state);
        assert_eq!(state, original);
    }

    #[test]
    fn test_shift_rows_round_trip() {
        let original: Block = std::array::from_fn(|i| u8::try_from(i).unwrap());
        let mut state = original;
        shift_rows(&mut state);
        assert_eq!(state, [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11]);
        inv_shift_rows(&mut state);
        assert_eq!(state, original);
    }
}
