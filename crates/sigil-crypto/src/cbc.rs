//! Cipher block chaining (NIST SP 800-38A section 6.2) with PKCS#7 padding.

// Index arithmetic below is bounded by BLOCK_LEN and checked input lengths.
#![allow(clippy::arithmetic_side_effects)]

use subtle::{ConstantTimeEq, ConstantTimeLess};
use zeroize::Zeroize;

use crate::aes::Aes;
use crate::cipher::{BLOCK_LEN, Block, BlockCipher};
use crate::error::{CryptoError, CryptoResult};

#[allow(clippy::cast_possible_truncation)]
const MAX_PAD: u8 = BLOCK_LEN as u8;

/// Pad `plaintext` with PKCS#7 and encrypt it in CBC mode.
///
/// The output is always 1 to 16 bytes longer than the input.
#[must_use]
pub fn cbc_encrypt<C: BlockCipher>(cipher: &C, iv: &Block, plaintext: &[u8]) -> Vec<u8> {
    let pad = BLOCK_LEN - plaintext.len() % BLOCK_LEN;
    let mut output = Vec::with_capacity(plaintext.len().saturating_add(pad));
    output.extend_from_slice(plaintext);
    // pad is in 1..=16.
    #[allow(clippy::cast_possible_truncation)]
    let pad_byte = pad as u8;
    output.resize(plaintext.len().saturating_add(pad), pad_byte);

    let mut chain = *iv;
    for chunk in output.chunks_exact_mut(BLOCK_LEN) {
        for (byte, prev) in chunk.iter_mut().zip(chain.iter()) {
            *byte ^= prev;
        }
        chain.copy_from_slice(chunk);
        cipher.encrypt_block(&mut chain);
        chunk.copy_from_slice(&chain);
    }
    output
}

/// Decrypt CBC ciphertext and strip PKCS#7 padding.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidCiphertextLength`] if `ciphertext` is empty
/// or not a multiple of the block size, and [`CryptoError::InvalidPadding`]
/// if the final block does not carry valid padding.
pub fn cbc_decrypt<C: BlockCipher>(
    cipher: &C,
    iv: &Block,
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::InvalidCiphertextLength(ciphertext.len()));
    }

    let mut output = ciphertext.to_vec();
    let mut chain = *iv;
    let mut block: Block = [0u8; BLOCK_LEN];
    for chunk in output.chunks_exact_mut(BLOCK_LEN) {
        block.copy_from_slice(chunk);
        let next_chain = block;
        cipher.decrypt_block(&mut block);
        for ((out, plain), prev) in chunk.iter_mut().zip(block.iter()).zip(chain.iter()) {
            *out = plain ^ prev;
        }
        chain = next_chain;
    }
    block.zeroize();

    let unpadded_len = match padding_len(&output) {
        Some(pad) => output.len() - pad,
        None => {
            output.zeroize();
            tracing::debug!("CBC padding check failed");
            return Err(CryptoError::InvalidPadding);
        }
    };
    output[unpadded_len..].zeroize();
    output.truncate(unpadded_len);
    Ok(output)
}

/// Length of valid PKCS#7 padding at the end of `data`, if any.
///
/// Inspects the whole final block regardless of the pad value.
fn padding_len(data: &[u8]) -> Option<usize> {
    let last_block = &data[data.len() - BLOCK_LEN..];
    let pad = last_block[BLOCK_LEN - 1];

    // 1 <= pad <= 16
    let mut valid = !pad.ct_eq(&0) & !MAX_PAD.ct_lt(&pad);
    for (offset, byte) in last_block.iter().rev().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let in_pad = (offset as u8).ct_lt(&pad);
        valid &= !in_pad | byte.ct_eq(&pad);
    }

    bool::from(valid).then_some(usize::from(pad))
}

/// AES-CBC encryption with PKCS#7 padding under a 16, 24 or 32 byte key.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeySize`] for a bad key.
pub fn aes_cbc_encrypt(key: &[u8], iv: &Block, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes::new(key)?;
    Ok(cbc_encrypt(&cipher, iv, plaintext))
}

/// AES-CBC decryption with PKCS#7 padding removal.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeySize`] for a bad key, or any error from
/// [`cbc_decrypt`].
pub fn aes_cbc_decrypt(key: &[u8], iv: &Block, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes::new(key)?;
    cbc_decrypt(&cipher, iv, ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x24; 32];
    const IV: Block = [0x01; 16];

    #[test]
    fn test_padding_lengths() {
        for (len, expected) in [(0, 16), (1, 16), (15, 16), (16, 32), (17, 32)] {
            let ct = aes_cbc_encrypt(&KEY, &IV, &vec![0u8; len]).unwrap();
            assert_eq!(ct.len(), expected, "plaintext length {len}");
        }
    }

    #[test]
    fn test_roundtrip() {
        let plaintext = b"block chaining with a ragged tail";
        let ct = aes_cbc_encrypt(&KEY, &IV, plaintext).unwrap();
        assert_eq!(aes_cbc_decrypt(&KEY, &IV, &ct).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let ct = aes_cbc_encrypt(&KEY, &IV, b"").unwrap();
        assert_eq!(aes_cbc_decrypt(&KEY, &IV, &ct).unwrap(), b"");
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert_eq!(
            aes_cbc_decrypt(&KEY, &IV, &[]),
            Err(CryptoError::InvalidCiphertextLength(0))
        );
        assert_eq!(
            aes_cbc_decrypt(&KEY, &IV, &[0u8; 17]),
            Err(CryptoError::InvalidCiphertextLength(17))
        );
    }

    #[test]
    fn test_wrong_key_fails_padding_or_garbles() {
        let ct = aes_cbc_encrypt(&KEY, &IV, b"attack at dawn").unwrap();
        match aes_cbc_decrypt(&[0x25; 32], &IV, &ct) {
            Err(CryptoError::InvalidPadding) => {},
            Ok(pt) => assert_ne!(pt, b"attack at dawn"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_padding_check() {
        let mut block = [0xaau8; 16];
        block[15] = 3;
        block[14] = 3;
        block[13] = 3;
        assert_eq!(padding_len(&block), Some(3));

        block[14] = 2;
        assert_eq!(padding_len(&block), None);

        assert_eq!(padding_len(&[16u8; 16]), Some(16));
        assert_eq!(padding_len(&[0u8; 16]), None);
        assert_eq!(padding_len(&[17u8; 16]), None);
    }

    #[test]
    fn test_tampered_padding_is_rejected() {
        let cipher = Aes::new(&KEY).unwrap();
        // Encrypt a block whose final byte claims five bytes of padding that
        // are not there.
        let mut raw = [0u8; 16];
        raw[15] = 5;
        let mut chained = raw;
        for (b, i) in chained.iter_mut().zip(IV.iter()) {
            *b ^= i;
        }
        cipher.encrypt_block(&mut chained);
        assert_eq!(
            cbc_decrypt(&cipher, &IV, &chained),
            Err(CryptoError::InvalidPadding)
        );
    }
}
