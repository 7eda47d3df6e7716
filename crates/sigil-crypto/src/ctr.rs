//! Counter mode (NIST SP 800-38A section 6.5) with a big-endian 128-bit
//! counter and no padding.
//!
//! The whole 16-byte counter block is treated as one big-endian integer and
//! incremented once per keystream block. Encryption and decryption are the
//! same operation.
//!
//! # Counter exhaustion
//!
//! The counter never wraps. Once the block for `2^128 - 1` has been used, any
//! call that needs another keystream block fails with
//! [`CryptoError::CounterOverflow`] and leaves the caller's buffer untouched.

use std::fmt;

use zeroize::Zeroize;

use crate::aes::Aes;
use crate::cipher::{BLOCK_LEN, Block, BlockCipher};
use crate::error::{CryptoError, CryptoResult};

/// Streaming CTR transform over any [`BlockCipher`].
///
/// Input may be fed in chunks of any size; output is byte-identical to
/// processing the concatenated input in one call.
///
/// Not internally synchronized; concurrent use of one instance must be
/// serialized by the caller.
pub struct CtrStream<C: BlockCipher> {
    cipher: C,
    /// Counter value for the next keystream block.
    counter: u128,
    /// Set once the block for `u128::MAX` has been generated.
    exhausted: bool,
    keystream: Block,
    /// Next unused keystream byte; `BLOCK_LEN` means none are buffered.
    position: usize,
}

impl<C: BlockCipher> CtrStream<C> {
    /// Start a stream at `initial_counter`.
    ///
    /// The (key, counter) pair must never be reused for a second message.
    pub fn new(cipher: C, initial_counter: Block) -> Self {
        Self {
            cipher,
            counter: u128::from_be_bytes(initial_counter),
            exhausted: false,
            keystream: [0u8; BLOCK_LEN],
            position: BLOCK_LEN,
        }
    }

    /// Counter block that will produce the next keystream block.
    ///
    /// Returns `None` once the counter space is exhausted.
    #[must_use]
    pub fn next_counter(&self) -> Option<Block> {
        (!self.exhausted).then(|| self.counter.to_be_bytes())
    }

    /// XOR the keystream into `buf` in place.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::CounterOverflow`] if `buf` needs keystream past
    /// counter value `2^128 - 1`. The buffer and stream are unchanged.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) -> CryptoResult<()> {
        let buffered = BLOCK_LEN.saturating_sub(self.position);
        let fresh_blocks = buf.len().saturating_sub(buffered).div_ceil(BLOCK_LEN);
        if fresh_blocks as u128 > self.blocks_remaining() {
            tracing::warn!(
                requested_blocks = fresh_blocks,
                "CTR counter would wrap; refusing to reuse keystream"
            );
            return Err(CryptoError::CounterOverflow);
        }

        let mut rest = buf;
        while !rest.is_empty() {
            if self.position == BLOCK_LEN {
                self.refill();
            }
            let available = &self.keystream[self.position..];
            let take = available.len().min(rest.len());
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(take);
            for (byte, key) in head.iter_mut().zip(available) {
                *byte ^= key;
            }
            self.position = self.position.saturating_add(take);
            rest = tail;
        }
        Ok(())
    }

    /// Transform `input` into a new buffer of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::CounterOverflow`] as for
    /// [`apply_keystream`](Self::apply_keystream).
    pub fn process(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut output = input.to_vec();
        self.apply_keystream(&mut output)?;
        Ok(output)
    }

    fn blocks_remaining(&self) -> u128 {
        if self.exhausted {
            0
        } else {
            u128::MAX.saturating_sub(self.counter).saturating_add(1)
        }
    }

    fn refill(&mut self) {
        self.keystream = self.counter.to_be_bytes();
        self.cipher.encrypt_block(&mut self.keystream);
        match self.counter.checked_add(1) {
            Some(next) => self.counter = next,
            None => self.exhausted = true,
        }
        self.position = 0;
    }
}

impl<C: BlockCipher> Drop for CtrStream<C> {
    fn drop(&mut self) {
        self.keystream.zeroize();
        self.counter.zeroize();
    }
}

impl<C: BlockCipher> fmt::Debug for CtrStream<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtrStream")
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

/// One-shot AES-CTR transform of `data` under `key` starting at `counter`.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeySize`] for a bad key, or
/// [`CryptoError::CounterOverflow`] if the data needs more blocks than remain
/// before the counter would wrap.
pub fn aes_ctr_transform(key: &[u8], counter: &Block, data: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes::new(key)?;
    CtrStream::new(cipher, *counter).process(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = [7u8; 16];

    #[test]
    fn test_output_length_matches_input() {
        for len in [0, 1, 15, 16, 17, 100] {
            let out = aes_ctr_transform(&KEY, &[0u8; 16], &vec![0xaa; len]).unwrap();
            assert_eq!(out.len(), len);
        }
    }

    #[test]
    fn test_counter_advances_per_block() {
        let mut stream = CtrStream::new(Aes::new(&KEY).unwrap(), [0u8; 16]);
        stream.process(&[0u8; 17]).unwrap();
        let mut expected = [0u8; 16];
        expected[15] = 2;
        assert_eq!(stream.next_counter(), Some(expected));
    }

    #[test]
    fn test_counter_carries_across_bytes() {
        let mut start = [0u8; 16];
        start[8..].fill(0xff);
        let mut stream = CtrStream::new(Aes::new(&KEY).unwrap(), start);
        stream.process(&[0u8; 16]).unwrap();
        let mut expected = [0u8; 16];
        expected[7] = 1;
        assert_eq!(stream.next_counter(), Some(expected));
    }

    #[test]
    fn test_last_counter_block_is_usable() {
        let mut stream = CtrStream::new(Aes::new(&KEY).unwrap(), [0xff; 16]);
        assert_eq!(stream.process(&[0u8; 16]).unwrap().len(), 16);
        assert_eq!(stream.next_counter(), None);
        // A zero-length call needs no keystream.
        assert!(stream.process(&[]).is_ok());
        assert_eq!(stream.process(&[0u8]), Err(CryptoError::CounterOverflow));
    }

    #[test]
    fn test_overflow_leaves_buffer_untouched() {
        let mut start = [0xff; 16];
        start[15] = 0xfe;
        let mut stream = CtrStream::new(Aes::new(&KEY).unwrap(), start);
        let mut buf = [0x11u8; 33];
        assert_eq!(
            stream.apply_keystream(&mut buf),
            Err(CryptoError::CounterOverflow)
        );
        assert_eq!(buf, [0x11u8; 33]);
        // Exactly two blocks remain.
        let mut fits = [0x11u8; 32];
        assert!(stream.apply_keystream(&mut fits).is_ok());
    }

    #[test]
    fn test_partial_block_spans_exhaustion() {
        let mut stream = CtrStream::new(Aes::new(&KEY).unwrap(), [0xff; 16]);
        stream.process(&[0u8; 10]).unwrap();
        // Six buffered keystream bytes remain after the last counter.
        assert!(stream.process(&[0u8; 6]).is_ok());
        assert_eq!(stream.process(&[0u8; 1]), Err(CryptoError::CounterOverflow));
    }

    #[test]
    fn test_self_inverse() {
        let plaintext = b"counter mode needs no padding at all";
        let counter = [3u8; 16];
        let ciphertext = aes_ctr_transform(&KEY, &counter, plaintext).unwrap();
        assert_ne!(ciphertext.as_slice(), plaintext.as_slice());
        let recovered = aes_ctr_transform(&KEY, &counter, &ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn test_invalid_key() {
        assert_eq!(
            aes_ctr_transform(&[0u8; 13], &[0u8; 16], b"x"),
            Err(CryptoError::InvalidKeySize { actual: 13 })
        );
    }
}
