//! Partial-block buffering shared by the Merkle-Damgard hashes.

// Index arithmetic below is bounded by `len < N`.
#![allow(clippy::arithmetic_side_effects)]

use zeroize::Zeroize;

/// Accumulates input until a full `N`-byte block is available.
///
/// Invariant: `len < N` between calls.
#[derive(Clone, Zeroize)]
pub(crate) struct BlockBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> BlockBuffer<N> {
    pub(crate) const fn new() -> Self {
        Self {
            bytes: [0u8; N],
            len: 0,
        }
    }

    /// Feed `data`, handing every completed block to `compress`.
    pub(crate) fn absorb(&mut self, mut data: &[u8], mut compress: impl FnMut(&[u8; N])) {
        if self.len > 0 {
            let take = (N - self.len).min(data.len());
            self.bytes[self.len..self.len + take].copy_from_slice(&data[..take]);
            self.len += take;
            data = &data[take..];

            if self.len < N {
                return;
            }
            compress(&self.bytes);
            self.len = 0;
        }

        let mut blocks = data.chunks_exact(N);
        for block in &mut blocks {
            if let Ok(block) = <&[u8; N]>::try_from(block) {
                compress(block);
            }
        }

        let rest = blocks.remainder();
        self.bytes[..rest.len()].copy_from_slice(rest);
        self.len = rest.len();
    }

    /// Apply `0x80`, zero fill and the big-endian length `suffix`, then flush.
    ///
    /// Emits one extra block when the marker byte and suffix do not fit after
    /// the buffered tail.
    pub(crate) fn finish(&mut self, suffix: &[u8], mut compress: impl FnMut(&[u8; N])) {
        debug_assert!(suffix.len() < N);

        self.bytes[self.len] = 0x80;
        self.len += 1;

        if self.len > N - suffix.len() {
            self.bytes[self.len..].fill(0);
            compress(&self.bytes);
            self.len = 0;
        }

        self.bytes[self.len..N - suffix.len()].fill(0);
        self.bytes[N - suffix.len()..].copy_from_slice(suffix);
        compress(&self.bytes);

        self.bytes.zeroize();
        self.len = 0;
    }

    #[cfg(test)]
    pub(crate) const fn buffered(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_buffers_tail() {
        let mut buffer = BlockBuffer::<8>::new();
        let mut blocks = Vec::new();
        buffer.absorb(&[1, 2, 3], |b| blocks.push(*b));
        assert!(blocks.is_empty());
        assert_eq!(buffer.buffered(), 3);

        buffer.absorb(&[4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19], |b| {
            blocks.push(*b);
        });
        assert_eq!(blocks, vec![[1, 2, 3, 4, 5, 6, 7, 8], [9, 10, 11, 12, 13, 14, 15, 16]]);
        assert_eq!(buffer.buffered(), 3);
    }

    #[test]
    fn test_absorb_empty_input() {
        let mut buffer = BlockBuffer::<8>::new();
        let mut calls = 0;
        buffer.absorb(&[], |_| calls += 1);
        buffer.absorb(&[1], |_| calls += 1);
        buffer.absorb(&[], |_| calls += 1);
        assert_eq!(calls, 0);
        assert_eq!(buffer.buffered(), 1);
    }

    #[test]
    fn test_finish_single_block() {
        let mut buffer = BlockBuffer::<8>::new();
        buffer.absorb(&[0xaa, 0xbb], |_| {});
        let mut blocks = Vec::new();
        buffer.finish(&[0x10, 0x20], |b| blocks.push(*b));
        assert_eq!(blocks, vec![[0xaa, 0xbb, 0x80, 0, 0, 0, 0x10, 0x20]]);
    }

    #[test]
    fn test_finish_spills_into_second_block() {
        let mut buffer = BlockBuffer::<8>::new();
        buffer.absorb(&[1, 2, 3, 4, 5, 6], |_| {});
        let mut blocks = Vec::new();
        buffer.finish(&[0x10, 0x20], |b| blocks.push(*b));
        assert_eq!(
            blocks,
            vec![[1, 2, 3, 4, 5, 6, 0x80, 0], [0, 0, 0, 0, 0, 0, 0x10, 0x20]]
        );
    }
}
