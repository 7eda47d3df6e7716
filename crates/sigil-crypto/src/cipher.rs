//! Block cipher abstraction consumed by the block modes.

/// Block size in bytes for every supported cipher.
pub const BLOCK_LEN: usize = 16;

/// One cipher block.
pub type Block = [u8; BLOCK_LEN];

/// A keyed permutation over 16-byte blocks.
///
/// Implementations hold an immutable key schedule, so a single instance can
/// be shared by reference across threads.
pub trait BlockCipher: Send + Sync {
    /// Encrypt one block in place.
    fn encrypt_block(&self, block: &mut Block);

    /// Decrypt one block in place.
    fn decrypt_block(&self, block: &mut Block);
}

impl<C: BlockCipher + ?Sized> BlockCipher for &C {
    fn encrypt_block(&self, block: &mut Block) {
        (**self).encrypt_block(block);
    }

    fn decrypt_block(&self, block: &mut Block) {
        (**self).decrypt_block(block);
    }
}
