//! Block operations for Argon2.
//!
//! This module defines the fundamental 1024-byte block structure and the
//! compression function G that forms the core of the Argon2 algorithm.
//! The compression function is based on the BLAKE2b round function but
//! uses additional multiplication operations for enhanced diffusion.

use zeroize::Zeroize;

/// Number of 64-bit words in a block.
pub(crate) const BLOCK_WORDS: usize = 128;

/// Size of a block in bytes.
pub const BLOCK_SIZE: usize = BLOCK_WORDS * 8;

/// Argon2 type identifier for Argon2id.
pub(crate) const ARGON2ID_TYPE: u64 = 2;

/// A 1024-byte memory block (128 × 64-bit words).
///
/// Blocks are the fundamental unit of memory in Argon2. The algorithm
/// operates by filling and mixing these blocks using the compression
/// function G. Each block is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Block(pub(crate) [u64; BLOCK_WORDS]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; BLOCK_WORDS]);

    pub(crate) fn in_place_xor(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    pub(crate) fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Self {
        Block(core::array::from_fn(|i| {
            u64::from_le_bytes(core::array::from_fn(|k| bytes[i * 8 + k]))
        }))
    }

    pub(crate) fn write_bytes(&self, out: &mut [u8; BLOCK_SIZE]) {
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }

    /// Compression function G (RFC 9106 §3.5).
    ///
    /// Computes G(X, Y) = P(P(X ⊕ Y)) ⊕ X ⊕ Y, where P is a permutation
    /// based on the BLAKE2b round function. The block is viewed as an 8×8
    /// matrix of 16-byte registers; P is applied to each row, then to each
    /// column.
    pub(crate) fn compress(x: &Self, y: &Self) -> Self {
        let mut r = x.clone();
        r.in_place_xor(y);

        let mut z = r.clone();

        for row in 0..8 {
            permute_p(&mut z.0, core::array::from_fn(|k| 16 * row + k));
        }

        for column in 0..8 {
            permute_p(
                &mut z.0,
                core::array::from_fn(|k| 2 * column + 16 * (k / 2) + k % 2),
            );
        }

        z.in_place_xor(&r);
        z
    }

    /// Generates an address block for data-independent indexing.
    ///
    /// In data-independent mode (first pass, slices 0-1), the reference
    /// block indices are derived from this address block rather than from
    /// previously computed block contents.
    ///
    /// The address block is computed as G(0, G(0, Z)) where Z contains
    /// the current position parameters and a counter.
    pub(crate) fn address_block(input: &AddressInput, counter: u64) -> Self {
        let mut z = Block::ZERO;
        z.0[0] = u64::from(input.pass);
        z.0[1] = u64::from(input.lane);
        z.0[2] = u64::from(input.slice);
        z.0[3] = u64::from(input.memory_blocks);
        z.0[4] = u64::from(input.passes);
        z.0[5] = ARGON2ID_TYPE;
        z.0[6] = counter;

        let tmp = Block::compress(&Block::ZERO, &z);
        Block::compress(&Block::ZERO, &tmp)
    }
}

/// Position fields that seed the address blocks of one segment.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AddressInput {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
    pub memory_blocks: u32,
    pub passes: u32,
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// GB mixing function (Argon2 variant of BLAKE2b's G).
///
/// Unlike the plain BLAKE2b G function which adds message words,
/// Argon2's GB function uses multiplication of the lower 32 bits:
///
/// ```text
/// a = a + b + 2 × trunc(a) × trunc(b)
/// d = (d ⊕ a) >>> rotation
/// ```
///
/// The rotation amounts are 32, 24, 16 and 63 bits.
#[inline(always)]
fn gb(a: u64, b: u64, c: u64, d: u64) -> (u64, u64, u64, u64) {
    let a = fbla(a, b);
    let d = (d ^ a).rotate_right(32);
    let c = fbla(c, d);
    let b = (b ^ c).rotate_right(24);
    let a = fbla(a, b);
    let d = (d ^ a).rotate_right(16);
    let c = fbla(c, d);
    let b = (b ^ c).rotate_right(63);
    (a, b, c, d)
}

/// `x + y + 2 · lo32(x) · lo32(y)` modulo 2^64.
#[inline(always)]
fn fbla(x: u64, y: u64) -> u64 {
    let product = (x & 0xffff_ffff).wrapping_mul(y & 0xffff_ffff);
    x.wrapping_add(y).wrapping_add(product.wrapping_mul(2))
}

/// P permutation over the 16 words of `block` selected by `idx`.
///
/// Applies GB to the 4×4 matrix of words, first along columns, then along
/// diagonals.
#[inline(always)]
fn permute_p(block: &mut [u64; BLOCK_WORDS], idx: [usize; 16]) {
    let mut v = idx.map(|i| block[i]);

    (v[0], v[4], v[8], v[12]) = gb(v[0], v[4], v[8], v[12]);
    (v[1], v[5], v[9], v[13]) = gb(v[1], v[5], v[9], v[13]);
    (v[2], v[6], v[10], v[14]) = gb(v[2], v[6], v[10], v[14]);
    (v[3], v[7], v[11], v[15]) = gb(v[3], v[7], v[11], v[15]);

    (v[0], v[5], v[10], v[15]) = gb(v[0], v[5], v[10], v[15]);
    (v[1], v[6], v[11], v[12]) = gb(v[1], v[6], v[11], v[12]);
    (v[2], v[7], v[8], v[13]) = gb(v[2], v[7], v[8], v[13]);
    (v[3], v[4], v[9], v[14]) = gb(v[3], v[4], v[9], v[14]);

    for (slot, i) in idx.into_iter().enumerate() {
        block[i] = v[slot];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_roundtrip_little_endian() {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[0] = 0x01;
        bytes[9] = 0x02;

        let block = Block::from_bytes(&bytes);
        assert_eq!(block.0[0], 1);
        assert_eq!(block.0[1], 0x0200);

        let mut back = [0u8; BLOCK_SIZE];
        block.write_bytes(&mut back);
        assert_eq!(back, bytes);
    }

    #[test]
    fn compression_of_zero_blocks_is_zero() {
        // P(0) = 0, so G(0, 0) = 0.
        assert!(Block::compress(&Block::ZERO, &Block::ZERO) == Block::ZERO);
    }

    #[test]
    fn compression_is_symmetric_in_its_inputs() {
        let mut x = Block::ZERO;
        let mut y = Block::ZERO;
        x.0[3] = 0xdead_beef;
        y.0[77] = 42;

        assert!(Block::compress(&x, &y) == Block::compress(&y, &x));
        assert!(Block::compress(&x, &y) != Block::compress(&x, &x));
    }

    #[test]
    fn address_blocks_depend_on_counter() {
        let input = AddressInput {
            pass: 0,
            lane: 0,
            slice: 0,
            memory_blocks: 32,
            passes: 3,
        };
        assert!(Block::address_block(&input, 1) != Block::address_block(&input, 2));
    }
}
