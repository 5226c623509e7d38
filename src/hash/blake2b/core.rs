//! BLAKE2b core hashing functions
//!
//! This module implements unkeyed BLAKE2b as defined in RFC 7693, with a
//! digest length anywhere between 1 and 64 bytes.
//!
//! It provides:
//! - the compression step operating on 128-byte blocks
//! - an incremental hasher ([`Blake2b`]) for inputs assembled from parts
//! - a one-shot [`blake2b`] function for contiguous input
//!
//! The incremental form exists so that Argon2 can feed passwords, salts
//! and length prefixes into the hash without first concatenating them into
//! a temporary buffer.

use zeroize::Zeroize;

use super::computations::all_rounds;
use super::{BLOCK_LEN, IV, MAX_OUTPUT_LEN};

/// Incremental BLAKE2b hasher.
///
/// The last buffered block is only compressed on [`Blake2b::finalize_into`],
/// because the final block has to carry the finalization flag even when the
/// input length is an exact multiple of the block size.
///
/// Internal state is wiped on drop.
pub struct Blake2b {
    state: [u64; 8],
    buffer: [u8; BLOCK_LEN],
    buffered: usize,
    counter: u128,
    output_len: usize,
}

impl Blake2b {
    /// Creates a hasher producing `output_len` bytes.
    ///
    /// # Panics
    /// Panics if `output_len` is zero or larger than 64. Every caller in
    /// this crate passes a length derived from checked parameters.
    pub fn new(output_len: usize) -> Self {
        assert!(
            (1..=MAX_OUTPUT_LEN).contains(&output_len),
            "BLAKE2b output length must be within 1..=64, got {output_len}"
        );

        let mut state = IV;
        // Parameter block: digest length, no key, fanout 1, depth 1.
        state[0] ^= 0x0101_0000 ^ output_len as u64;

        Self {
            state,
            buffer: [0u8; BLOCK_LEN],
            buffered: 0,
            counter: 0,
            output_len,
        }
    }

    /// Absorbs `input` into the hash state.
    pub fn update(&mut self, mut input: &[u8]) -> &mut Self {
        while !input.is_empty() {
            if self.buffered == BLOCK_LEN {
                self.counter += BLOCK_LEN as u128;
                compress(&mut self.state, &self.buffer, self.counter, false);
                self.buffered = 0;
            }

            let take = (BLOCK_LEN - self.buffered).min(input.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&input[..take]);
            self.buffered += take;
            input = &input[take..];
        }

        self
    }

    /// Finishes the hash and writes the digest into `out`.
    ///
    /// # Panics
    /// Panics if `out` is not exactly the length given to [`Blake2b::new`].
    pub fn finalize_into(mut self, out: &mut [u8]) {
        assert_eq!(out.len(), self.output_len, "BLAKE2b output buffer size mismatch");

        self.counter += self.buffered as u128;
        self.buffer[self.buffered..].fill(0);
        compress(&mut self.state, &self.buffer, self.counter, true);

        let mut bytes = [0u8; MAX_OUTPUT_LEN];
        for (chunk, word) in bytes.chunks_exact_mut(8).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out.copy_from_slice(&bytes[..self.output_len]);
        bytes.zeroize();
    }

    /// Finishes the hash and returns the digest.
    pub fn finalize(self) -> Vec<u8> {
        let mut out = vec![0u8; self.output_len];
        self.finalize_into(&mut out);
        out
    }
}

impl Drop for Blake2b {
    fn drop(&mut self) {
        self.state.zeroize();
        self.buffer.zeroize();
    }
}

/// Compresses a single 128-byte message block into `state`.
///
/// Message words are read little-endian, as required by BLAKE2b.
pub fn compress(state: &mut [u64; 8], block: &[u8; BLOCK_LEN], counter: u128, last: bool) {
    let mut m: [u64; 16] = core::array::from_fn(|i| {
        u64::from_le_bytes(core::array::from_fn(|k| block[i * 8 + k]))
    });

    all_rounds(state, &m, counter, last);
    m.zeroize();
}

/// Computes the BLAKE2b hash of `input` with an `output_len`-byte digest.
///
/// # Panics
/// Panics if `output_len` is not within `1..=64`.
pub fn blake2b(output_len: usize, input: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b::new(output_len);
    hasher.update(input);
    hasher.finalize()
}
