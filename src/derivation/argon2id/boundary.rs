//! Initialization and finalization for Argon2.
//!
//! This module handles the boundary operations of the Argon2 algorithm:
//! computing the initial hash H0 from all inputs, seeding the first two
//! blocks of every lane, and deriving the final tag from the filled memory.

use zeroize::Zeroizing;

use super::block::{ARGON2ID_TYPE, BLOCK_SIZE, Block};
use super::error::{Error, Result};
use super::memory::Matrix;
use super::params::Params;
use crate::hash::{Blake2b, blake2b_long};

/// Size of the pre-hashing digest H0.
const H0_LEN: usize = 64;

/// Computes the initial hash H0 from all Argon2 inputs.
///
/// H0 is a 64-byte BLAKE2b hash of the concatenation of all parameters
/// and inputs, each variable-length input prefixed with its length
/// (RFC 9106 §3.2):
///
/// ```text
/// H0 = BLAKE2b(p || T || m || t || v || y || |P| || P || |S| || S || |K| || K || |X| || X)
/// ```
///
/// `m` is the memory cost as requested, before rounding. Lengths have been
/// validated to fit in 32 bits.
pub(crate) fn initial_hash(
    password: &[u8],
    salt: &[u8],
    params: &Params,
) -> Zeroizing<[u8; H0_LEN]> {
    let le32 = |n: usize| (n as u32).to_le_bytes();

    let mut hasher = Blake2b::new(H0_LEN);
    hasher
        .update(&params.parallelism.to_le_bytes())
        .update(&le32(params.output_len))
        .update(&params.memory_cost_kib.to_le_bytes())
        .update(&params.time_cost.to_le_bytes())
        .update(&params.version.as_u32().to_le_bytes())
        .update(&(ARGON2ID_TYPE as u32).to_le_bytes());

    hasher.update(&le32(password.len())).update(password);
    hasher.update(&le32(salt.len())).update(salt);

    let secret = params.secret.as_deref().unwrap_or_default();
    hasher.update(&le32(secret.len())).update(secret);

    let associated_data = params.associated_data.as_deref().unwrap_or_default();
    hasher
        .update(&le32(associated_data.len()))
        .update(associated_data);

    let mut h0 = Zeroizing::new([0u8; H0_LEN]);
    hasher.finalize_into(&mut h0[..]);
    h0
}

/// Seeds the first two blocks of every lane:
/// `B[i][j] = H'^(1024)(H0 || LE32(j) || LE32(i))` for `j` in `{0, 1}`.
pub(crate) fn initialize_lanes(matrix: &mut Matrix, h0: &[u8; H0_LEN]) {
    let mut bytes = Zeroizing::new([0u8; BLOCK_SIZE]);

    for lane in 0..matrix.layout().lanes {
        for column in 0..2u32 {
            blake2b_long(
                &mut bytes[..],
                &[&h0[..], &column.to_le_bytes(), &lane.to_le_bytes()],
            );
            *matrix.block_mut(lane, column) = Block::from_bytes(&bytes);
        }
    }
}

/// Finalizes the Argon2 computation to produce the output tag.
///
/// The last block of each lane is XORed into a single 1024-byte block,
/// then H' stretches it to `output_len` bytes. Every lane contributes to
/// the tag, so none of them can be skipped.
pub(crate) fn finalize(matrix: &Matrix, output_len: usize) -> Result<Vec<u8>> {
    let mut accumulator = Block::ZERO;
    for lane in 0..matrix.layout().lanes {
        accumulator.in_place_xor(matrix.last_block(lane));
    }

    let mut bytes = Zeroizing::new([0u8; BLOCK_SIZE]);
    accumulator.write_bytes(&mut bytes);

    let mut tag = Vec::new();
    tag.try_reserve_exact(output_len)
        .map_err(|_| Error::OutOfMemory { bytes: output_len })?;
    tag.resize(output_len, 0);

    blake2b_long(&mut tag, &[&bytes[..]]);
    Ok(tag)
}
