//! Variable-length hash function H' (RFC 9106 §3.3).
//!
//! H' stretches BLAKE2b to arbitrary output lengths. Outputs of at most
//! 64 bytes are a single BLAKE2b call over the length-prefixed input;
//! longer outputs chain 64-byte BLAKE2b calls, keeping the first 32 bytes
//! of each link and the whole of the last one.

use zeroize::Zeroizing;

use super::MAX_OUTPUT_LEN;
use super::core::Blake2b;

/// Fills `out` with H'(`out.len()`, `parts[0] || parts[1] || ...`).
///
/// The input is given in parts so callers can hash `H0 || j || i` style
/// concatenations without building them in memory first.
///
/// # Panics
/// Panics if `out` is empty or longer than `u32::MAX` bytes.
pub fn blake2b_long(out: &mut [u8], parts: &[&[u8]]) {
    assert!(
        !out.is_empty() && out.len() <= u32::MAX as usize,
        "H' output length must be within 1..=u32::MAX, got {}",
        out.len()
    );
    let out_len = out.len() as u32;

    let mut first = Blake2b::new(out.len().min(MAX_OUTPUT_LEN));
    first.update(&out_len.to_le_bytes());
    for part in parts {
        first.update(part);
    }

    if out.len() <= MAX_OUTPUT_LEN {
        first.finalize_into(out);
        return;
    }

    const HALF: usize = MAX_OUTPUT_LEN / 2;

    let mut link = Zeroizing::new([0u8; MAX_OUTPUT_LEN]);
    first.finalize_into(&mut link[..]);
    out[..HALF].copy_from_slice(&link[..HALF]);

    let mut written = HALF;
    while out.len() - written > MAX_OUTPUT_LEN {
        let mut next = Blake2b::new(MAX_OUTPUT_LEN);
        next.update(&link[..]);
        next.finalize_into(&mut link[..]);

        out[written..written + HALF].copy_from_slice(&link[..HALF]);
        written += HALF;
    }

    let mut last = Blake2b::new(out.len() - written);
    last.update(&link[..]);
    last.finalize_into(&mut out[written..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::blake2b;

    #[test]
    fn short_output_is_length_prefixed_blake2b() {
        let mut out = [0u8; 32];
        blake2b_long(&mut out, &[b"abc"]);

        let mut prefixed = 32u32.to_le_bytes().to_vec();
        prefixed.extend_from_slice(b"abc");
        assert_eq!(out.to_vec(), blake2b(32, &prefixed));
    }

    #[test]
    fn long_output_chains_half_links() {
        let mut out = [0u8; 100];
        blake2b_long(&mut out, &[b"in", b"put"]);

        let mut prefixed = 100u32.to_le_bytes().to_vec();
        prefixed.extend_from_slice(b"input");
        let v1 = blake2b(64, &prefixed);
        let v2 = blake2b(64, &v1);
        let v3 = blake2b(36, &v2);

        assert_eq!(&out[..32], &v1[..32]);
        assert_eq!(&out[32..64], &v2[..32]);
        assert_eq!(&out[64..], &v3[..]);
    }

    #[test]
    fn parts_are_concatenated() {
        let mut joined = [0u8; 1024];
        let mut split = [0u8; 1024];
        blake2b_long(&mut joined, &[b"hello world"]);
        blake2b_long(&mut split, &[b"hello", b" ", b"world"]);
        assert_eq!(joined, split);
    }
}
