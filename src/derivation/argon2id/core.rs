use tracing::{debug, instrument};
use zeroize::Zeroizing;

use super::boundary::{finalize, initial_hash, initialize_lanes};
use super::encoding::{encode_into, reserve};
use super::error::Result;
use super::fill::{FillState, LaneFiller};
use super::memory::{Layout, Matrix};
use super::params::Params;

/// Computes an Argon2id hash of the given password.
///
/// # Arguments
///
/// * `password` - The password to hash, any byte sequence including empty
/// * `salt` - A random salt (at least 1 byte, 16 recommended)
/// * `params` - Cost parameters, output length, version, and optional
///   secret and associated data
///
/// # Returns
///
/// The derived tag of `params.output_len` bytes.
///
/// # Errors
///
/// - [`Error::InvalidParameters`](super::error::Error::InvalidParameters)
///   naming the offending field when a parameter or input is out of range.
/// - [`Error::OutOfMemory`](super::error::Error::OutOfMemory) when the
///   memory matrix cannot be allocated.
/// - [`Error::HashingFailure`](super::error::Error::HashingFailure) when
///   the lane workers cannot be started.
///
/// The memory matrix is wiped before this function returns, whatever the
/// outcome.
///
/// # Example
///
/// ```rust
/// use argon2id::{Params, argon2id};
///
/// let params = Params::new(2, 64, 1, 32);
/// let tag = argon2id(b"my_password", b"random_salt_16b!", &params).unwrap();
/// assert_eq!(tag.len(), 32);
/// ```
#[instrument(
    skip_all,
    name = "argon2id::derive",
    fields(t = params.time_cost, m = params.memory_cost_kib, p = params.parallelism)
)]
pub fn argon2id(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>> {
    params.validate_inputs(password, salt)?;

    // Allocate before touching the password so that an impossible memory
    // cost fails fast.
    let mut matrix = Matrix::allocate(Layout::new(params))?;

    let h0 = initial_hash(password, salt, params);
    initialize_lanes(&mut matrix, &h0);

    {
        let mut filler = LaneFiller::new(&mut matrix, params)?;
        let computed = filler.run();
        debug_assert_eq!(filler.state(), FillState::Complete);
        debug!(blocks = computed, "memory filled");
    }

    finalize(&matrix, params.output_len)
}

/// Hashes `password` and returns the encoded hash string.
///
/// The string has the form
/// `$argon2id$v=19$m=<memory_cost_kib>,t=<time_cost>,p=<parallelism>$<salt>$<digest>`
/// and is exactly as long as needed; it never carries a trailing NUL.
///
/// Any non-empty salt is accepted. The reference Argon2 library rejects
/// salts shorter than 8 bytes, so strings hashed here with a 1 to 7 byte
/// salt will not verify there. Use 16 random bytes.
///
/// # Errors
///
/// Same as [`argon2id`]. Failing to allocate the output string is also an
/// [`Error::OutOfMemory`](super::error::Error::OutOfMemory).
///
/// # Example
///
/// ```rust
/// let encoded = argon2id::hash_encoded(2, 64, 1, b"password", b"somesalt", 32).unwrap();
/// assert!(encoded.starts_with("$argon2id$v=19$m=64,t=2,p=1$c29tZXNhbHQ$"));
/// ```
#[instrument(
    skip_all,
    name = "argon2id::hash_encoded",
    fields(t = time_cost, m = memory_cost_kib, p = parallelism)
)]
pub fn hash_encoded(
    time_cost: u32,
    memory_cost_kib: u32,
    parallelism: u32,
    password: &[u8],
    salt: &[u8],
    output_len: usize,
) -> Result<String> {
    let params = Params::new(time_cost, memory_cost_kib, parallelism, output_len);
    params.validate_inputs(password, salt)?;

    let mut encoded = reserve(&params, salt.len(), output_len)?;
    let digest = Zeroizing::new(argon2id(password, salt, &params)?);
    encode_into(&mut encoded, &params, salt, &digest);

    Ok(encoded)
}
