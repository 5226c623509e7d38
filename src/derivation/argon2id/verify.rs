//! Verification of a candidate password against an encoded hash.

use subtle::ConstantTimeEq;
use tracing::{instrument, warn};
use zeroize::Zeroizing;

use super::core::argon2id;
use super::encoding::{DecodedHash, decode};
use super::error::{Error, Result};

/// Checks `password` against an encoded Argon2id hash.
///
/// Returns `Ok(true)` only when the recomputed digest equals the stored
/// one. The comparison runs in constant time over the full digest length.
///
/// # Errors
///
/// - [`Error::MalformedEncoding`] or [`Error::InvalidLength`] when
///   `encoded` cannot be decoded. No hashing work is done in that case.
/// - [`Error::HashingFailure`] when the recomputation fails, including
///   when its memory cannot be allocated. A failure is never reported as a
///   mismatch.
///
/// # Example
///
/// ```rust
/// let encoded = argon2id::hash_encoded(1, 64, 1, b"secret", b"somesalt", 32).unwrap();
/// assert!(argon2id::verify(&encoded, b"secret").unwrap());
/// assert!(!argon2id::verify(&encoded, b"Secret").unwrap());
/// ```
#[instrument(skip_all, name = "argon2id::verify")]
pub fn verify(encoded: &str, password: &[u8]) -> Result<bool> {
    let decoded = decode(encoded)?;
    verify_decoded(&decoded, password)
}

pub(crate) fn verify_decoded(decoded: &DecodedHash, password: &[u8]) -> Result<bool> {
    let params = decoded.params();

    let computed = argon2id(password, &decoded.salt, &params)
        .map(Zeroizing::new)
        .map_err(|err| {
            warn!(%err, "re-derivation failed during verification");
            match err {
                Error::HashingFailure(_) => err,
                other => Error::HashingFailure(other.to_string()),
            }
        })?;

    Ok(bool::from(computed.as_slice().ct_eq(&decoded.digest)))
}
