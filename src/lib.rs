//! Argon2id password hashing and verification
//!
//! This crate computes and verifies Argon2id password hashes (RFC 9106): a
//! salted, memory-hard digest derived from a password under tunable time,
//! memory and parallelism costs, stored as a self-describing string.
//!
//! The focus is on **bit-exact reproducibility, predictable failure, and
//! hygiene of secret material**. The hash function, its BLAKE2b building
//! block, the memory matrix and the encoding are implemented in this crate.
//!
//! # Module overview
//!
//! - `hash`  
//!   BLAKE2b (RFC 7693) and the variable-length hash H' that Argon2 uses
//!   to seed and finalize its memory.
//!
//! - `derivation`  
//!   The Argon2id derivation itself.
//!
//!   Working memory is allocated fallibly, filled lane by lane (in
//!   parallel with the `parallel` feature) and wiped on every exit path.
//!   Encoded hashes are produced with exact sizing, parsed strictly, and
//!   verified with a constant-time digest comparison.
//!
//! # Usage
//!
//! ```rust
//! let encoded = argon2id::hash_encoded(2, 64, 1, b"correct password", b"somesalt12345678", 32)?;
//!
//! assert!(argon2id::verify(&encoded, b"correct password")?);
//! assert!(!argon2id::verify(&encoded, b"wrong password")?);
//! # Ok::<(), argon2id::Error>(())
//! ```
//!
//! # Errors
//!
//! Every operation returns [`Error`]. [`Error::category`] separates caller
//! mistakes (bad parameters, malformed hashes) from resource exhaustion and
//! internal failures, and a password mismatch is never reported as an
//! error.
//!
//! # Logging
//!
//! Operations emit `tracing` spans and events carrying cost parameters
//! only; passwords, salts and digests are never logged. No subscriber is
//! installed by the crate.

pub mod derivation;
pub mod hash;

pub use derivation::argon2id::{
    Config, DecodedHash, Error, ErrorCategory, ParamError, Params, Password, Result, Version,
    argon2id, decode, encode, encoded_len, hash_encoded, verify,
};
