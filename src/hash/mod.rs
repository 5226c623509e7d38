//! Hash algorithms exposed by the crate.
//!
//! Currently includes BLAKE2b (RFC 7693) with a pure-Rust implementation,
//! together with the variable-length construction H' that Argon2 builds on
//! top of it.

pub mod blake2b;

/// Re-export of the BLAKE2b convenience functions.
pub use blake2b::core::{Blake2b, blake2b};
pub use blake2b::long::blake2b_long;
