//! Argon2id password hashing function (RFC 9106).
//!
//! Argon2id is a memory-hard password hashing function. The first half of
//! its first pass picks reference blocks independently of the password,
//! like Argon2i; everything after that picks them from memory contents,
//! like Argon2d.
//!
//! # Pipeline
//!
//! 1. **Validation**: every cost parameter and input length is checked
//!    before any memory is allocated.
//! 2. **Allocation**: the memory matrix is reserved fallibly, so an
//!    unsatisfiable memory cost is an [`Error::OutOfMemory`].
//! 3. **Initialization**: H0 = BLAKE2b(params || password || salt || ...),
//!    then the first two blocks of each lane come from H'.
//! 4. **Filling**: the compression function G fills the rest of the
//!    matrix, pass by pass and slice by slice.
//! 5. **Finalization**: the last block of every lane is XORed together and
//!    stretched by H' to the requested tag length.
//!
//! The matrix is wiped when it is dropped, on every exit path.
//!
//! # Memory Organization
//!
//! Memory is a matrix of 1024-byte blocks:
//! - **Lanes**: independent rows, one per unit of parallelism.
//! - **Slices**: each lane is cut into 4 slices; a slice is a barrier
//!   across all lanes.
//! - **Segments**: the blocks of one lane within one slice. With the
//!   `parallel` feature the segments of a slice are filled concurrently.
//!
//! # Encoded Hashes
//!
//! [`hash_encoded`] returns the self-describing string form
//! `$argon2id$v=19$m=..,t=..,p=..$salt$digest`, which [`verify`] and
//! [`Password`] consume later. See the [`encoding`] module for the format.

pub(crate) mod block;
pub(crate) mod boundary;
pub mod config;
pub mod core;
pub mod encoding;
pub mod error;
pub(crate) mod fill;
pub(crate) mod memory;
pub mod params;
pub mod password;
pub(crate) mod reference;
pub mod verify;

pub use self::config::Config;
pub use self::core::{argon2id, hash_encoded};
pub use self::encoding::{DecodedHash, decode, encode, encoded_len};
pub use self::error::{Error, ErrorCategory, ParamError, Result};
pub use self::params::{Params, Version};
pub use self::password::Password;
pub use self::verify::verify;
