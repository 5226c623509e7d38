//! Password-based key derivation.
//!
//! This module groups memory-hard derivation functions built on top of the
//! crate's hash functions. It currently provides Argon2id (RFC 9106)
//! together with its encoded-string format, constant-time verification and
//! a stored-password value type.

pub mod argon2id;
