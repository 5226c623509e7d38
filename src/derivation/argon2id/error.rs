//! Error types for Argon2id hashing and verification.
//!
//! Every failure is a variant of the closed [`Error`] enum. Callers that
//! need to translate errors into another runtime's exception hierarchy can
//! use [`Error::category`] to tell caller mistakes and malformed input
//! apart from resource exhaustion and internal failures.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A cost parameter or input that falls outside the accepted range.
///
/// Each variant names the offending field. The messages match the ones
/// produced by the reference Argon2 library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Time cost is too small")]
    TimeTooSmall,
    #[error("Memory cost is too small")]
    MemoryTooLittle,
    #[error("Too few lanes")]
    TooFewLanes,
    #[error("Too many lanes")]
    TooManyLanes,
    #[error("Output is too short")]
    OutputTooShort,
    #[error("Output is too long")]
    OutputTooLong,
    #[error("Salt is too short")]
    SaltTooShort,
    #[error("Salt is too long")]
    SaltTooLong,
    #[error("Password is too long")]
    PasswordTooLong,
    #[error("Secret is too long")]
    SecretTooLong,
    #[error("Associated data is too long")]
    AssociatedDataTooLong,
}

/// Errors returned by hashing, encoding and verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A precondition on the cost parameters or inputs was violated.
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ParamError),

    /// The memory matrix or the output buffer could not be allocated.
    #[error("not enough memory to allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// The encoded hash does not have the expected shape.
    #[error("malformed encoded hash: {0}")]
    MalformedEncoding(String),

    /// A base64 segment of the encoded hash has an impossible length.
    #[error("invalid length in encoded hash: {0}")]
    InvalidLength(String),

    /// The derivation itself failed.
    #[error("hashing failed: {0}")]
    HashingFailure(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad cost parameters or input lengths supplied by the caller.
    Parameter,
    /// Resource exhaustion; retrying with a lower memory cost may succeed.
    Allocation,
    /// Internal failure while deriving the hash.
    Hashing,
    /// Corrupt or foreign encoded hash.
    MalformedInput,
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedEncoding(reason.into())
    }

    pub(crate) fn invalid_length(reason: impl Into<String>) -> Self {
        Error::InvalidLength(reason.into())
    }

    /// Returns the category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidParameters(_) => ErrorCategory::Parameter,
            Error::OutOfMemory { .. } => ErrorCategory::Allocation,
            Error::MalformedEncoding(_) | Error::InvalidLength(_) => ErrorCategory::MalformedInput,
            Error::HashingFailure(_) => ErrorCategory::Hashing,
        }
    }

    /// Returns `true` for errors caused by the caller's arguments: invalid
    /// parameters and malformed encoded hashes.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Parameter | ErrorCategory::MalformedInput
        )
    }
}
