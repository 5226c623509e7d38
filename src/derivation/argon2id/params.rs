//! Parameter definitions and validation for Argon2id.
//!
//! This module defines the configurable parameters for Argon2id and provides
//! validation to ensure they meet the algorithm's requirements before any
//! memory is allocated.

use core::fmt;

use super::error::{Error, ParamError};
use super::memory::SYNC_POINTS;

/// Minimum number of passes over memory.
pub const MIN_TIME_COST: u32 = 1;
/// Minimum number of lanes.
pub const MIN_PARALLELISM: u32 = 1;
/// Maximum number of lanes (2^24 - 1).
pub const MAX_PARALLELISM: u32 = 0x00FF_FFFF;
/// Minimum memory cost per lane, in KiB.
pub const MIN_MEMORY_PER_LANE: u32 = 2 * SYNC_POINTS;
/// Minimum digest length in bytes.
pub const MIN_OUTPUT_LEN: usize = 4;
/// Maximum digest length in bytes.
pub const MAX_OUTPUT_LEN: usize = u32::MAX as usize;
/// Minimum salt length in bytes. Eight or more bytes are recommended.
pub const MIN_SALT_LEN: usize = 1;
/// Maximum length of the salt, password, secret and associated data.
pub const MAX_INPUT_LEN: usize = u32::MAX as usize;

/// Argon2 algorithm version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Version {
    /// Version 1.0: later passes overwrite blocks instead of XORing into
    /// them. Only produced by decoding hashes without a `v=` field.
    V0x10 = 0x10,
    /// Version 1.3 (RFC 9106).
    #[default]
    V0x13 = 0x13,
}

impl Version {
    /// Numeric value as written in `v=<version>`.
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Version {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x10 => Ok(Version::V0x10),
            0x13 => Ok(Version::V0x13),
            other => Err(Error::malformed(format!("unsupported version {other}"))),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Configuration parameters for one Argon2id derivation.
///
/// These parameters control the memory and time cost of the hash function,
/// allowing the security level to be tuned for the target hardware and
/// threat model. They are checked by every operation before any working
/// memory is allocated.
#[derive(Clone, PartialEq, Eq)]
pub struct Params {
    /// Number of passes over memory (minimum 1).
    pub time_cost: u32,
    /// Memory size in KiB (minimum 8 × parallelism).
    pub memory_cost_kib: u32,
    /// Degree of parallelism (number of lanes, 1..=2^24-1).
    pub parallelism: u32,
    /// Length of the output tag in bytes (at least 4).
    pub output_len: usize,
    /// Algorithm version.
    pub version: Version,
    /// Optional secret key for keyed hashing.
    pub secret: Option<Vec<u8>>,
    /// Optional associated data.
    pub associated_data: Option<Vec<u8>>,
}

impl Params {
    /// Creates version 1.3 parameters without secret or associated data.
    pub fn new(time_cost: u32, memory_cost_kib: u32, parallelism: u32, output_len: usize) -> Self {
        Self {
            time_cost,
            memory_cost_kib,
            parallelism,
            output_len,
            version: Version::default(),
            secret: None,
            associated_data: None,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_associated_data(mut self, associated_data: impl Into<Vec<u8>>) -> Self {
        self.associated_data = Some(associated_data.into());
        self
    }

    /// Checks the cost parameters, output length, secret and associated
    /// data.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.time_cost < MIN_TIME_COST {
            return Err(ParamError::TimeTooSmall);
        }

        if self.parallelism < MIN_PARALLELISM {
            return Err(ParamError::TooFewLanes);
        }

        if self.parallelism > MAX_PARALLELISM {
            return Err(ParamError::TooManyLanes);
        }

        // Cannot overflow: parallelism < 2^24.
        if self.memory_cost_kib < MIN_MEMORY_PER_LANE * self.parallelism {
            return Err(ParamError::MemoryTooLittle);
        }

        if self.output_len < MIN_OUTPUT_LEN {
            return Err(ParamError::OutputTooShort);
        }

        if self.output_len > MAX_OUTPUT_LEN {
            return Err(ParamError::OutputTooLong);
        }

        if self.secret.as_ref().is_some_and(|k| k.len() > MAX_INPUT_LEN) {
            return Err(ParamError::SecretTooLong);
        }

        if self.associated_data.as_ref().is_some_and(|x| x.len() > MAX_INPUT_LEN) {
            return Err(ParamError::AssociatedDataTooLong);
        }

        Ok(())
    }

    /// Checks the parameters together with the password and salt.
    pub(crate) fn validate_inputs(&self, password: &[u8], salt: &[u8]) -> Result<(), ParamError> {
        self.validate()?;
        validate_salt(salt)?;

        if password.len() > MAX_INPUT_LEN {
            return Err(ParamError::PasswordTooLong);
        }

        Ok(())
    }

    /// Number of 1 KiB blocks in the memory matrix: the memory cost rounded
    /// down to a multiple of `4 × parallelism`.
    pub fn memory_blocks(&self) -> u32 {
        let quantum = SYNC_POINTS * self.parallelism.max(1);
        (self.memory_cost_kib / quantum) * quantum
    }

    /// Number of blocks computed with the compression function over the
    /// whole derivation. The first two blocks of every lane come from H'
    /// instead.
    pub fn block_computations(&self) -> u64 {
        (u64::from(self.time_cost) * u64::from(self.memory_blocks()))
            .saturating_sub(2 * u64::from(self.parallelism))
    }
}

pub(crate) fn validate_salt(salt: &[u8]) -> Result<(), ParamError> {
    if salt.len() < MIN_SALT_LEN {
        return Err(ParamError::SaltTooShort);
    }

    if salt.len() > MAX_INPUT_LEN {
        return Err(ParamError::SaltTooLong);
    }

    Ok(())
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("time_cost", &self.time_cost)
            .field("memory_cost_kib", &self.memory_cost_kib)
            .field("parallelism", &self.parallelism)
            .field("output_len", &self.output_len)
            .field("version", &self.version)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("associated_data", &self.associated_data.as_ref().map(Vec::len))
            .finish()
    }
}
