//! A stored password hash.
//!
//! [`Password`] pairs an encoded hash string with its parsed contents, so
//! that the salt and costs can be inspected and candidate passwords checked
//! without parsing the string again.

use core::fmt;
use core::str::FromStr;

use rand::RngCore;
use rand::rngs::OsRng;
use tracing::instrument;
use zeroize::Zeroizing;

use super::config::Config;
use super::core::hash_encoded;
use super::encoding::{DecodedHash, decode};
use super::error::{Error, Result};
use super::params::Version;
use super::verify::verify_decoded;

/// An Argon2id password hash.
///
/// ```rust
/// use argon2id::{Config, Password};
///
/// let config = Config::default().with_m_cost(64).with_t_cost(1);
/// let password = Password::create(b"opensesame", &config).unwrap();
///
/// assert!(password.is_password(b"opensesame").unwrap());
/// assert!(!password.is_password(b"notopensesame").unwrap());
///
/// let stored = password.to_string();
/// let parsed: Password = stored.parse().unwrap();
/// assert_eq!(parsed.salt(), password.salt());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    encoded: String,
    decoded: DecodedHash,
}

impl Password {
    /// Hashes `pwd` with a fresh random salt of `config.salt_len` bytes.
    ///
    /// # Errors
    ///
    /// Fails like [`hash_encoded`]. A failure of the operating system's
    /// random number generator is a [`Error::HashingFailure`].
    #[instrument(skip_all, name = "argon2id::Password::create")]
    pub fn create(pwd: &[u8], config: &Config) -> Result<Self> {
        let mut salt = Zeroizing::new(vec![0u8; config.salt_len]);
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|err| Error::HashingFailure(format!("failed to generate salt: {err}")))?;

        let encoded = hash_encoded(
            config.t_cost,
            config.m_cost,
            config.parallelism,
            pwd,
            &salt,
            config.output_len,
        )?;

        Self::parse(&encoded)
    }

    /// Parses an encoded hash string.
    pub fn parse(encoded: &str) -> Result<Self> {
        let decoded = decode(encoded)?;
        Ok(Self {
            encoded: encoded.to_owned(),
            decoded,
        })
    }

    /// Returns `true` if `encoded` is a well-formed Argon2id hash.
    pub fn is_valid_hash(encoded: &str) -> bool {
        decode(encoded).is_ok()
    }

    /// Checks a candidate password in constant time.
    pub fn is_password(&self, pwd: &[u8]) -> Result<bool> {
        verify_decoded(&self.decoded, pwd)
    }

    /// The encoded hash string, exactly as created or parsed.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn version(&self) -> Version {
        self.decoded.version
    }

    /// Memory cost in KiB.
    pub fn m_cost(&self) -> u32 {
        self.decoded.memory_cost_kib
    }

    pub fn t_cost(&self) -> u32 {
        self.decoded.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.decoded.parallelism
    }

    pub fn salt(&self) -> &[u8] {
        &self.decoded.salt
    }

    /// The stored digest.
    pub fn output(&self) -> &[u8] {
        &self.decoded.digest
    }

    pub fn decoded(&self) -> &DecodedHash {
        &self.decoded
    }
}

impl FromStr for Password {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Password {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&self.decoded).finish()
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}
