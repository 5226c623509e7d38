//! Encoded hash strings.
//!
//! An Argon2id hash is stored as a single self-describing string:
//!
//! ```text
//! $argon2id$v=19$m=<memory_cost_kib>,t=<time_cost>,p=<parallelism>$<salt>$<digest>
//! ```
//!
//! Salt and digest use the standard base64 alphabet without padding.
//! Encoding is exact-sized: the output length is computed up front from the
//! parameters, and the buffer is reserved fallibly before anything is
//! written. Decoding is all-or-nothing; any deviation from the format is
//! rejected before hashing work begins.

use core::fmt::Write as _;
use core::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;

use super::error::{Error, Result};
use super::params::{MAX_INPUT_LEN, MAX_OUTPUT_LEN, MIN_OUTPUT_LEN, Params, Version};

const TAG: &str = "$argon2id";
const VERSION_KEY: &str = "$v=";
const MEMORY_KEY: &str = "$m=";
const TIME_KEY: &str = ",t=";
const LANES_KEY: &str = ",p=";
const SEPARATOR: char = '$';

/// The contents of an encoded Argon2id hash.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedHash {
    pub version: Version,
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
}

impl DecodedHash {
    /// Parameters that reproduce the digest.
    pub fn params(&self) -> Params {
        Params::new(
            self.time_cost,
            self.memory_cost_kib,
            self.parallelism,
            self.digest.len(),
        )
        .with_version(self.version)
    }

    /// Re-encodes the hash in canonical form.
    pub fn encode(&self) -> Result<String> {
        encode(&self.params(), &self.salt, &self.digest)
    }
}

impl core::fmt::Debug for DecodedHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodedHash")
            .field("version", &self.version)
            .field("memory_cost_kib", &self.memory_cost_kib)
            .field("time_cost", &self.time_cost)
            .field("parallelism", &self.parallelism)
            .field("salt_len", &self.salt.len())
            .field("digest_len", &self.digest.len())
            .finish()
    }
}

impl FromStr for DecodedHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

fn decimal_len(n: u32) -> usize {
    n.checked_ilog10().map_or(1, |digits| digits as usize + 1)
}

/// Exact length of the encoded string for the given parameters and
/// salt/digest sizes, or `None` if it overflows `usize`.
pub fn encoded_len(params: &Params, salt_len: usize, digest_len: usize) -> Option<usize> {
    let header = TAG.len()
        + VERSION_KEY.len()
        + decimal_len(params.version.as_u32())
        + MEMORY_KEY.len()
        + decimal_len(params.memory_cost_kib)
        + TIME_KEY.len()
        + decimal_len(params.time_cost)
        + LANES_KEY.len()
        + decimal_len(params.parallelism)
        + 2 * SEPARATOR.len_utf8();

    header
        .checked_add(base64::encoded_len(salt_len, false)?)?
        .checked_add(base64::encoded_len(digest_len, false)?)
}

/// Reserves exactly enough room for the encoding of a hash with the given
/// parameters and sizes.
pub(crate) fn reserve(params: &Params, salt_len: usize, digest_len: usize) -> Result<String> {
    let len = encoded_len(params, salt_len, digest_len).ok_or(Error::OutOfMemory {
        bytes: usize::MAX,
    })?;

    let mut out = String::new();
    out.try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory { bytes: len })?;
    Ok(out)
}

/// Appends the encoding of (`params`, `salt`, `digest`) to `out`.
///
/// `params.output_len` is ignored in favour of `digest.len()`.
pub(crate) fn encode_into(out: &mut String, params: &Params, salt: &[u8], digest: &[u8]) {
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "{TAG}{VERSION_KEY}{}{MEMORY_KEY}{}{TIME_KEY}{}{LANES_KEY}{}{SEPARATOR}",
        params.version, params.memory_cost_kib, params.time_cost, params.parallelism,
    );
    STANDARD_NO_PAD.encode_string(salt, out);
    out.push(SEPARATOR);
    STANDARD_NO_PAD.encode_string(digest, out);
}

/// Serializes parameters, salt and digest into an encoded hash string.
pub fn encode(params: &Params, salt: &[u8], digest: &[u8]) -> Result<String> {
    let mut out = reserve(params, salt.len(), digest.len())?;
    encode_into(&mut out, params, salt, digest);
    Ok(out)
}

/// Parses an encoded hash string.
///
/// Fails with [`Error::MalformedEncoding`] when the delimiters, algorithm
/// tag, version or `key=value` fields do not match exactly, when a number
/// is not canonical decimal, when base64 contains invalid symbols, or when
/// the decoded cost parameters are out of range. Fails with
/// [`Error::InvalidLength`] when a base64 segment has an impossible length
/// or decodes to a salt or digest of unacceptable size.
///
/// A string without the `v=` field is accepted as version 1.0.
pub fn decode(encoded: &str) -> Result<DecodedHash> {
    if encoded.len() > MAX_INPUT_LEN {
        return Err(Error::invalid_length("encoded hash is too long"));
    }

    let mut cursor = Cursor { rest: encoded };

    cursor.expect(TAG, "unsupported algorithm tag")?;
    let version = if cursor.eat(VERSION_KEY) {
        Version::try_from(cursor.decimal("version")?)?
    } else {
        Version::V0x10
    };

    cursor.expect(MEMORY_KEY, "missing memory cost")?;
    let memory_cost_kib = cursor.decimal("memory cost")?;
    cursor.expect(TIME_KEY, "missing time cost")?;
    let time_cost = cursor.decimal("time cost")?;
    cursor.expect(LANES_KEY, "missing parallelism")?;
    let parallelism = cursor.decimal("parallelism")?;

    cursor.expect("$", "missing salt")?;
    let salt = base64_segment(cursor.segment(), "salt")?;
    cursor.expect("$", "missing digest")?;
    let digest = base64_segment(cursor.segment(), "digest")?;

    if !cursor.rest.is_empty() {
        return Err(Error::malformed("trailing data after digest"));
    }

    if salt.is_empty() || salt.len() > MAX_INPUT_LEN {
        return Err(Error::invalid_length(format!(
            "salt decodes to {} bytes",
            salt.len()
        )));
    }

    if !(MIN_OUTPUT_LEN..=MAX_OUTPUT_LEN).contains(&digest.len()) {
        return Err(Error::invalid_length(format!(
            "digest decodes to {} bytes",
            digest.len()
        )));
    }

    let decoded = DecodedHash {
        version,
        memory_cost_kib,
        time_cost,
        parallelism,
        salt,
        digest,
    };

    decoded
        .params()
        .validate()
        .map_err(|cause| Error::malformed(format!("out-of-range parameters: {cause}")))?;

    Ok(decoded)
}

fn base64_segment(segment: &str, what: &str) -> Result<Vec<u8>> {
    STANDARD_NO_PAD.decode(segment).map_err(|err| match err {
        base64::DecodeError::InvalidLength(len) => {
            Error::invalid_length(format!("{what} has an impossible base64 length {len}"))
        }
        other => Error::malformed(format!("{what} is not valid base64: {other}")),
    })
}

/// Left-to-right scanner over an encoded hash.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn eat(&mut self, literal: &str) -> bool {
        match self.rest.strip_prefix(literal) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, literal: &str, reason: &'static str) -> Result<()> {
        if self.eat(literal) {
            Ok(())
        } else {
            Err(Error::malformed(reason))
        }
    }

    /// Reads a canonical unsigned decimal: no sign, no leading zeros, fits
    /// in 32 bits.
    fn decimal(&mut self, what: &str) -> Result<u32> {
        let digits = self
            .rest
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        let (number, rest) = self.rest.split_at(digits);

        if number.is_empty() {
            return Err(Error::malformed(format!("{what} is not a number")));
        }

        if number.len() > 1 && number.starts_with('0') {
            return Err(Error::malformed(format!("{what} has leading zeros")));
        }

        let value = number
            .parse::<u32>()
            .map_err(|_| Error::malformed(format!("{what} does not fit in 32 bits")))?;

        self.rest = rest;
        Ok(value)
    }

    /// Takes everything up to the next `$` or the end of input.
    fn segment(&mut self) -> &'a str {
        let end = self.rest.find(SEPARATOR).unwrap_or(self.rest.len());
        let (segment, rest) = self.rest.split_at(end);
        self.rest = rest;
        segment
    }
}
