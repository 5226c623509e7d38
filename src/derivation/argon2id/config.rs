//! Default cost settings for password hashing.

use super::params::Params;

/// Cost settings used by [`Password::create`](super::password::Password::create).
///
/// The default follows the second OWASP recommendation for Argon2id:
/// 19 MiB of memory, 2 passes, 1 lane, a 16-byte salt and a 32-byte tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    /// Number of passes over memory.
    pub t_cost: u32,
    /// Memory size in KiB.
    pub m_cost: u32,
    /// Number of lanes.
    pub parallelism: u32,
    /// Length of the random salt in bytes.
    pub salt_len: usize,
    /// Length of the tag in bytes.
    pub output_len: usize,
}

impl Config {
    pub const DEFAULT_T_COST: u32 = 2;
    pub const DEFAULT_M_COST: u32 = 19_456;
    pub const DEFAULT_PARALLELISM: u32 = 1;
    pub const DEFAULT_SALT_LEN: usize = 16;
    pub const DEFAULT_OUTPUT_LEN: usize = 32;

    const fn preset(t_cost: u32, m_cost: u32, parallelism: u32) -> Self {
        Self {
            t_cost,
            m_cost,
            parallelism,
            salt_len: Self::DEFAULT_SALT_LEN,
            output_len: Self::DEFAULT_OUTPUT_LEN,
        }
    }

    /// 46 MiB, 1 pass, 1 lane.
    pub const OWASP_1: Self = Self::preset(1, 47_104, 1);
    /// 19 MiB, 2 passes, 1 lane.
    pub const OWASP_2: Self = Self::preset(2, 19_456, 1);
    /// 12 MiB, 3 passes, 1 lane.
    pub const OWASP_3: Self = Self::preset(3, 12_288, 1);
    /// 9 MiB, 4 passes, 1 lane.
    pub const OWASP_4: Self = Self::preset(4, 9_216, 1);
    /// 7 MiB, 5 passes, 1 lane.
    pub const OWASP_5: Self = Self::preset(5, 7_168, 1);
    /// First recommended option of RFC 9106: 2 GiB, 1 pass, 4 lanes.
    pub const RFC_9106_HIGH_MEMORY: Self = Self::preset(1, 1 << 21, 4);
    /// Second recommended option of RFC 9106: 64 MiB, 3 passes, 4 lanes.
    pub const RFC_9106_LOW_MEMORY: Self = Self::preset(3, 1 << 16, 4);

    pub fn with_t_cost(mut self, t_cost: u32) -> Self {
        self.t_cost = t_cost;
        self
    }

    pub fn with_m_cost(mut self, m_cost: u32) -> Self {
        self.m_cost = m_cost;
        self
    }

    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_salt_len(mut self, salt_len: usize) -> Self {
        self.salt_len = salt_len;
        self
    }

    pub fn with_output_len(mut self, output_len: usize) -> Self {
        self.output_len = output_len;
        self
    }

    /// Low-level parameters for these settings.
    pub fn params(&self) -> Params {
        Params::new(self.t_cost, self.m_cost, self.parallelism, self.output_len)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::preset(
            Self::DEFAULT_T_COST,
            Self::DEFAULT_M_COST,
            Self::DEFAULT_PARALLELISM,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_second_owasp_option() {
        assert_eq!(Config::default(), Config::OWASP_2);
        assert_eq!(Config::default().salt_len, 16);
        assert_eq!(Config::default().output_len, 32);
    }

    #[test]
    fn presets_are_valid_parameters() {
        for preset in [
            Config::OWASP_1,
            Config::OWASP_2,
            Config::OWASP_3,
            Config::OWASP_4,
            Config::OWASP_5,
            Config::RFC_9106_HIGH_MEMORY,
            Config::RFC_9106_LOW_MEMORY,
        ] {
            assert_eq!(preset.params().validate(), Ok(()));
        }
    }

    #[test]
    fn builders_override_single_fields() {
        let config = Config::default().with_m_cost(64).with_t_cost(1).with_salt_len(8);
        assert_eq!(config.m_cost, 64);
        assert_eq!(config.t_cost, 1);
        assert_eq!(config.salt_len, 8);
        assert_eq!(config.parallelism, Config::DEFAULT_PARALLELISM);
    }
}
