//! Session configuration

use std::fmt;

use crate::crypto::mnemonic::WordCount;
use crate::error::{Error, Result};

/// Environment variable holding the mnemonic word count
pub const WORD_COUNT_ENV: &str = "KEYFORGE_WORD_COUNT";
/// Environment variable holding the BIP-39 passphrase
pub const PASSPHRASE_ENV: &str = "KEYFORGE_PASSPHRASE";

/// Settings applied to every regeneration in a session
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Length of freshly generated mnemonics
    pub word_count: WordCount,
    /// BIP-39 passphrase, empty by default
    pub passphrase: String,
}

impl SessionConfig {
    /// Read the configuration from `KEYFORGE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(WORD_COUNT_ENV) {
            let count = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::Config(format!("{WORD_COUNT_ENV} is not a number: {raw:?}")))?;
            config.word_count = WordCount::try_from(count)
                .map_err(|e| Error::Config(format!("{WORD_COUNT_ENV}: {e}")))?;
        }

        if let Some(passphrase) = lookup(PASSPHRASE_ENV) {
            config.passphrase = passphrase;
        }

        Ok(config)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("word_count", &self.word_count)
            .field("passphrase", &if self.passphrase.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}
