//! Mnemonic phrase generation and seed derivation

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use zeroize::Zeroizing;

use super::entropy::{EntropySource, OsEntropy};
use crate::error::{Error, Result};

/// Length of a BIP-39 seed in bytes
pub const SEED_LEN: usize = 64;

/// Supported mnemonic lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WordCount {
    /// 12 words (128 bits)
    #[default]
    Words12,
    /// 15 words (160 bits)
    Words15,
    /// 18 words (192 bits)
    Words18,
    /// 21 words (224 bits)
    Words21,
    /// 24 words (256 bits)
    Words24,
}

impl WordCount {
    /// Get entropy length in bytes
    pub fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words15 => 20,
            Self::Words18 => 24,
            Self::Words21 => 28,
            Self::Words24 => 32,
        }
    }

    /// Number of words in the phrase
    pub fn words(&self) -> usize {
        self.entropy_bytes() * 3 / 4
    }
}

impl TryFrom<usize> for WordCount {
    type Error = Error;

    fn try_from(count: usize) -> Result<Self> {
        match count {
            12 => Ok(Self::Words12),
            15 => Ok(Self::Words15),
            18 => Ok(Self::Words18),
            21 => Ok(Self::Words21),
            24 => Ok(Self::Words24),
            other => Err(Error::InvalidMnemonic(format!(
                "unsupported word count {other}, expected 12, 15, 18, 21 or 24"
            ))),
        }
    }
}

/// A checksum-validated BIP-39 mnemonic.
///
/// `Debug` never prints the words.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    inner: bip39::Mnemonic,
}

impl Mnemonic {
    /// Parse a phrase, checking wordlist membership, word count and checksum.
    ///
    /// Surrounding and repeated whitespace is ignored and words are matched
    /// case-insensitively.
    pub fn parse(phrase: &str) -> Result<Self> {
        let normalized = Zeroizing::new(
            phrase
                .split_whitespace()
                .map(str::to_ascii_lowercase)
                .collect::<Vec<_>>()
                .join(" "),
        );

        let inner = bip39::Mnemonic::parse_normalized(&normalized)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Build a mnemonic from raw entropy of a supported length
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        let inner = bip39::Mnemonic::from_entropy(entropy)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

        Ok(Self { inner })
    }

    /// The space separated phrase
    pub fn phrase(&self) -> String {
        self.inner.to_string()
    }

    /// The words in order
    pub fn words(&self) -> Vec<String> {
        self.phrase().split(' ').map(str::to_owned).collect()
    }

    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// Derive the 64-byte seed for this mnemonic
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        Seed::from_bytes(self.inner.to_seed(passphrase))
    }
}

impl FromStr for Mnemonic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count())
            .finish_non_exhaustive()
    }
}

/// A 64-byte BIP-39 seed, zeroized on drop
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get the raw seed bytes
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Generate a new random mnemonic from the operating system CSPRNG
pub fn generate_mnemonic(word_count: WordCount) -> Result<Mnemonic> {
    generate_mnemonic_with(&mut OsEntropy, word_count)
}

/// Generate a new random mnemonic drawing entropy from `source`
pub fn generate_mnemonic_with<E: EntropySource>(
    source: &mut E,
    word_count: WordCount,
) -> Result<Mnemonic> {
    let mut entropy = Zeroizing::new(vec![0u8; word_count.entropy_bytes()]);
    source.fill(&mut entropy)?;

    let mnemonic = Mnemonic::from_entropy(&entropy)?;
    debug!(words = mnemonic.word_count(), "generated mnemonic");

    Ok(mnemonic)
}

/// Check a mnemonic phrase against the wordlist and checksum
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse(phrase).is_ok()
}

/// Generate a seed from a mnemonic and passphrase
pub fn mnemonic_to_seed(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
    mnemonic.to_seed(passphrase)
}

/// Parse a phrase and generate its seed
pub fn phrase_to_seed(phrase: &str, passphrase: &str) -> Result<Seed> {
    Ok(Mnemonic::parse(phrase)?.to_seed(passphrase))
}
