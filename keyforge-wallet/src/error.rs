//! Error types for the keyforge-wallet library

use thiserror::Error;

/// Custom error type for keyforge-wallet operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The secure random source could not produce entropy
    #[error("Entropy source error: {0}")]
    EntropySource(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Malformed path, or a segment the target curve cannot derive
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    /// Derived secret is not usable on the target curve
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Index {index} out of range for {len} saved wallets")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("A regeneration is already in progress for this session")]
    RegenerationInProgress,

    /// The session was reset while a regeneration was running
    #[error("Session was reset during regeneration")]
    SessionReset,

    /// Another wallet was committed while a regeneration was running
    #[error("Regeneration superseded by a newer wallet")]
    Superseded,

    #[error("Derivation task failed: {0}")]
    TaskFailed(String),

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for keyforge-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
