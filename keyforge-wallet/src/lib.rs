//! Keyforge Wallet Core - HD key derivation for Solana and Ethereum
//!
//! This library derives chain specific keypairs from a single BIP-39 mnemonic
//! and keeps an in-memory session of derived wallets. The pipeline runs
//! mnemonic, seed (PBKDF2-HMAC-SHA512), derivation path (SLIP-0010 or BIP-32),
//! then the chain key builder:
//!
//! | Chain    | Path               | Public key         | Private key             |
//! |----------|--------------------|--------------------|-------------------------|
//! | Solana   | `m/44'/501'/0'/0'` | base58 ed25519     | hex `secret \|\| public` |
//! | Ethereum | `m/44'/60'/0'/0/0` | EIP-55 address     | `0x` hex scalar         |

pub mod account;
pub mod config;
pub mod crypto;
pub mod error;

// Re-export commonly used types for convenience
pub use account::{SavedWallet, Session, SessionState, SharedSession, Wallet, WalletId};
pub use config::SessionConfig;
pub use crypto::keys::{build_wallet, derive_key_material, derive_wallet, Chain, DerivationPath, KeyMaterial};
pub use crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, validate_mnemonic, Mnemonic, Seed, WordCount};
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
