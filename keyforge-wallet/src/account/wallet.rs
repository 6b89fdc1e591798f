//! Wallet types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::Chain;

/// A display-ready keypair for one chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wallet {
    pub chain: Chain,
    /// Base58 point for Solana, EIP-55 address for Ethereum
    pub public_key: String,
    /// Hex encoded private key
    pub private_key: String,
}

/// Stable identifier of a saved wallet within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WalletId(pub u64);

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wallet_{}", self.0)
    }
}

/// A snapshot of a wallet kept in a session, with its own visibility flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWallet {
    pub id: WalletId,
    pub wallet: Wallet,
    /// Whether the private key is shown
    pub visible: bool,
}
