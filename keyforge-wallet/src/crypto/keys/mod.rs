//! Key derivation and management
//!
//! This module turns seeds into chain specific keypairs. Each supported chain
//! pairs a fixed derivation path and curve with a [`KeyBuilder`] that encodes
//! the derived key material for display.

pub mod derivation;
pub mod ethereum;
pub mod solana;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use derivation::*;
pub use ethereum::EthereumKeyBuilder;
pub use solana::SolanaKeyBuilder;

use crate::account::Wallet;
use crate::crypto::mnemonic::Mnemonic;
use crate::error::{Error, Result};

/// Supported chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Solana,
    Ethereum,
}

impl Chain {
    /// The fixed derivation path for this chain
    pub fn derivation_path(&self) -> DerivationPath {
        match self {
            Self::Solana => DerivationPath::SOLANA,
            Self::Ethereum => DerivationPath::ETHEREUM,
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            Self::Solana => Curve::Ed25519,
            Self::Ethereum => Curve::Secp256k1,
        }
    }

    pub fn builder(&self) -> &'static dyn KeyBuilder {
        match self {
            Self::Solana => &SolanaKeyBuilder,
            Self::Ethereum => &EthereumKeyBuilder,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solana => "solana",
            Self::Ethereum => "ethereum",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solana" => Ok(Self::Solana),
            "ethereum" => Ok(Self::Ethereum),
            _ => Err(Error::UnsupportedChain(s.to_string())),
        }
    }
}

/// Turns derived key material into a display-ready wallet
pub trait KeyBuilder: Send + Sync {
    /// The chain this builder encodes for
    fn chain(&self) -> Chain;

    /// Build the wallet, rejecting material that is not a valid key on the curve
    fn build(&self, material: &KeyMaterial) -> Result<Wallet>;
}

/// Build a wallet for `chain` from already derived key material
pub fn build_wallet(chain: Chain, material: &KeyMaterial) -> Result<Wallet> {
    chain.builder().build(material)
}

/// Run the full pipeline: seed, chain path, key builder
pub fn derive_wallet(chain: Chain, mnemonic: &Mnemonic, passphrase: &str) -> Result<Wallet> {
    let seed = mnemonic.to_seed(passphrase);
    let material = derive_key_material(&seed, &chain.derivation_path(), chain.curve())?;
    let wallet = build_wallet(chain, &material)?;

    info!(%chain, public_key = %wallet.public_key, "derived wallet");
    Ok(wallet)
}
