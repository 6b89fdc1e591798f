//! Solana key building

use ed25519_dalek::SigningKey;
use zeroize::Zeroizing;

use super::derivation::KeyMaterial;
use super::{Chain, KeyBuilder};
use crate::account::Wallet;
use crate::error::{Error, Result};

/// Builds Solana wallets from SLIP-0010 ed25519 key material.
///
/// The public key is the base58 ed25519 point. The private key is the hex
/// encoded 64-byte `secret || public` keypair, the layout Solana keypair files use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaKeyBuilder;

impl KeyBuilder for SolanaKeyBuilder {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    fn build(&self, material: &KeyMaterial) -> Result<Wallet> {
        let signing_key = SigningKey::from_bytes(material.secret());
        let verifying_key = signing_key.verifying_key();
        let keypair = Zeroizing::new(signing_key.to_keypair_bytes());

        Ok(Wallet {
            chain: Chain::Solana,
            public_key: bs58::encode(verifying_key.as_bytes()).into_string(),
            private_key: hex::encode(&keypair[..]),
        })
    }
}

/// Decode a base58 Solana public key, requiring exactly 32 bytes
pub fn decode_public_key(public_key: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(public_key)
        .into_vec()
        .map_err(|e| Error::InvalidKeyMaterial(format!("invalid base58 public key: {e}")))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        Error::InvalidKeyMaterial(format!(
            "Solana public key must be 32 bytes, got {}",
            bytes.len()
        ))
    })
}
