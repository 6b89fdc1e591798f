//! Ethereum key building

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha3::{Digest, Keccak256};

use super::derivation::KeyMaterial;
use super::{Chain, KeyBuilder};
use crate::account::Wallet;
use crate::error::{Error, Result};

/// Builds Ethereum wallets from BIP-32 secp256k1 key material
#[derive(Debug, Clone, Copy, Default)]
pub struct EthereumKeyBuilder;

impl KeyBuilder for EthereumKeyBuilder {
    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    fn build(&self, material: &KeyMaterial) -> Result<Wallet> {
        let secret_key = SecretKey::from_slice(material.secret())
            .map_err(|e| Error::InvalidKeyMaterial(format!("invalid secp256k1 scalar: {e}")))?;

        let secp = Secp256k1::signing_only();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        Ok(Wallet {
            chain: Chain::Ethereum,
            public_key: public_key_to_address(&public_key),
            private_key: format!("0x{}", hex::encode(secret_key.secret_bytes())),
        })
    }
}

/// Get the checksummed Ethereum address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    // Skip the 0x04 tag and hash the 64-byte point
    let uncompressed = public_key.serialize_uncompressed();
    let key_hash = keccak256(&uncompressed[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&key_hash[12..]);
    to_checksum_address(&address)
}

/// Format a 20-byte address with EIP-55 mixed-case checksum
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        if nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}

/// Check a `0x` address string carries a correct EIP-55 checksum
pub fn is_valid_checksum_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix("0x") else {
        return false;
    };

    let Ok(bytes) = hex::decode(body) else {
        return false;
    };

    match <[u8; 20]>::try_from(bytes.as_slice()) {
        Ok(raw) => to_checksum_address(&raw) == address,
        Err(_) => false,
    }
}

/// Calculate the Keccak-256 hash of data
fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
