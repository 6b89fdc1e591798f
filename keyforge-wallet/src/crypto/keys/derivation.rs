//! Hierarchical key derivation
//!
//! Walks a derivation path from the master key of a BIP-39 seed. Ed25519 keys
//! follow SLIP-0010 (hardened segments only), secp256k1 keys follow BIP-32.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, SignOnly};
use sha2::Sha512;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::mnemonic::Seed;
use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Offset added to an index to mark it hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";
const SECP256K1_SEED_KEY: &[u8] = b"Bitcoin seed";

/// Elliptic curve a derivation runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    Ed25519,
    Secp256k1,
}

/// One step of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// Index below the hardened offset
    pub index: u32,
    pub hardened: bool,
}

impl PathSegment {
    pub const fn hardened(index: u32) -> Self {
        Self { index, hardened: true }
    }

    pub const fn normal(index: u32) -> Self {
        Self { index, hardened: false }
    }

    /// The 32-bit child number used on the wire
    pub fn child_number(&self) -> Result<u32> {
        if self.index >= HARDENED_OFFSET {
            return Err(Error::InvalidPath(format!(
                "segment index {} does not fit below 2^31",
                self.index
            )));
        }
        Ok(if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        })
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// An ordered derivation path such as `m/44'/60'/0'/0/0`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    segments: Cow<'static, [PathSegment]>,
}

impl DerivationPath {
    /// Solana: `m/44'/501'/0'/0'`
    pub const SOLANA: Self = Self::from_static(&[
        PathSegment::hardened(44),
        PathSegment::hardened(501),
        PathSegment::hardened(0),
        PathSegment::hardened(0),
    ]);

    /// Ethereum: `m/44'/60'/0'/0/0`
    pub const ETHEREUM: Self = Self::from_static(&[
        PathSegment::hardened(44),
        PathSegment::hardened(60),
        PathSegment::hardened(0),
        PathSegment::normal(0),
        PathSegment::normal(0),
    ]);

    pub const fn from_static(segments: &'static [PathSegment]) -> Self {
        Self {
            segments: Cow::Borrowed(segments),
        }
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self {
            segments: Cow::Owned(segments),
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check the path can be walked on `curve`
    pub fn validate(&self, curve: Curve) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidPath("path has no segments".to_string()));
        }

        for segment in self.segments() {
            segment.child_number()?;
            if curve == Curve::Ed25519 && !segment.hardened {
                return Err(Error::InvalidPath(format!(
                    "ed25519 derivation only supports hardened segments, got {segment} in {self}"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in self.segments() {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let mut components = path.split('/');
        if components.next() != Some("m") {
            return Err(Error::InvalidPath(format!("path must start with m: {path}")));
        }

        let mut segments = Vec::new();
        for component in components {
            let (digits, hardened) = match component.strip_suffix(|c| matches!(c, '\'' | 'h' | 'H')) {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            let index = digits
                .parse::<u32>()
                .map_err(|_| Error::InvalidPath(format!("invalid path component: {component:?}")))?;

            let segment = PathSegment { index, hardened };
            segment.child_number()?;
            segments.push(segment);
        }

        Ok(Self::new(segments))
    }
}

/// Secret and chain code at the end of a derivation, zeroized on drop
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    secret: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl KeyMaterial {
    pub fn new(secret: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            chain_code: Zeroizing::new(chain_code),
        }
    }

    /// Build from slices, enforcing the 32-byte lengths
    pub fn from_slices(secret: &[u8], chain_code: &[u8]) -> Result<Self> {
        if secret.len() != 32 || chain_code.len() != 32 {
            return Err(Error::InvalidKeyMaterial(format!(
                "expected 32-byte secret and chain code, got {} and {}",
                secret.len(),
                chain_code.len()
            )));
        }
        let mut material = Self::new([0u8; 32], [0u8; 32]);
        material.secret.copy_from_slice(secret);
        material.chain_code.copy_from_slice(chain_code);
        Ok(material)
    }

    pub fn secret(&self) -> &[u8; 32] {
        &self.secret
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}

/// Walk `path` over `seed` on the given curve
pub fn derive_key_material(seed: &Seed, path: &DerivationPath, curve: Curve) -> Result<KeyMaterial> {
    path.validate(curve)?;

    let material = match curve {
        Curve::Ed25519 => {
            let mut node = hmac_split(ED25519_SEED_KEY, &[&seed.as_bytes()[..]])?;
            for segment in path.segments() {
                node = derive_ed25519_child(&node, segment.child_number()?)?;
            }
            node
        }
        Curve::Secp256k1 => {
            let secp = Secp256k1::signing_only();
            let mut node = hmac_split(SECP256K1_SEED_KEY, &[&seed.as_bytes()[..]])?;
            SecretKey::from_slice(node.secret())
                .map_err(|e| Error::InvalidKeyMaterial(format!("invalid master key: {e}")))?;
            for segment in path.segments() {
                node = derive_secp256k1_child(&secp, &node, segment.child_number()?)?;
            }
            node
        }
    };

    debug!(%path, ?curve, "derived key material");
    Ok(material)
}

/// SLIP-0010 hardened child: HMAC(c, 0x00 || k || i)
fn derive_ed25519_child(parent: &KeyMaterial, child_number: u32) -> Result<KeyMaterial> {
    hmac_split(
        parent.chain_code(),
        &[&[0x00u8][..], &parent.secret()[..], &child_number.to_be_bytes()[..]],
    )
}

/// BIP-32 private child: k_i = IL + k_par (mod n)
fn derive_secp256k1_child(
    secp: &Secp256k1<SignOnly>,
    parent: &KeyMaterial,
    child_number: u32,
) -> Result<KeyMaterial> {
    let parent_key = SecretKey::from_slice(parent.secret())
        .map_err(|e| Error::InvalidKeyMaterial(format!("invalid parent key: {e}")))?;

    let mut data = Zeroizing::new(Vec::with_capacity(37));
    if child_number >= HARDENED_OFFSET {
        data.push(0x00);
        data.extend_from_slice(parent.secret());
    } else {
        data.extend_from_slice(&PublicKey::from_secret_key(secp, &parent_key).serialize());
    }
    data.extend_from_slice(&child_number.to_be_bytes());

    let node = hmac_split(parent.chain_code(), &[&data[..]])?;

    let child = tweak_secret(&parent_key, node.secret())
        .map_err(|e| Error::InvalidKeyMaterial(format!("child {child_number}: {e}")))?;

    KeyMaterial::from_slices(&child.secret_bytes(), node.chain_code())
}

/// IL + k_par (mod n). Fails only for IL >= n or a zero sum.
fn tweak_secret(parent_key: &SecretKey, il: &[u8; 32]) -> Result<SecretKey> {
    let tweak = Scalar::from_be_bytes(*il)
        .map_err(|e| Error::InvalidKeyMaterial(format!("IL not below curve order: {e}")))?;
    parent_key
        .add_tweak(&tweak)
        .map_err(|e| Error::InvalidKeyMaterial(format!("child key is zero: {e}")))
}

fn hmac_split(key: &[u8], parts: &[&[u8]]) -> Result<KeyMaterial> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|_| Error::InvalidKeyMaterial("HMAC error".to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());

    KeyMaterial::from_slices(&output[..32], &output[32..])
}
