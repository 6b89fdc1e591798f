//! Cryptographic primitives and operations
//!
//! This module provides functionality for mnemonic generation, seed and key
//! derivation, and the chain specific key encodings required for wallet management.

pub mod entropy;
pub mod keys;
pub mod mnemonic;

pub use entropy::*;
pub use keys::*;
pub use mnemonic::*;
