//! Sources of mnemonic entropy

use rand::{rngs::OsRng, RngCore};

use crate::error::{Error, Result};

/// A cryptographically secure source of random bytes.
///
/// Implementations must fail rather than hand out weaker randomness.
pub trait EntropySource {
    /// Fill `dest` entirely with random bytes
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| Error::EntropySource(e.to_string()))
    }
}

impl<T: EntropySource + ?Sized> EntropySource for &mut T {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

impl<T: EntropySource + ?Sized> EntropySource for Box<T> {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}
