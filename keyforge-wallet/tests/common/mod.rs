//! Shared helpers for integration tests

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

pub const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
pub const LEGAL_WINNER: &str = "legal winner thank year wave sausage worth useful legal winner thank yellow";

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are ignored
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
