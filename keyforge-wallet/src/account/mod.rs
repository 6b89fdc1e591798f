//! Account management functionality
//!
//! This module provides the derived wallet types and the session store that
//! tracks the working mnemonic, its current wallet, and the saved wallets.

mod session;
mod shared;
mod wallet;

pub use session::*;
pub use shared::*;
pub use wallet::*;
