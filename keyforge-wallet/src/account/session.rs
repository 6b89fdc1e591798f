//! Wallet session store
//!
//! A [`Session`] holds the working mnemonic, the wallet derived from it, and
//! the wallets the user chose to keep. Saved wallets carry a stable
//! [`WalletId`] and their own visibility flag, so deleting one never shifts
//! visibility onto a neighbour.

use std::fmt;

use tracing::{debug, info};

use super::wallet::{SavedWallet, Wallet, WalletId};
use crate::config::SessionConfig;
use crate::crypto::entropy::{EntropySource, OsEntropy};
use crate::crypto::keys::{derive_wallet, Chain};
use crate::crypto::mnemonic::{generate_mnemonic_with, Mnemonic};
use crate::error::{Error, Result};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No mnemonic yet
    Empty,
    /// Mnemonic and current wallet are available
    Ready,
}

/// One user's derivation session for a single chain
pub struct Session<E: EntropySource = OsEntropy> {
    chain: Chain,
    config: SessionConfig,
    entropy: E,
    mnemonic: Option<Mnemonic>,
    current_wallet: Option<Wallet>,
    current_visible: bool,
    saved: Vec<SavedWallet>,
    show_all: bool,
    next_id: u64,
    epoch: u64,
    generation: u64,
}

impl Session<OsEntropy> {
    /// Create an empty session for `chain` with default settings
    pub fn new(chain: Chain) -> Self {
        Self::with_config(chain, SessionConfig::default())
    }

    pub fn with_config(chain: Chain, config: SessionConfig) -> Self {
        Self::with_entropy(chain, config, OsEntropy)
    }

    /// Create a ready session from a phrase the user already has
    pub fn from_phrase(chain: Chain, phrase: &str) -> Result<Self> {
        let mut session = Self::new(chain);
        session.load_mnemonic(Mnemonic::parse(phrase)?)?;
        Ok(session)
    }
}

impl<E: EntropySource> Session<E> {
    /// Create an empty session drawing mnemonic entropy from `entropy`
    pub fn with_entropy(chain: Chain, config: SessionConfig, entropy: E) -> Self {
        Self {
            chain,
            config,
            entropy,
            mnemonic: None,
            current_wallet: None,
            current_visible: false,
            saved: Vec::new(),
            show_all: false,
            next_id: 0,
            epoch: 0,
            generation: 0,
        }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.mnemonic.is_some() {
            SessionState::Ready
        } else {
            SessionState::Empty
        }
    }

    pub fn mnemonic(&self) -> Option<&Mnemonic> {
        self.mnemonic.as_ref()
    }

    pub fn current_wallet(&self) -> Option<&Wallet> {
        self.current_wallet.as_ref()
    }

    pub fn saved_wallets(&self) -> &[SavedWallet] {
        &self.saved
    }

    /// Per-entry private key visibility, in saved order
    pub fn visibility(&self) -> Vec<bool> {
        self.saved.iter().map(|entry| entry.visible).collect()
    }

    /// Replace the mnemonic with a fresh one and derive its wallet.
    ///
    /// On error the previous mnemonic and wallet are left untouched.
    pub fn regenerate(&mut self) -> Result<&Wallet> {
        let mnemonic = self.draw_mnemonic()?;
        let wallet = derive_wallet(self.chain, &mnemonic, &self.config.passphrase)?;
        Ok(self.commit(mnemonic, wallet))
    }

    /// Use an existing mnemonic and derive its wallet
    pub fn load_mnemonic(&mut self, mnemonic: Mnemonic) -> Result<&Wallet> {
        let wallet = derive_wallet(self.chain, &mnemonic, &self.config.passphrase)?;
        Ok(self.commit(mnemonic, wallet))
    }

    /// Bumped by every reset
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Bumped by every committed wallet
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn draw_mnemonic(&mut self) -> Result<Mnemonic> {
        generate_mnemonic_with(&mut self.entropy, self.config.word_count)
    }

    /// Swap in a fully derived mnemonic and wallet
    pub(crate) fn commit(&mut self, mnemonic: Mnemonic, wallet: Wallet) -> &Wallet {
        info!(chain = %self.chain, public_key = %wallet.public_key, "session wallet replaced");
        self.mnemonic = Some(mnemonic);
        self.current_visible = false;
        self.generation += 1;
        self.current_wallet.insert(wallet)
    }

    /// Snapshot the current wallet into the saved list.
    ///
    /// Returns `None` when there is no current wallet. Duplicates are allowed.
    pub fn add_current_to_saved(&mut self) -> Option<WalletId> {
        let wallet = self.current_wallet.clone()?;
        let id = WalletId(self.next_id);
        self.next_id += 1;

        self.saved.push(SavedWallet {
            id,
            wallet,
            visible: false,
        });
        debug!(%id, saved = self.saved.len(), "saved current wallet");

        Some(id)
    }

    /// Remove the saved wallet at `index`
    pub fn delete_saved(&mut self, index: usize) -> Result<SavedWallet> {
        self.check_index(index)?;
        let removed = self.saved.remove(index);
        debug!(id = %removed.id, saved = self.saved.len(), "deleted saved wallet");
        Ok(removed)
    }

    /// Remove the saved wallet with `id`, if present
    pub fn delete_saved_by_id(&mut self, id: WalletId) -> Option<SavedWallet> {
        let index = self.position(id)?;
        self.delete_saved(index).ok()
    }

    /// Index of the saved wallet with `id`
    pub fn position(&self, id: WalletId) -> Option<usize> {
        self.saved.iter().position(|entry| entry.id == id)
    }

    /// Drop every saved wallet; the mnemonic and current wallet stay
    pub fn clear_saved(&mut self) {
        debug!(cleared = self.saved.len(), "cleared saved wallets");
        self.saved.clear();
    }

    /// Flip the private key visibility of the saved wallet at `index`
    pub fn toggle_visibility(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        let entry = &mut self.saved[index];
        entry.visible = !entry.visible;
        Ok(entry.visible)
    }

    pub fn toggle_current_visibility(&mut self) -> bool {
        self.current_visible = !self.current_visible;
        self.current_visible
    }

    /// Flip the "show all private keys" switch for saved wallets
    pub fn toggle_all_visibility(&mut self) -> bool {
        self.show_all = !self.show_all;
        self.show_all
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Whether the saved wallet at `index` should show its private key
    pub fn is_private_key_visible(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.show_all || self.saved[index].visible)
    }

    pub fn is_current_private_key_visible(&self) -> bool {
        self.current_visible
    }

    /// Return to the empty state, forgetting everything but chain and config
    pub fn reset(&mut self) {
        self.mnemonic = None;
        self.current_wallet = None;
        self.current_visible = false;
        self.saved.clear();
        self.show_all = false;
        self.epoch += 1;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.saved.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.saved.len(),
            });
        }
        Ok(())
    }
}

impl<E: EntropySource> fmt::Debug for Session<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("chain", &self.chain)
            .field("state", &self.state())
            .field("saved", &self.saved.len())
            .finish_non_exhaustive()
    }
}
