//! A session shared between tasks with asynchronous regeneration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::session::{Session, SessionState};
use super::wallet::{SavedWallet, Wallet, WalletId};
use crate::crypto::entropy::{EntropySource, OsEntropy};
use crate::crypto::keys::derive_wallet;
use crate::error::{Error, Result};

/// A [`Session`] behind a lock whose regeneration runs off the async executor.
///
/// At most one regeneration runs at a time; a second call is rejected with
/// [`Error::RegenerationInProgress`] instead of queueing. Dropping a pending
/// regeneration commits nothing, and a wallet committed through
/// [`SharedSession::with_session`] in the meantime is never overwritten.
pub struct SharedSession<E: EntropySource = OsEntropy> {
    inner: Arc<Mutex<Session<E>>>,
    in_flight: Arc<AtomicBool>,
}

impl<E: EntropySource> Clone for SharedSession<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<E: EntropySource + Send + 'static> SharedSession<E> {
    pub fn new(session: Session<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Generate a new mnemonic and derive its wallet on the blocking pool
    pub async fn regenerate(&self) -> Result<Wallet> {
        let _guard = InFlight::acquire(&self.in_flight)?;

        let (mnemonic, chain, passphrase, epoch, generation) = {
            let mut session = self.lock();
            let mnemonic = session.draw_mnemonic()?;
            (
                mnemonic,
                session.chain(),
                session.config().passphrase.clone(),
                session.epoch(),
                session.generation(),
            )
        };

        let task_mnemonic = mnemonic.clone();
        let wallet = tokio::task::spawn_blocking(move || derive_wallet(chain, &task_mnemonic, &passphrase))
            .await
            .map_err(|e| Error::TaskFailed(e.to_string()))??;

        let mut session = self.lock();
        if session.epoch() != epoch {
            warn!(%chain, "session reset during regeneration, discarding wallet");
            return Err(Error::SessionReset);
        }
        if session.generation() != generation {
            warn!(%chain, "newer wallet committed during regeneration, discarding wallet");
            return Err(Error::Superseded);
        }
        Ok(session.commit(mnemonic, wallet).clone())
    }

    pub fn is_regenerating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `f` with exclusive access to the session
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session<E>) -> R) -> R {
        f(&mut *self.lock())
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    pub fn current_wallet(&self) -> Option<Wallet> {
        self.lock().current_wallet().cloned()
    }

    pub fn saved_wallets(&self) -> Vec<SavedWallet> {
        self.lock().saved_wallets().to_vec()
    }

    pub fn visibility(&self) -> Vec<bool> {
        self.lock().visibility()
    }

    pub fn add_current_to_saved(&self) -> Option<WalletId> {
        self.lock().add_current_to_saved()
    }

    pub fn delete_saved(&self, index: usize) -> Result<SavedWallet> {
        self.lock().delete_saved(index)
    }

    pub fn clear_saved(&self) {
        self.lock().clear_saved()
    }

    pub fn toggle_visibility(&self, index: usize) -> Result<bool> {
        self.lock().toggle_visibility(index)
    }

    pub fn toggle_current_visibility(&self) -> bool {
        self.lock().toggle_current_visibility()
    }

    pub fn toggle_all_visibility(&self) -> bool {
        self.lock().toggle_all_visibility()
    }

    pub fn reset(&self) {
        self.lock().reset()
    }

    fn lock(&self) -> MutexGuard<'_, Session<E>> {
        // Session updates are all-or-nothing, so a poisoned lock still guards a consistent session.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the in-flight flag for the lifetime of one regeneration
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::RegenerationInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
        debug!("regeneration slot released");
    }
}

#[cfg(test)]
mod tests {
    use std::future::{poll_fn, Future};
    use std::task::Poll;

    use super::*;
    use crate::crypto::keys::Chain;

    #[tokio::test]
    async fn test_regenerate_commits_wallet() {
        let shared = SharedSession::new(Session::new(Chain::Ethereum));
        let wallet = shared.regenerate().await.unwrap();

        assert_eq!(shared.state(), SessionState::Ready);
        assert_eq!(shared.current_wallet(), Some(wallet));
        assert!(!shared.is_regenerating());
    }

    #[tokio::test]
    async fn test_concurrent_regenerate_is_rejected() {
        let shared = SharedSession::new(Session::new(Chain::Solana));
        let (a, b) = tokio::join!(shared.regenerate(), shared.regenerate());

        assert!(a.is_ok());
        assert_eq!(b.unwrap_err(), Error::RegenerationInProgress);
        assert_eq!(shared.current_wallet(), a.ok());
    }

    #[tokio::test]
    async fn test_dropped_regenerate_commits_nothing() {
        let shared = SharedSession::new(Session::new(Chain::Solana));

        let mut pending = Box::pin(shared.regenerate());
        let first = poll_fn(|cx| Poll::Ready(pending.as_mut().poll(cx))).await;
        assert!(first.is_pending());
        assert!(shared.is_regenerating());

        drop(pending);
        assert!(!shared.is_regenerating());
        assert_eq!(shared.state(), SessionState::Empty);

        shared.regenerate().await.unwrap();
        assert_eq!(shared.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_reset_during_regenerate_discards_result() {
        let shared = SharedSession::new(Session::new(Chain::Ethereum));

        let mut pending = Box::pin(shared.regenerate());
        let first = poll_fn(|cx| Poll::Ready(pending.as_mut().poll(cx))).await;
        assert!(first.is_pending());

        shared.reset();
        assert_eq!(pending.await.unwrap_err(), Error::SessionReset);
        assert_eq!(shared.state(), SessionState::Empty);
    }

    #[tokio::test]
    async fn test_wallet_committed_during_regenerate_is_kept() {
        let shared = SharedSession::new(Session::new(Chain::Solana));

        let mut pending = Box::pin(shared.regenerate());
        let first = poll_fn(|cx| Poll::Ready(pending.as_mut().poll(cx))).await;
        assert!(first.is_pending());

        let newer = shared.with_session(|session| session.regenerate().cloned()).unwrap();
        assert_eq!(pending.await.unwrap_err(), Error::Superseded);
        assert_eq!(shared.current_wallet(), Some(newer));
        assert!(!shared.is_regenerating());
    }

    #[tokio::test]
    async fn test_delegated_store_operations() {
        let shared = SharedSession::new(Session::new(Chain::Solana));
        assert_eq!(shared.add_current_to_saved(), None);

        shared.regenerate().await.unwrap();
        shared.add_current_to_saved().unwrap();
        shared.add_current_to_saved().unwrap();
        assert!(shared.toggle_visibility(1).unwrap());
        assert_eq!(shared.visibility(), vec![false, true]);

        shared.delete_saved(0).unwrap();
        assert_eq!(shared.visibility(), vec![true]);
        assert!(shared.toggle_all_visibility());
        assert!(shared.toggle_current_visibility());

        shared.clear_saved();
        assert!(shared.saved_wallets().is_empty());
        assert!(shared.with_session(|session| session.show_all()));
    }
}
