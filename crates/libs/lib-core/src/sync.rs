//! # Fallback Synchronizer
//!
//! Wallets occasionally miss `accountsChanged`/`chainChanged` (a locked
//! extension, a tab left in the background). The synchronizer re-reads the
//! wallet state whenever the host signals a good moment, window focus or the
//! page becoming visible, and reports a difference.
//!
//! Triggers come from a [`SyncTriggerSource`]; the browser source lives in
//! `wallet-web`. [`setup_fallback_sync`] turns each trigger into a
//! [`WalletEvent::SyncRequested`] so the comparison runs on the store's loop.

use std::rc::Rc;

use async_channel::Sender;

use crate::api::{read_wallet_state, WalletReadResult};
use crate::events::{send_event, Teardown, WalletEvent};
use crate::provider::SharedProvider;

/// Host signals that should trigger a re-read.
pub trait SyncTriggerSource {
    /// Call `on_trigger` on every signal until the returned teardown runs.
    fn attach(&self, on_trigger: Rc<dyn Fn()>) -> Teardown;
}

/// Trigger source that never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTriggers;

impl SyncTriggerSource for NoTriggers {
    fn attach(&self, _on_trigger: Rc<dyn Fn()>) -> Teardown {
        Teardown::noop()
    }
}

/// Chain and account list the synchronizer compares against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub chain_id_hex: Option<String>,
    pub accounts: Vec<String>,
}

impl SyncSnapshot {
    /// Chain hex differs, or the account list differs (order-sensitive).
    pub fn differs_from(&self, read: &WalletReadResult) -> bool {
        self.chain_id_hex.as_deref() != Some(read.chain_id_hex.as_str()) || self.accounts != read.accounts
    }
}

/// Re-read and compare against a snapshot taken once at setup.
pub struct FallbackSync {
    provider: SharedProvider,
    snapshot: SyncSnapshot,
}

impl FallbackSync {
    pub fn new(provider: SharedProvider, snapshot: SyncSnapshot) -> Self {
        Self { provider, snapshot }
    }

    /// One state read. Returns the result only if it differs from the snapshot.
    ///
    /// Read failures are logged and reported as "no change".
    pub async fn check(&self) -> Option<WalletReadResult> {
        match read_wallet_state(self.provider.as_ref()).await {
            Ok(read) if self.snapshot.differs_from(&read) => Some(read),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Fallback wallet sync failed");
                None
            }
        }
    }
}

/// Attach `triggers` so that each signal queues a [`WalletEvent::SyncRequested`].
pub fn setup_fallback_sync(triggers: &dyn SyncTriggerSource, tx: Sender<WalletEvent>) -> Teardown {
    triggers.attach(Rc::new(move || send_event(&tx, WalletEvent::SyncRequested)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ManualTriggers, MockProvider, ALICE, BOB};

    fn snapshot(chain: &str, accounts: &[&str]) -> SyncSnapshot {
        SyncSnapshot {
            chain_id_hex: Some(chain.to_string()),
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_check_reports_only_differences() {
        let mock = Rc::new(MockProvider::new());
        mock.set_chain("0x1");
        mock.set_accounts(&[ALICE]);
        let sync = FallbackSync::new(mock.clone(), snapshot("0x1", &[ALICE]));

        assert!(sync.check().await.is_none());

        mock.set_accounts(&[BOB, ALICE]);
        let read = sync.check().await.expect("account change detected");
        assert_eq!(read.account.as_deref(), Some(BOB));

        // Same members, different order, still a difference
        let reordered = FallbackSync::new(mock.clone(), snapshot("0x1", &[ALICE, BOB]));
        assert!(reordered.check().await.is_some());
    }

    #[tokio::test]
    async fn test_check_swallows_read_errors() {
        let mock = Rc::new(MockProvider::new());
        mock.fail_reads("boom");
        let sync = FallbackSync::new(mock, SyncSnapshot::default());
        assert!(sync.check().await.is_none());
    }

    #[test]
    fn test_triggers_queue_sync_requests() {
        let triggers = ManualTriggers::default();
        let (tx, rx) = async_channel::bounded(4);

        let teardown = setup_fallback_sync(&triggers, tx);
        triggers.fire();
        assert_eq!(rx.try_recv(), Ok(WalletEvent::SyncRequested));

        teardown.run();
        assert_eq!(triggers.attached(), 0);
        triggers.fire();
        assert!(rx.try_recv().is_err());
    }
}
