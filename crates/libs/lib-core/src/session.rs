//! # Wallet Session Store
//!
//! The single source of truth for the wallet connection. One
//! [`WalletSessionStore`] is constructed by the host and shared (`Rc`) with
//! every consumer; observers are notified after each change.
//!
//! ## States
//!
//! ```text
//!            connect()                 success
//!   Idle ─────────────▶ Connecting ─────────────▶ Connected
//!    ▲                    │   │                      │
//!    │     rejected       │   │ failure              │ accountsChanged([])
//!    └────────────────────┘   ▼                      │ disconnect_local()
//!    ▲                      Error                    │
//!    └───────────────────────────────────────────────┘
//! ```
//!
//! `status == Connected` exactly when an account is present, in every state
//! the store can reach.
//!
//! ## Generation
//!
//! `generation` is bumped on every change of account, chain or connection
//! status (connect, account switch, chain switch, disconnect, sync). Consumers
//! use it to detect changes and to key dependent fetches. It never decreases.
//!
//! ## Lifecycle
//!
//! [`start`](WalletSessionStore::start) locates the wallet, reads its state
//! and attaches the event bridge and fallback synchronizer.
//! [`stop`](WalletSessionStore::stop) tears both down. Provider notifications
//! and sync triggers arrive as [`WalletEvent`]s on a bounded channel, drained
//! by [`event_loop`](WalletSessionStore::event_loop), so every mutation runs on
//! the store's own update path.

use std::future::Future;
use std::rc::Rc;

use async_channel::{Receiver, Sender};
use parking_lot::Mutex;
use serde::Serialize;

use shared::utils::{parse_chain_id, short_address};

use crate::api::{connect_wallet, read_wallet_state, WalletReadResult};
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::events::{attach_wallet_listeners, Teardown, WalletEvent, WalletEventHandlers};
use crate::locator::ProviderLocator;
use crate::notify::{ids, Notification, Notifier};
use crate::observe::{Observable, Observer, ObserverId};
use crate::sync::{setup_fallback_sync, FallbackSync, SyncSnapshot, SyncTriggerSource};

/// Message stored when the user declines the connection prompt.
pub const REJECTED_MESSAGE: &str = "Connection request was rejected by user";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    Error,
}

impl WalletStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletStatus::Idle => "idle",
            WalletStatus::Connecting => "connecting",
            WalletStatus::Connected => "connected",
            WalletStatus::Error => "error",
        }
    }
}

/// Whether the store's listeners are live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Stopped,
    Starting,
    Running,
}

/// Snapshot of the wallet connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    /// A provider carrying the target flag was found
    pub installed: bool,
    pub status: WalletStatus,
    /// First entry of `accounts`
    pub account: Option<String>,
    pub accounts: Vec<String>,
    pub chain_id_hex: Option<String>,
    pub chain_id_dec: Option<u64>,
    pub last_error: Option<String>,
    pub generation: u64,
    pub listeners_attached: bool,
    pub lifecycle: Lifecycle,
}

impl WalletSession {
    /// Connection status and account agree, and chain fields are set together.
    pub fn is_coherent(&self) -> bool {
        (self.status == WalletStatus::Connected) == self.account.is_some()
            && self.account.as_ref() == self.accounts.first()
            && self.chain_id_hex.is_some() == self.chain_id_dec.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.status == WalletStatus::Connected
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    /// Copy chain and accounts from a read; status follows the account.
    fn apply_read(&mut self, read: &WalletReadResult) {
        self.account = read.account.clone();
        self.accounts = read.accounts.clone();
        self.chain_id_hex = Some(read.chain_id_hex.clone());
        self.chain_id_dec = Some(read.chain_id_dec);
        self.status = if self.account.is_some() {
            WalletStatus::Connected
        } else {
            WalletStatus::Idle
        };
        self.last_error = None;
    }

    /// Record a failure. An already connected account stays connected.
    fn settle_failure(&mut self, status: WalletStatus, message: impl Into<String>) {
        self.status = if self.account.is_some() {
            WalletStatus::Connected
        } else {
            status
        };
        self.last_error = Some(message.into());
    }

    fn clear_connection(&mut self) {
        self.status = WalletStatus::Idle;
        self.account = None;
        self.accounts.clear();
        self.last_error = None;
    }

    fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            chain_id_hex: self.chain_id_hex.clone(),
            accounts: self.accounts.clone(),
        }
    }
}

#[derive(Default)]
struct Runtime {
    teardown: Option<Teardown>,
    fallback: Option<Rc<FallbackSync>>,
}

/// The wallet session state machine.
pub struct WalletSessionStore {
    locator: Rc<dyn ProviderLocator>,
    triggers: Rc<dyn SyncTriggerSource>,
    notifier: Rc<dyn Notifier>,
    state: Observable<WalletSession>,
    runtime: Mutex<Runtime>,
    tx: Sender<WalletEvent>,
    rx: Receiver<WalletEvent>,
}

impl WalletSessionStore {
    pub fn new(
        config: WalletConfig,
        locator: Rc<dyn ProviderLocator>,
        triggers: Rc<dyn SyncTriggerSource>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let (tx, rx) = async_channel::bounded(config.event_buffer.max(1));
        Self {
            locator,
            triggers,
            notifier,
            state: Observable::new(WalletSession::default()),
            runtime: Mutex::new(Runtime::default()),
            tx,
            rx,
        }
    }

    /// Current session snapshot.
    pub fn session(&self) -> WalletSession {
        self.state.get()
    }

    pub fn generation(&self) -> u64 {
        self.state.with(|s| s.generation)
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.with(|s| s.lifecycle)
    }

    /// Register an observer, called after every change.
    pub fn subscribe(&self, observer: Observer<WalletSession>) -> ObserverId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.state.unsubscribe(id);
    }

    /// The single mutation path.
    fn update<R>(&self, f: impl FnOnce(&mut WalletSession) -> R) -> R {
        self.state.update(|s| {
            let result = f(s);
            debug_assert!(s.is_coherent(), "incoherent wallet session: {:?}", s);
            result
        })
    }

    // region:    --- Lifecycle

    /// Locate the wallet, read its state and attach listeners.
    ///
    /// A no-op while already starting or running, so repeated calls never
    /// create duplicate subscriptions.
    pub async fn start(&self) {
        let provider = self.locator.locate();
        let installed = provider.is_some();
        self.update(|s| s.installed = installed);

        let Some(provider) = provider else {
            tracing::info!("No wallet provider found");
            return;
        };

        let claimed = self.update(|s| {
            if s.lifecycle != Lifecycle::Stopped {
                return false;
            }
            s.lifecycle = Lifecycle::Starting;
            true
        });
        if !claimed {
            tracing::debug!("Wallet store already started");
            return;
        }

        let stale = self.runtime.lock().teardown.take();
        if let Some(teardown) = stale {
            teardown.run();
        }

        let read = read_wallet_state(provider.as_ref()).await;
        if self.lifecycle() != Lifecycle::Starting {
            tracing::debug!("Wallet store stopped during start");
            return;
        }

        match read {
            Ok(read) => {
                self.update(|s| {
                    let before = (s.account.clone(), s.chain_id_hex.clone());
                    s.apply_read(&read);
                    if before != (s.account.clone(), s.chain_id_hex.clone()) {
                        s.bump();
                    }
                });
                tracing::info!(
                    account = ?read.account,
                    chain_id = read.chain_id_dec,
                    "Wallet state loaded"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read wallet state");
                self.update(|s| s.settle_failure(WalletStatus::Error, e.to_string()));
            }
        }

        let snapshot = self.state.with(WalletSession::snapshot);
        let listeners = attach_wallet_listeners(&provider, WalletEventHandlers::forward_to(self.tx.clone()));
        let triggers = setup_fallback_sync(self.triggers.as_ref(), self.tx.clone());

        {
            let mut runtime = self.runtime.lock();
            runtime.teardown = Some(listeners.and(triggers));
            runtime.fallback = Some(Rc::new(FallbackSync::new(provider, snapshot)));
        }

        self.update(|s| {
            s.listeners_attached = true;
            s.lifecycle = Lifecycle::Running;
        });
        tracing::debug!(generation = self.generation(), "Wallet store running");
    }

    /// Detach listeners and sync triggers. Idempotent.
    pub fn stop(&self) {
        let teardown = {
            let mut runtime = self.runtime.lock();
            runtime.fallback = None;
            runtime.teardown.take()
        };
        if let Some(teardown) = teardown {
            teardown.run();
        }

        self.update(|s| {
            s.listeners_attached = false;
            s.lifecycle = Lifecycle::Stopped;
        });

        // Anything still queued belongs to the detached listeners
        while self.rx.try_recv().is_ok() {}
    }

    // endregion: --- Lifecycle

    // region:    --- Actions

    /// Ask the wallet for account access.
    ///
    /// Also valid while connected: the wallet may hand back a different
    /// account set, which is applied like a fresh connection. The status only
    /// moves to `Connecting` when no account is held.
    pub async fn connect(&self) {
        let Some(provider) = self.locator.locate() else {
            self.update(|s| s.settle_failure(WalletStatus::Error, WalletError::NotInstalled.to_string()));
            return;
        };

        let proceed = self.update(|s| {
            if s.status == WalletStatus::Connecting {
                return false;
            }
            if s.account.is_none() {
                s.status = WalletStatus::Connecting;
            }
            s.last_error = None;
            true
        });
        if !proceed {
            tracing::debug!("Connect ignored - a request is already pending");
            return;
        }

        match connect_wallet(provider.as_ref()).await {
            Ok(read) => {
                let generation = self.update(|s| {
                    s.apply_read(&read);
                    s.bump();
                    s.generation
                });
                tracing::info!(account = ?read.account, chain_id = read.chain_id_dec, generation, "Wallet connected");
                self.notifier.notify(Notification::success("Wallet connected successfully"));
            }
            Err(WalletError::Rejected) => {
                tracing::info!("Wallet connection rejected by user");
                self.update(|s| s.settle_failure(WalletStatus::Idle, REJECTED_MESSAGE));
                self.notifier.notify(Notification::warning("Connection request was rejected"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Wallet connection failed");
                self.update(|s| s.settle_failure(WalletStatus::Error, e.to_string()));
                self.notifier.notify(Notification::error("Failed to connect wallet"));
            }
        }
    }

    /// Re-read the wallet and apply any difference from the current session.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn sync(&self) {
        let Some(provider) = self.locator.locate() else {
            return;
        };

        match read_wallet_state(provider.as_ref()).await {
            Ok(read) => {
                let applied = self.update(|s| {
                    if !s.snapshot().differs_from(&read) {
                        return false;
                    }
                    s.apply_read(&read);
                    s.bump();
                    true
                });
                if applied {
                    tracing::info!(generation = self.generation(), "Wallet state re-synced");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Wallet sync failed"),
        }
    }

    /// Forget the connection locally. The wallet itself keeps its authorization.
    pub fn disconnect_local(&self) {
        self.update(|s| {
            s.clear_connection();
            s.chain_id_hex = None;
            s.chain_id_dec = None;
            s.bump();
        });
        self.notifier.notify(Notification::info("Disconnected from app"));
    }

    pub fn clear_error(&self) {
        self.update(|s| s.last_error = None);
    }

    // endregion: --- Actions

    // region:    --- Events

    /// Drive the store from its event channel until the store is dropped.
    ///
    /// Spawn the returned future on the host executor.
    pub fn event_loop(self: &Rc<Self>) -> impl Future<Output = ()> + 'static {
        let store = Rc::downgrade(self);
        let rx = self.rx.clone();
        async move {
            while let Ok(event) = rx.recv().await {
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.handle_event(event).await;
            }
            tracing::debug!("Wallet event loop finished");
        }
    }

    /// Handle every event currently queued, in order.
    pub async fn process_pending(&self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event).await;
        }
    }

    pub async fn handle_event(&self, event: WalletEvent) {
        if self.lifecycle() != Lifecycle::Running {
            tracing::debug!(?event, "Ignoring wallet event while not running");
            return;
        }

        match event {
            WalletEvent::AccountsChanged(accounts) => self.apply_accounts_changed(accounts),
            WalletEvent::ChainChanged(chain_id_hex) => self.apply_chain_changed(&chain_id_hex),
            WalletEvent::SyncRequested => self.run_fallback_sync().await,
        }
    }

    fn apply_accounts_changed(&self, accounts: Vec<String>) {
        let notification = self.update(|s| match accounts.first() {
            Some(next) if s.account.as_deref() == Some(next.as_str()) => None,
            Some(next) => {
                let message = format!("Switched account: {}", short_address(Some(next)));
                s.account = Some(next.clone());
                s.accounts = accounts.clone();
                s.status = WalletStatus::Connected;
                s.last_error = None;
                s.bump();
                Some(Notification::info(message).with_id(ids::ACCOUNT_CHANGED))
            }
            None => {
                s.clear_connection();
                s.bump();
                Some(Notification::warning("Wallet disconnected").with_id(ids::WALLET_DISCONNECTED))
            }
        });

        match notification {
            Some(notification) => {
                tracing::info!(account = ?accounts.first(), generation = self.generation(), "Accounts changed");
                self.notifier.notify(notification);
            }
            None => tracing::debug!("accountsChanged with unchanged account"),
        }
    }

    fn apply_chain_changed(&self, chain_id_hex: &str) {
        let Some(chain_id_dec) = parse_chain_id(chain_id_hex) else {
            tracing::warn!(chain_id = chain_id_hex, "Ignoring invalid chain id");
            return;
        };

        let generation = self.update(|s| {
            s.chain_id_hex = Some(chain_id_hex.to_string());
            s.chain_id_dec = Some(chain_id_dec);
            s.bump();
            s.generation
        });
        tracing::info!(chain_id = chain_id_dec, generation, "Chain changed");
    }

    async fn run_fallback_sync(&self) {
        let fallback = self.runtime.lock().fallback.clone();
        let Some(fallback) = fallback else {
            return;
        };

        let Some(read) = fallback.check().await else {
            return;
        };

        // Stopped while the read was in flight
        if self.lifecycle() != Lifecycle::Running {
            return;
        }

        // The snapshot is from setup; only a difference from the live session counts
        let generation = self.update(|s| {
            if !s.snapshot().differs_from(&read) {
                return None;
            }
            s.apply_read(&read);
            s.bump();
            Some(s.generation)
        });
        if let Some(generation) = generation {
            tracing::info!(chain_id = read.chain_id_dec, generation, "Fallback sync applied wallet change");
        }
    }

    // endregion: --- Events
}

impl Drop for WalletSessionStore {
    fn drop(&mut self) {
        if let Some(teardown) = self.runtime.get_mut().teardown.take() {
            teardown.run();
        }
    }
}
