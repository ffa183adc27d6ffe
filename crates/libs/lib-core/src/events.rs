//! # Event Bridge
//!
//! Forwards the provider's `accountsChanged` and `chainChanged` notifications
//! into the session store. Provider callbacks never touch store state
//! directly: [`WalletEventHandlers::forward_to`] turns them into
//! [`WalletEvent`]s on a bounded channel that the store drains on its own loop.
//!
//! Every attach returns a [`Teardown`] that unsubscribes exactly what it
//! subscribed and drops the handlers, senders included.

use std::cell::RefCell;
use std::rc::Rc;

use async_channel::{Sender, TrySendError};
use serde_json::Value;

use crate::api::decode_accounts;
use crate::provider::{Eip1193Provider, ProviderEvent};

/// Message consumed by the session store's update loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// New account list, possibly empty
    AccountsChanged(Vec<String>),
    /// New chain id, hex
    ChainChanged(String),
    /// Focus/visibility trigger fired, re-read and compare
    SyncRequested,
}

/// Callbacks invoked with decoded notification payloads.
#[derive(Clone)]
pub struct WalletEventHandlers {
    pub on_accounts_changed: Rc<dyn Fn(Vec<String>)>,
    pub on_chain_changed: Rc<dyn Fn(String)>,
}

impl WalletEventHandlers {
    /// Handlers that push [`WalletEvent`]s onto `tx`.
    ///
    /// When the channel is full the event is dropped with a warning; the
    /// fallback synchronizer recovers the state on the next trigger.
    pub fn forward_to(tx: Sender<WalletEvent>) -> Self {
        let accounts_tx = tx.clone();
        Self {
            on_accounts_changed: Rc::new(move |accounts| send_event(&accounts_tx, WalletEvent::AccountsChanged(accounts))),
            on_chain_changed: Rc::new(move |chain_id| send_event(&tx, WalletEvent::ChainChanged(chain_id))),
        }
    }
}

pub(crate) fn send_event(tx: &Sender<WalletEvent>, event: WalletEvent) {
    match tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!(?event, "Wallet event channel full - dropping event");
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!("Wallet event channel closed");
        }
    }
}

/// A set of cleanup actions, run at most once.
#[derive(Default)]
pub struct Teardown {
    actions: Vec<Box<dyn FnOnce()>>,
}

impl Teardown {
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            actions: vec![Box::new(action)],
        }
    }

    /// Teardown that does nothing.
    pub fn noop() -> Self {
        Self::default()
    }

    /// Combine two teardowns; `self` runs first.
    pub fn and(mut self, other: Teardown) -> Self {
        self.actions.extend(other.actions);
        self
    }

    pub fn run(self) {
        for action in self.actions {
            action();
        }
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown").field("actions", &self.actions.len()).finish()
    }
}

/// Subscribe `handlers` to the provider's account and chain notifications.
///
/// Payloads that do not decode are logged and dropped. The teardown releases
/// `handlers` even when the provider cannot remove listeners, so a forwarding
/// channel closes once its other senders are gone. The stale listeners stay
/// registered with the wallet but no longer reach anything.
pub fn attach_wallet_listeners(provider: &Rc<dyn Eip1193Provider>, handlers: WalletEventHandlers) -> Teardown {
    let slot = Rc::new(RefCell::new(Some(handlers)));

    let accounts_slot = slot.clone();
    let accounts_id = provider.on(
        ProviderEvent::AccountsChanged,
        Rc::new(move |payload: Value| {
            let Some(on_accounts) = current(&accounts_slot, |h| h.on_accounts_changed.clone()) else {
                return;
            };
            match decode_accounts(&payload) {
                Ok(accounts) => on_accounts(accounts),
                Err(e) => tracing::warn!(error = %e, "Ignoring malformed accountsChanged payload"),
            }
        }),
    );

    let chain_slot = slot.clone();
    let chain_id = provider.on(
        ProviderEvent::ChainChanged,
        Rc::new(move |payload: Value| {
            let Some(on_chain) = current(&chain_slot, |h| h.on_chain_changed.clone()) else {
                return;
            };
            match payload.as_str() {
                Some(hex) => on_chain(hex.to_string()),
                None => tracing::warn!(%payload, "Ignoring malformed chainChanged payload"),
            }
        }),
    );

    tracing::debug!("Wallet listeners attached");

    let release = Teardown::new(move || {
        slot.borrow_mut().take();
    });

    if !provider.supports_remove_listener() {
        tracing::debug!("Provider has no removeListener - only releasing handlers on teardown");
        return release;
    }

    let provider = provider.clone();
    Teardown::new(move || {
        provider.remove_listener(ProviderEvent::AccountsChanged, accounts_id);
        provider.remove_listener(ProviderEvent::ChainChanged, chain_id);
        tracing::debug!("Wallet listeners removed");
    })
    .and(release)
}

/// Clone one handler out of `slot`, or `None` once torn down.
///
/// The borrow ends before the handler runs.
fn current<F: ?Sized>(
    slot: &RefCell<Option<WalletEventHandlers>>,
    pick: impl FnOnce(&WalletEventHandlers) -> Rc<F>,
) -> Option<Rc<F>> {
    let handler = slot.borrow().as_ref().map(pick);
    if handler.is_none() {
        tracing::debug!("Wallet notification after teardown - ignored");
    }
    handler
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::mock::{MockProvider, ALICE};

    fn recording_handlers() -> (WalletEventHandlers, Rc<RefCell<Vec<WalletEvent>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let accounts_seen = seen.clone();
        let chain_seen = seen.clone();
        let handlers = WalletEventHandlers {
            on_accounts_changed: Rc::new(move |a| accounts_seen.borrow_mut().push(WalletEvent::AccountsChanged(a))),
            on_chain_changed: Rc::new(move |c| chain_seen.borrow_mut().push(WalletEvent::ChainChanged(c))),
        };
        (handlers, seen)
    }

    #[test]
    fn test_forwards_in_order_and_tears_down() {
        let mock = Rc::new(MockProvider::new());
        let provider: Rc<dyn Eip1193Provider> = mock.clone();
        let (handlers, seen) = recording_handlers();

        let teardown = attach_wallet_listeners(&provider, handlers);
        assert_eq!(mock.listener_count(ProviderEvent::AccountsChanged), 1);
        assert_eq!(mock.listener_count(ProviderEvent::ChainChanged), 1);

        mock.emit(ProviderEvent::ChainChanged, json!("0x89"));
        mock.emit(ProviderEvent::AccountsChanged, json!([ALICE]));
        mock.emit(ProviderEvent::AccountsChanged, json!("garbage"));

        assert_eq!(
            *seen.borrow(),
            vec![
                WalletEvent::ChainChanged("0x89".into()),
                WalletEvent::AccountsChanged(vec![ALICE.to_string()]),
            ]
        );

        teardown.run();
        assert_eq!(mock.remove_count(ProviderEvent::AccountsChanged), 1);
        assert_eq!(mock.remove_count(ProviderEvent::ChainChanged), 1);
        assert_eq!(mock.listener_count(ProviderEvent::AccountsChanged), 0);
    }

    #[test]
    fn test_provider_without_remove_listener() {
        let mock = Rc::new(MockProvider::new());
        mock.disable_remove_listener();
        let provider: Rc<dyn Eip1193Provider> = mock.clone();
        let (handlers, seen) = recording_handlers();

        attach_wallet_listeners(&provider, handlers).run();
        assert_eq!(mock.remove_count(ProviderEvent::AccountsChanged), 0);
        assert_eq!(mock.listener_count(ProviderEvent::ChainChanged), 1);

        mock.emit(ProviderEvent::ChainChanged, json!("0x89"));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_teardown_closes_channel_without_remove_listener() {
        let mock = Rc::new(MockProvider::new());
        mock.disable_remove_listener();
        let provider: Rc<dyn Eip1193Provider> = mock.clone();
        let (tx, rx) = async_channel::bounded(4);

        let teardown = attach_wallet_listeners(&provider, WalletEventHandlers::forward_to(tx));
        mock.emit(ProviderEvent::ChainChanged, json!("0x89"));
        assert_eq!(rx.try_recv(), Ok(WalletEvent::ChainChanged("0x89".into())));
        assert!(!rx.is_closed());

        teardown.run();
        assert!(rx.is_closed());
        mock.emit(ProviderEvent::AccountsChanged, json!([ALICE]));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_channel_drops_event() {
        let (tx, rx) = async_channel::bounded(1);
        let handlers = WalletEventHandlers::forward_to(tx);
        (handlers.on_chain_changed)("0x1".into());
        (handlers.on_chain_changed)("0x89".into());
        assert_eq!(rx.try_recv(), Ok(WalletEvent::ChainChanged("0x1".into())));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_teardown_runs_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (order.clone(), order.clone());
        Teardown::new(move || a.borrow_mut().push(1))
            .and(Teardown::new(move || b.borrow_mut().push(2)))
            .and(Teardown::noop())
            .run();
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}
