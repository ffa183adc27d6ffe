//! Wallet state management
//!
//! The session store lives outside the reactive graph (it is `Rc`-based and
//! not `Send`), so the context keeps it in a local `StoredValue` and mirrors
//! every published snapshot into an `RwSignal` that views read.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use lib_core::locator::ProviderLocator;
use lib_core::notify::Notifier;
use lib_core::{WalletConfig, WalletSession, WalletSessionStore};

use crate::services::BrowserSyncTriggers;

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub session: RwSignal<WalletSession>,
    store: StoredValue<Rc<WalletSessionStore>, LocalStorage>,
}

impl WalletContext {
    fn store(&self) -> Rc<WalletSessionStore> {
        self.store.get_value()
    }

    pub fn is_connected(&self) -> bool {
        self.session.with(|s| s.is_connected())
    }

    pub fn account(&self) -> Option<String> {
        self.session.with(|s| s.account.clone())
    }

    pub fn connect(&self) {
        let store = self.store();
        spawn_local(async move { store.connect().await });
    }

    /// Re-read chain and accounts without prompting.
    pub fn sync(&self) {
        let store = self.store();
        spawn_local(async move { store.sync().await });
    }

    pub fn disconnect_local(&self) {
        self.store().disconnect_local();
    }

    pub fn clear_error(&self) {
        self.store().clear_error();
    }
}

/// Create the session store, start it and provide the context.
///
/// The store is stopped when the owning component is cleaned up.
pub fn provide_wallet_context(
    config: &WalletConfig,
    locator: Rc<dyn ProviderLocator>,
    notifier: Rc<dyn Notifier>,
) -> WalletContext {
    let store = Rc::new(WalletSessionStore::new(
        config.clone(),
        locator,
        Rc::new(BrowserSyncTriggers),
        notifier,
    ));

    let session = RwSignal::new(store.session());
    let observer = store.subscribe(Rc::new(move |snapshot: &WalletSession| {
        session.set(snapshot.clone());
    }));

    let context = WalletContext {
        session,
        store: StoredValue::new_local(store.clone()),
    };
    provide_context(context);

    spawn_local(store.event_loop());
    spawn_local(async move {
        store.start().await;
        log::info!("Wallet session started");
    });

    on_cleanup(move || {
        context.store.try_with_value(|store| {
            store.unsubscribe(observer);
            store.stop();
        });
    });

    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}
