//! Balance contexts
//!
//! Wraps [`TokenBalancesStore`] and [`CustomTokenStore`] the same way the
//! wallet context wraps the session store. The fixed token list is re-fetched
//! automatically whenever the account, the chain or the session generation
//! changes; the custom token is only checked on request.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use lib_core::balances::{CustomTokenState, CustomTokenStore, TokenBalancesRequest, TokenBalancesState, TokenBalancesStore};
use lib_core::locator::ProviderLocator;
use lib_core::notify::Notifier;

use super::wallet::WalletContext;

#[derive(Clone, Copy)]
pub struct BalancesContext {
    pub tokens: RwSignal<TokenBalancesState>,
    pub custom: RwSignal<CustomTokenState>,
    wallet: WalletContext,
    token_store: StoredValue<Rc<TokenBalancesStore>, LocalStorage>,
    custom_store: StoredValue<Rc<CustomTokenStore>, LocalStorage>,
}

impl BalancesContext {
    /// Fetch the fixed token list for the current session.
    pub fn refresh_tokens(&self, manual: bool) {
        let request = self.wallet.session.with_untracked(|s| TokenBalancesRequest {
            account: s.account.clone(),
            chain_id: s.chain_id_dec,
            session_generation: s.generation,
            manual,
        });
        let store = self.token_store.get_value();
        spawn_local(async move { store.fetch(request).await });
    }

    pub fn set_contract_address(&self, address: String) {
        self.custom_store.with_value(|store| store.set_contract_address(address));
    }

    pub fn check_custom(&self, manual: bool) {
        let account = self.wallet.session.with_untracked(|s| s.account.clone());
        let store = self.custom_store.get_value();
        spawn_local(async move { store.check_balance(account.as_deref(), manual).await });
    }

    pub fn clear_custom(&self) {
        self.custom_store.with_value(|store| store.reset());
    }
}

pub fn provide_balances_context(
    wallet: WalletContext,
    locator: Rc<dyn ProviderLocator>,
    notifier: Rc<dyn Notifier>,
) -> BalancesContext {
    let token_store = Rc::new(TokenBalancesStore::new(locator.clone(), notifier.clone()));
    let custom_store = Rc::new(CustomTokenStore::new(locator, notifier));

    let tokens = RwSignal::new(token_store.state());
    let custom = RwSignal::new(custom_store.state());
    let token_observer = token_store.subscribe(Rc::new(move |state: &TokenBalancesState| {
        tokens.set(state.clone());
    }));
    let custom_observer = custom_store.subscribe(Rc::new(move |state: &CustomTokenState| {
        custom.set(state.clone());
    }));

    let context = BalancesContext {
        tokens,
        custom,
        wallet,
        token_store: StoredValue::new_local(token_store),
        custom_store: StoredValue::new_local(custom_store),
    };
    provide_context(context);

    let fetch_key = Memo::new(move |_| {
        wallet
            .session
            .with(|s| (s.account.clone(), s.chain_id_dec, s.generation))
    });

    Effect::new(move |previous: Option<()>| {
        fetch_key.track();
        context.refresh_tokens(false);
        // A result for another account or chain is meaningless
        if previous.is_some() {
            context.clear_custom();
        }
    });

    on_cleanup(move || {
        context.token_store.try_with_value(|store| {
            store.unsubscribe(token_observer);
            store.reset();
        });
        context.custom_store.try_with_value(|store| {
            store.unsubscribe(custom_observer);
            store.reset();
        });
    });

    context
}

pub fn use_balances_context() -> BalancesContext {
    expect_context::<BalancesContext>()
}
