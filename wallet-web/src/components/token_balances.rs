//! Token balances card
//!
//! Balances of the fixed token list on the current chain. Fetching is driven
//! by the balances context; the card only renders and offers a manual refresh.

use leptos::prelude::*;
use lib_core::balances::{BalanceRecord, BalanceStatus};
use lib_core::WalletConfig;
use shared::{chain_by_id, is_supported_chain, TokenKey};

use crate::hooks::soft_refresh::{soft_refresh_class, use_soft_refresh};
use crate::state::{use_balances_context, use_wallet_context};
use crate::utils::format::{balance_label, last_updated_label, status_badge};

#[component]
pub fn TokenBalancesCard() -> impl IntoView {
    let wallet = use_wallet_context();
    let balances = use_balances_context();
    let config = expect_context::<WalletConfig>();

    let key = Memo::new(move |_| wallet.session.with(|s| (s.account.clone(), s.chain_id_dec)));
    let refreshing = use_soft_refresh(key, config.soft_refresh_ms);

    let body = move || {
        let (account, chain_id) = key.get();

        if account.is_none() {
            return view! { <p class="empty-state">"Connect your wallet to view token balances"</p> }.into_any();
        }
        if !is_supported_chain(chain_id) {
            return view! {
                <p class="empty-state">"Switch to a supported network to view token balances"</p>
            }
            .into_any();
        }

        let rows = TokenKey::ALL
            .iter()
            .map(|&token| {
                let record = move || balances.tokens.with(|s| s.balance(token).cloned().unwrap_or_default());
                view! { <TokenRow token=token chain_id=chain_id record=Signal::derive(record)/> }
            })
            .collect_view();

        view! {
            <div>
                {rows}
                {move || balances.tokens.with(last_updated_label).map(|label| view! { <p class="hint">{label}</p> })}
            </div>
        }
        .into_any()
    };

    view! {
        <div class="card">
            <div style="display: flex; justify-content: space-between; align-items: center;">
                <h2 class="card-title">"Token Balances"</h2>
                <button
                    class="btn btn-secondary"
                    disabled=move || balances.tokens.with(|s| s.loading) || !wallet.is_connected()
                    on:click=move |_| balances.refresh_tokens(true)
                >
                    {move || if balances.tokens.with(|s| s.loading) { "Refreshing..." } else { "Refresh" }}
                </button>
            </div>
            {move || balances.tokens.with(|s| s.error.clone()).map(|error| view! { <p class="error-text">{error}</p> })}
            <div class=move || soft_refresh_class(refreshing.get())>{body}</div>
        </div>
    }
}

#[component]
fn TokenRow(token: TokenKey, chain_id: Option<u64>, record: Signal<BalanceRecord>) -> impl IntoView {
    let explorer = move || {
        let address = record.with(|r| r.address.clone())?;
        chain_id.and_then(chain_by_id)?.explorer_address_url(&address)
    };

    view! {
        <div class="row token-row">
            <span class="token-symbol">{token.symbol()}</span>
            <span class=move || format!("badge badge-{}", status_badge(record.with(|r| r.status)).to_lowercase())>
                {move || status_badge(record.with(|r| r.status))}
            </span>
            <span class="token-value">{move || record.with(|r| balance_label(r, chain_id))}</span>
            {move || explorer().map(|url| view! {
                <a href=url target="_blank" rel="noopener noreferrer">"Contract"</a>
            })}
            {move || (record.with(|r| r.status) == BalanceStatus::Error).then(|| view! {
                <span class="hint">"Could not read balance"</span>
            })}
        </div>
    }
}
