//! Custom token card
//!
//! Balance of an arbitrary ERC-20 contract. Only checked when the user asks,
//! by button or Enter key.

use leptos::prelude::*;

use crate::state::{use_balances_context, use_wallet_context};

#[component]
pub fn CustomTokenCard() -> impl IntoView {
    let wallet = use_wallet_context();
    let balances = use_balances_context();
    let custom = balances.custom;

    let has_account = move || wallet.session.with(|s| s.account.is_some());
    let loading = move || custom.with(|s| s.loading);
    let can_check = move || !loading() && custom.with(|s| !s.contract_address.trim().is_empty());
    let has_result = move || custom.with(|s| s.balance.is_some() || s.error.is_some());

    let on_input = move |ev: leptos::ev::Event| balances.set_contract_address(event_target_value(&ev));
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !loading() {
            balances.check_custom(true);
        }
    };

    let form = move || {
        view! {
            <div class="form-group">
                <label for="token-address">"Token Contract Address"</label>
                <div style="display: flex; gap: 8px;">
                    <input
                        id="token-address"
                        type="text"
                        placeholder="0x..."
                        prop:value=move || custom.with(|s| s.contract_address.clone())
                        on:input=on_input
                        on:keydown=on_keydown
                        disabled=loading
                    />
                    <button class="btn" disabled=move || !can_check() on:click=move |_| balances.check_custom(true)>
                        {move || if loading() { "Checking..." } else { "Check Balance" }}
                    </button>
                    <Show when=has_result>
                        <button class="btn btn-secondary" on:click=move |_| balances.clear_custom()>"Clear"</button>
                    </Show>
                </div>
                <p class="hint">"Enter a valid ERC-20 token contract address (0x...)"</p>
            </div>

            {move || custom.with(|s| s.error.clone()).map(|error| view! {
                <div class="error-box">
                    <span style="font-weight: 600;">"Error"</span>
                    <p>{error}</p>
                </div>
            })}

            {move || custom.with(|s| {
                if s.error.is_some() {
                    return None;
                }
                s.balance.clone().map(|balance| {
                    let decimals = s.decimals.map(|d| d.to_string()).unwrap_or_default();
                    view! {
                        <div class="result-box">
                            <h3>"Token Balance"</h3>
                            <p class="balance-value">{balance}</p>
                            <p class="hint">{format!("Decimals: {}", decimals)}</p>
                        </div>
                    }
                })
            })}
        }
    };

    view! {
        <div class="card">
            <h2 class="card-title">"Custom Token Balance"</h2>
            <p class="card-description">"Check ERC-20 token balance by contract address"</p>
            <Show
                when=has_account
                fallback=|| view! { <p class="empty-state">"Connect your wallet to check ERC-20 balances."</p> }
            >
                {form}
            </Show>
        </div>
    }
}
