//! Network card and unsupported-network banner

use leptos::prelude::*;
use shared::chain_by_id;

use crate::state::use_wallet_context;
use crate::utils::format::{is_unsupported_network, network_label};

#[component]
pub fn UnsupportedNetworkBanner(chain_id: u64) -> impl IntoView {
    view! {
        <div class="banner banner-warning">
            <p style="font-weight: 600;">
                {format!("Current network (Chain ID: {}) is not supported.", chain_id)}
            </p>
            <p>
                "Please switch to: " <strong>"Ethereum"</strong> " (Mainnet/Sepolia), "
                <strong>"BNB Chain"</strong> " (Mainnet/Testnet), or "
                <strong>"Base"</strong> " (Mainnet/Sepolia)."
            </p>
        </div>
    }
}

#[component]
pub fn NetworkInfo() -> impl IntoView {
    let wallet = use_wallet_context();

    move || {
        let (chain_id, chain_id_hex) = wallet.session.with(|s| (s.chain_id_dec, s.chain_id_hex.clone()));
        let Some(id) = chain_id else {
            return ().into_any();
        };

        let native = chain_by_id(id).map(|chain| chain.native_currency.symbol);

        view! {
            <div class="card">
                <h2 class="card-title">"Network"</h2>
                <div class="row">
                    <span class="label">"Network"</span>
                    <span>{network_label(chain_id)}</span>
                </div>
                <div class="row">
                    <span class="label">"Chain ID"</span>
                    <span>{format!("{} ({})", id, chain_id_hex.unwrap_or_default())}</span>
                </div>
                {native.map(|symbol| view! {
                    <div class="row">
                        <span class="label">"Native currency"</span>
                        <span>{symbol}</span>
                    </div>
                })}
                {is_unsupported_network(chain_id).then(|| view! { <UnsupportedNetworkBanner chain_id=id/> })}
            </div>
        }
        .into_any()
    }
}
