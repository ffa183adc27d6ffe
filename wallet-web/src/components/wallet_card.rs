//! Wallet state card
//!
//! One card, five states: not installed, disconnected, connecting, connected
//! and error. The connected state carries a collapsible developer section
//! with the raw session fields.

use leptos::prelude::*;
use lib_core::{WalletSession, WalletStatus};
use shared::utils::short_address;
use shared::chain_by_id;

use crate::state::{use_wallet_context, WalletContext};
use crate::utils::format::{is_unsupported_network, network_label, wallet_status_label};

const INSTALL_URL: &str = "https://metamask.io/";

#[component]
pub fn WalletCard() -> impl IntoView {
    let wallet = use_wallet_context();

    move || {
        let session = wallet.session.get();
        if !session.installed {
            return not_installed().into_any();
        }

        match session.status {
            WalletStatus::Idle => disconnected(wallet).into_any(),
            WalletStatus::Connecting => connecting().into_any(),
            WalletStatus::Connected => connected(session).into_any(),
            WalletStatus::Error => failed(wallet, session.last_error.unwrap_or_default()).into_any(),
        }
    }
}

fn not_installed() -> impl IntoView {
    view! {
        <div class="card">
            <h2 class="card-title">{wallet_status_label(false, WalletStatus::Idle)}</h2>
            <p class="card-description">"Install MetaMask to connect your wallet."</p>
            <a class="btn" href=INSTALL_URL target="_blank" rel="noopener noreferrer">
                "Install MetaMask"
            </a>
            <p class="hint">"Opens the official MetaMask site."</p>
        </div>
    }
}

fn disconnected(wallet: WalletContext) -> impl IntoView {
    view! {
        <div class="card">
            <h2 class="card-title">{wallet_status_label(true, WalletStatus::Idle)}</h2>
            <p class="card-description">"Connect your MetaMask wallet to get started"</p>
            <p>
                "Click the button below to connect your MetaMask wallet. "
                "You'll be prompted to approve the connection."
            </p>
            <button class="btn" on:click=move |_| wallet.connect()>"Connect Wallet"</button>
        </div>
    }
}

fn connecting() -> impl IntoView {
    view! {
        <div class="card">
            <h2 class="card-title">{wallet_status_label(true, WalletStatus::Connecting)}</h2>
            <p class="card-description">"Please approve the connection in MetaMask"</p>
            <p>"Waiting for you to approve the connection request in your MetaMask extension."</p>
        </div>
    }
}

fn connected(session: WalletSession) -> impl IntoView {
    let explorer = session
        .chain_id_dec
        .and_then(chain_by_id)
        .zip(session.account.as_deref())
        .and_then(|(chain, account)| chain.explorer_address_url(account));

    view! {
        <div class="card">
            <h2 class="card-title">{wallet_status_label(true, WalletStatus::Connected)}</h2>
            <p class="card-description nav-address">{short_address(session.account.as_deref())}</p>
            {session.chain_id_dec.map(|_| view! {
                <div class="row">
                    <span class="label">"Network"</span>
                    <span>{network_label(session.chain_id_dec)}</span>
                </div>
            })}
            {is_unsupported_network(session.chain_id_dec).then(|| view! {
                <p class="banner banner-warning">
                    "Please switch to a supported network: Ethereum, BNB Chain or Base."
                </p>
            })}
            {explorer.map(|url| view! {
                <a href=url target="_blank" rel="noopener noreferrer">"View on explorer"</a>
            })}
            <DeveloperDetails session=session.clone()/>
        </div>
    }
}

fn failed(wallet: WalletContext, error: String) -> impl IntoView {
    view! {
        <div class="card">
            <h2 class="card-title">{wallet_status_label(true, WalletStatus::Error)}</h2>
            <p class="card-description">"Something went wrong"</p>
            <p class="error-text">{error}</p>
            <div style="display: flex; gap: 12px;">
                <button class="btn" on:click=move |_| wallet.connect()>"Retry Connection"</button>
                <button class="btn btn-secondary" on:click=move |_| wallet.clear_error()>"Dismiss"</button>
            </div>
        </div>
    }
}

#[component]
fn DeveloperDetails(session: WalletSession) -> impl IntoView {
    let na = || "N/A".to_string();

    view! {
        <details class="developer-details">
            <summary>"Developer Details"</summary>
            <div class="row">
                <span class="label">"Chain ID (Hex):"</span>
                <span>{session.chain_id_hex.clone().unwrap_or_else(na)}</span>
            </div>
            <div class="row">
                <span class="label">"Chain ID (Dec):"</span>
                <span>{session.chain_id_dec.map(|id| id.to_string()).unwrap_or_else(na)}</span>
            </div>
            <div class="row">
                <span class="label">"Account:"</span>
                <span style="word-break: break-all;">{session.account.clone().unwrap_or_else(na)}</span>
            </div>
            <div class="row">
                <span class="label">"Generation:"</span>
                <span>{session.generation}</span>
            </div>
            <div class="row">
                <span class="label">"Last Error:"</span>
                <span>{session.last_error.clone().unwrap_or_else(na)}</span>
            </div>
        </details>
    }
}
