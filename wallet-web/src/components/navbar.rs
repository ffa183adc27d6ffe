//! Navigation Bar Component

use leptos::prelude::*;
use leptos_router::components::A;
use shared::utils::short_address;

use crate::state::use_wallet_context;

#[component]
pub fn Navbar() -> impl IntoView {
    let wallet = use_wallet_context();

    let wallet_menu = move || {
        let session = wallet.session.get();
        if session.is_connected() {
            view! {
                <div style="display: flex; align-items: center; gap: 12px;">
                    <span class="nav-address">{short_address(session.account.as_deref())}</span>
                    <button class="btn btn-secondary" on:click=move |_| wallet.disconnect_local()>
                        "Disconnect"
                    </button>
                </div>
            }
            .into_any()
        } else if session.installed {
            view! {
                <button class="btn" on:click=move |_| wallet.connect()>
                    "Connect Wallet"
                </button>
            }
            .into_any()
        } else {
            ().into_any()
        }
    };

    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <A href="/" attr:class="nav-link-clean">
                    <span class="nav-title">"Wallet Dashboard"</span>
                </A>
                {wallet_menu}
            </div>
        </nav>
    }
}
