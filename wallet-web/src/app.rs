//! Wallet Dashboard - Leptos Frontend
//!
//! Wires the wallet core to the browser: the injected provider locator, the
//! toast notifier and the three stores, then mounts the dashboard.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes, A},
    path,
};

use lib_core::locator::ProviderLocator;
use lib_core::notify::Notifier;
use lib_core::WalletConfig;

use crate::components::{Navbar, ToastStack};
use crate::pages::DashboardPage;
use crate::services::BrowserLocator;
use crate::state::{provide_balances_context, provide_toast_context, provide_wallet_context, ToastNotifier};

#[component]
pub fn App() -> impl IntoView {
    let config = WalletConfig::load();
    log::info!("Looking for injected provider flagged {}", config.target_flag);
    provide_context(config.clone());

    let locator: Rc<dyn ProviderLocator> = Rc::new(BrowserLocator::new(config.target_flag.clone()));
    let notifier: Rc<dyn Notifier> = Rc::new(ToastNotifier::new(provide_toast_context()));

    let wallet = provide_wallet_context(&config, locator.clone(), notifier.clone());
    provide_balances_context(wallet, locator, notifier);

    view! {
        <Router>
            <div class="app-container">
                <Navbar/>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=DashboardPage/>
                </Routes>
                <ToastStack/>
            </div>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="margin-bottom: 16px; font-size: 32px; font-weight: 700;">"404 - Page Not Found"</h1>
                <p style="margin-bottom: 24px;">"The page you're looking for doesn't exist."</p>
                <A href="/">
                    <span class="btn" style="margin-top: 20px; display: inline-block;">
                        "Go to Dashboard"
                    </span>
                </A>
            </div>
        </div>
    }
}
