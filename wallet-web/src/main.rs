//! EVM Wallet Dashboard
//!
//! Browser front end for the wallet core: connects to an injected EIP-1193
//! wallet, tracks account and chain changes, and shows ERC-20 balances.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

mod app;
mod components;
mod hooks;
mod pages;
mod services;
mod state;
mod utils;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // The core logs through `tracing`, whose `log` feature forwards here
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Wallet dashboard starting");

    hide_loading_screen();

    leptos::mount::mount_to_body(|| view! { <App/> });
}

/// Hide the static loading screen once WASM is running.
fn hide_loading_screen() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document available");
        return;
    };

    let Some(loading_element) = document.get_element_by_id("leptos-loading") else {
        log::debug!("Loading element not found");
        return;
    };

    if let Some(html_element) = loading_element.dyn_ref::<HtmlElement>() {
        if let Err(e) = html_element.class_list().add_1("hidden") {
            log::warn!("Failed to hide loading screen: {:?}", e);
        }
    }
    loading_element.set_attribute("style", "display: none !important;").ok();
}
