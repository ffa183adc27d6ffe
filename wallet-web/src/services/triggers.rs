//! Fallback sync triggers from the browser
//!
//! Fires when the window regains focus and when the document becomes visible
//! again, the two moments a wallet change made in another tab or in the
//! extension popup is most likely to have been missed.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::VisibilityState;

use lib_core::events::Teardown;
use lib_core::sync::SyncTriggerSource;

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSyncTriggers;

impl SyncTriggerSource for BrowserSyncTriggers {
    fn attach(&self, on_trigger: Rc<dyn Fn()>) -> Teardown {
        let Some(window) = web_sys::window() else {
            return Teardown::noop();
        };
        let Some(document) = window.document() else {
            return Teardown::noop();
        };

        let on_focus = {
            let on_trigger = on_trigger.clone();
            Closure::<dyn Fn()>::new(move || on_trigger())
        };

        let on_visibility = {
            let document = document.clone();
            Closure::<dyn Fn()>::new(move || {
                if document.visibility_state() == VisibilityState::Visible {
                    on_trigger();
                }
            })
        };

        if let Err(e) = window.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref()) {
            log::warn!("Failed to watch window focus: {:?}", e);
        }
        if let Err(e) =
            document.add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref())
        {
            log::warn!("Failed to watch document visibility: {:?}", e);
        }

        Teardown::new(move || {
            let _ = window.remove_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
            let _ = document
                .remove_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref());
            log::debug!("Fallback sync triggers detached");
        })
    }
}
