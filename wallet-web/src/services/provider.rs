//! Injected EIP-1193 Provider via wasm-bindgen
//!
//! Wraps the JavaScript object a wallet extension injects as `window.ethereum`
//! (or one entry of `window.ethereum.providers`) in [`BrowserProvider`], which
//! implements the core's [`Eip1193Provider`] trait.
//!
//! Calls go through `js_sys::Reflect` rather than typed bindings because
//! wallets differ in which members they expose.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use lib_core::locator::{select_provider, InjectedProviders, ProviderLocator};
use lib_core::provider::{Eip1193Provider, Listener, ListenerId, ProviderEvent, ProviderRpcError};
use lib_core::SharedProvider;

/// An injected provider object.
pub struct BrowserProvider {
    inner: JsValue,
    listeners: RefCell<HashMap<ListenerId, Closure<dyn Fn(JsValue)>>>,
    next_id: Cell<u64>,
}

impl BrowserProvider {
    pub fn new(inner: JsValue) -> Self {
        Self {
            inner,
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.inner, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    }

    fn build_args(method: &str, params: Option<Value>) -> Result<Object, ProviderRpcError> {
        let args = Object::new();
        Reflect::set(&args, &"method".into(), &JsValue::from_str(method)).map_err(js_error)?;

        if let Some(params) = params {
            // Plain objects, not JS Maps: wallets only understand JSON shapes
            let serializer = serde_wasm_bindgen::Serializer::json_compatible();
            let js_params = params
                .serialize(&serializer)
                .map_err(|e| ProviderRpcError::internal(format!("Failed to encode params: {}", e)))?;
            Reflect::set(&args, &"params".into(), &js_params).map_err(js_error)?;
        }

        Ok(args)
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for BrowserProvider {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ProviderRpcError> {
        let request = self
            .method("request")
            .ok_or_else(|| ProviderRpcError::internal("Provider has no request() method"))?;
        let args = Self::build_args(method, params)?;

        let promise = request
            .call1(&self.inner, &args)
            .map_err(js_error)?
            .dyn_into::<Promise>()
            .map_err(|_| ProviderRpcError::internal("request() did not return a Promise"))?;

        let result = JsFuture::from(promise).await.map_err(js_error)?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }

        serde_wasm_bindgen::from_value(result)
            .map_err(|e| ProviderRpcError::internal(format!("Failed to decode {} response: {}", method, e)))
    }

    fn on(&self, event: ProviderEvent, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let closure = Closure::<dyn Fn(JsValue)>::new(move |payload: JsValue| {
            let value = serde_wasm_bindgen::from_value(payload).unwrap_or(Value::Null);
            listener(value);
        });

        match self.method("on") {
            Some(on) => {
                if let Err(e) = on.call2(&self.inner, &JsValue::from_str(event.as_str()), closure.as_ref()) {
                    log::warn!("Failed to subscribe to {}: {:?}", event.as_str(), e);
                }
            }
            None => log::warn!("Provider has no on() method; {} will not be observed", event.as_str()),
        }

        self.listeners.borrow_mut().insert(id, closure);
        id
    }

    fn remove_listener(&self, event: ProviderEvent, id: ListenerId) {
        let Some(closure) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };

        if let Some(remove) = self.method("removeListener") {
            if let Err(e) = remove.call2(&self.inner, &JsValue::from_str(event.as_str()), closure.as_ref()) {
                log::warn!("Failed to unsubscribe from {}: {:?}", event.as_str(), e);
            }
        }
    }

    fn supports_remove_listener(&self) -> bool {
        self.method("removeListener").is_some()
    }

    fn has_flag(&self, flag: &str) -> bool {
        Reflect::get(&self.inner, &JsValue::from_str(flag))
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}

/// Convert a rejected promise value into a [`ProviderRpcError`].
fn js_error(err: JsValue) -> ProviderRpcError {
    let code = Reflect::get(&err, &"code".into())
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64)
        .unwrap_or(ProviderRpcError::INTERNAL);

    let message = Reflect::get(&err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    ProviderRpcError::new(code, message)
}

/// Finds the target wallet in `window.ethereum` on every call.
#[derive(Clone)]
pub struct BrowserLocator {
    target_flag: String,
}

impl BrowserLocator {
    pub fn new(target_flag: impl Into<String>) -> Self {
        Self {
            target_flag: target_flag.into(),
        }
    }

    fn injected(&self) -> InjectedProviders {
        let Some(window) = web_sys::window() else {
            return InjectedProviders::default();
        };

        let root = Reflect::get(&window, &"ethereum".into())
            .ok()
            .filter(|value| value.is_object());
        let Some(root) = root else {
            return InjectedProviders::default();
        };

        let nested = Reflect::get(&root, &"providers".into())
            .ok()
            .filter(Array::is_array)
            .map(|list| {
                Array::from(&list)
                    .iter()
                    .filter(|entry| entry.is_object())
                    .map(|entry| Rc::new(BrowserProvider::new(entry)) as SharedProvider)
                    .collect()
            })
            .unwrap_or_default();

        InjectedProviders {
            root: Some(Rc::new(BrowserProvider::new(root)) as SharedProvider),
            nested,
        }
    }
}

impl ProviderLocator for BrowserLocator {
    fn locate(&self) -> Option<SharedProvider> {
        select_provider(&self.injected(), &self.target_flag)
    }
}
