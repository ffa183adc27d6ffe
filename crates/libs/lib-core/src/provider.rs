//! # EIP-1193 Provider Abstraction
//!
//! The wallet core never touches `window.ethereum` directly. It talks to a
//! [`Eip1193Provider`]: `request` plus `on`/`removeListener`, exactly the
//! surface an injected wallet exposes. The browser implementation lives in
//! `wallet-web`; tests use an in-memory mock.
//!
//! Providers are shared as [`SharedProvider`] (`Rc<dyn Eip1193Provider>`)
//! because everything runs on one thread.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// JSON-RPC method names used by the core.
pub mod methods {
    /// Current chain id, hex string. Non-interactive.
    pub const ETH_CHAIN_ID: &str = "eth_chainId";
    /// Already-authorized accounts. Non-interactive.
    pub const ETH_ACCOUNTS: &str = "eth_accounts";
    /// Request account access. May open the wallet prompt.
    pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    /// Read-only contract call.
    pub const ETH_CALL: &str = "eth_call";
}

/// Error returned by a provider `request`, per EIP-1193 (`{ code, message }`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

impl ProviderRpcError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// Generic JSON-RPC internal error.
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error for a JS value that was not a `{ code, message }` object.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }

    /// Code 4001, or a message that says the user rejected the request.
    pub fn is_user_rejection(&self) -> bool {
        self.code == Self::USER_REJECTED || self.message.to_lowercase().contains("user rejected")
    }
}

/// Provider notifications the core subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    /// Payload: array of address strings (possibly empty)
    AccountsChanged,
    /// Payload: hex chain id string
    ChainChanged,
}

impl ProviderEvent {
    /// Event name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEvent::AccountsChanged => "accountsChanged",
            ProviderEvent::ChainChanged => "chainChanged",
        }
    }
}

/// Listener registered with [`Eip1193Provider::on`]. Receives the raw payload.
pub type Listener = Rc<dyn Fn(Value)>;

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The injected wallet interface.
#[async_trait(?Send)]
pub trait Eip1193Provider {
    /// `provider.request({ method, params })`.
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ProviderRpcError>;

    /// `provider.on(event, listener)`.
    fn on(&self, event: ProviderEvent, listener: Listener) -> ListenerId;

    /// `provider.removeListener(event, listener)`. Only called when
    /// [`supports_remove_listener`](Self::supports_remove_listener) is `true`.
    fn remove_listener(&self, event: ProviderEvent, id: ListenerId);

    /// Some injected objects have no `removeListener`.
    fn supports_remove_listener(&self) -> bool {
        true
    }

    /// Boolean identity marker such as `isMetaMask`.
    fn has_flag(&self, flag: &str) -> bool;
}

/// Shared, single-threaded provider handle.
pub type SharedProvider = Rc<dyn Eip1193Provider>;
