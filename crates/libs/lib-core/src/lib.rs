//! # Wallet Core Library
//!
//! The wallet connection and synchronization core of the dashboard, plus the
//! two balance fetch stores that share its stale-request guarding.
//!
//! Everything here is single-threaded and runtime-agnostic: futures are
//! driven by `wasm_bindgen_futures::spawn_local` in the browser and by a
//! current-thread Tokio runtime in tests. The injected wallet is reached only
//! through the [`provider::Eip1193Provider`] trait.
//!
//! ## Modules
//!
//! - **[`provider`]**: EIP-1193 provider trait and RPC error type
//! - **[`locator`]**: Finding the target wallet among injected providers
//! - **[`api`]**: State reader (non-interactive) and connector (interactive)
//! - **[`events`]**: Event bridge from provider notifications to [`events::WalletEvent`]s
//! - **[`sync`]**: Fallback synchronizer for missed notifications
//! - **[`session`]**: The wallet session store (state machine)
//! - **[`erc20`]**: ERC-20 balance reads over `eth_call`
//! - **[`balances`]**: Fixed-list and custom token balance stores
//! - **[`notify`]**: Advisory user notifications
//! - **[`observe`]**: Observable state cell shared by the stores
//! - **[`config`]**: Runtime configuration
//! - **[`error`]**: Error types
//!
//! ## Wiring
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use lib_core::{WalletConfig, WalletSessionStore};
//! use lib_core::locator::StaticLocator;
//! use lib_core::notify::NullNotifier;
//! use lib_core::sync::NoTriggers;
//!
//! # async fn run() {
//! let store = Rc::new(WalletSessionStore::new(
//!     WalletConfig::default(),
//!     Rc::new(StaticLocator::none()),
//!     Rc::new(NoTriggers),
//!     Rc::new(NullNotifier),
//! ));
//! store.start().await;
//! // spawn `store.event_loop()` on the host executor
//! # }
//! ```

pub mod api;
pub mod balances;
pub mod config;
pub mod erc20;
pub mod error;
pub mod events;
pub mod locator;
pub mod notify;
pub mod observe;
pub mod provider;
pub mod session;
pub mod sync;

#[cfg(test)]
pub(crate) mod mock;

// Re-export commonly used types
pub use config::WalletConfig;
pub use error::{Result, WalletError};
pub use provider::{Eip1193Provider, ProviderRpcError, SharedProvider};
pub use session::{Lifecycle, WalletSession, WalletSessionStore, WalletStatus};
