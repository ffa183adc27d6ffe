//! Browser bindings for the wallet core

pub mod provider;
pub mod triggers;

pub use provider::{BrowserLocator, BrowserProvider};
pub use triggers::BrowserSyncTriggers;
