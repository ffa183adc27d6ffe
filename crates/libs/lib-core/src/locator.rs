//! # Provider Locator
//!
//! Several wallets may inject themselves into the page. The injected root
//! object can carry a `providers` list; the target wallet is the first entry
//! with the configured identity flag set (`isMetaMask` by default). When there
//! is no list, the root itself is used if it carries the flag.
//!
//! The scan is repeated on every call and never cached, so a wallet injected
//! after page load is picked up by the next caller.

use crate::provider::SharedProvider;

/// Source of the target wallet provider.
pub trait ProviderLocator {
    /// The target provider, or `None` when it is not installed.
    fn locate(&self) -> Option<SharedProvider>;
}

/// Snapshot of what the host environment has injected.
#[derive(Default, Clone)]
pub struct InjectedProviders {
    /// The root injected object (`window.ethereum`)
    pub root: Option<SharedProvider>,
    /// Entries of `window.ethereum.providers`, when present
    pub nested: Vec<SharedProvider>,
}

/// Pick the target provider out of the injected set.
///
/// Nested providers win over the root: the first nested entry carrying
/// `target_flag` is returned. Otherwise the root is returned if it carries the
/// flag. Anything else yields `None`.
pub fn select_provider(injected: &InjectedProviders, target_flag: &str) -> Option<SharedProvider> {
    if let Some(provider) = injected.nested.iter().find(|p| p.has_flag(target_flag)) {
        return Some(provider.clone());
    }

    injected
        .root
        .as_ref()
        .filter(|root| root.has_flag(target_flag))
        .cloned()
}

/// Locator returning a fixed provider. Used by hosts without injection and by tests.
#[derive(Default, Clone)]
pub struct StaticLocator {
    provider: Option<SharedProvider>,
}

impl StaticLocator {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Locator for an environment with no wallet.
    pub fn none() -> Self {
        Self::default()
    }
}

impl ProviderLocator for StaticLocator {
    fn locate(&self) -> Option<SharedProvider> {
        self.provider.clone()
    }
}
