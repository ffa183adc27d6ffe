//! # Token Balances Store
//!
//! Balances of the configured tokens for the connected account on the current
//! chain. The dashboard re-fetches whenever the account, chain or session
//! generation changes, and on manual refresh.
//!
//! Tokens without a contract on the current chain are reported as
//! [`BalanceStatus::Na`](super::BalanceStatus::Na) without a network call.

use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;

use lib_utils::now_utc;
use shared::dto::tokens::{token_config, TokenKey};

use super::BalanceRecord;
use crate::erc20::{Erc20Reader, ProviderErc20Reader};
use crate::error::WalletError;
use crate::locator::ProviderLocator;
use crate::notify::{Notification, Notifier};
use crate::observe::{Observable, Observer, ObserverId};

/// Inputs of one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBalancesRequest {
    pub account: Option<String>,
    pub chain_id: Option<u64>,
    /// Session generation the request was issued for
    pub session_generation: u64,
    /// User-initiated refresh; only these notify
    pub manual: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesState {
    pub balances: BTreeMap<TokenKey, BalanceRecord>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub fetch_generation: u64,
    /// Session generation of the committed balances
    pub session_generation: Option<u64>,
}

impl Default for TokenBalancesState {
    fn default() -> Self {
        Self {
            balances: initial_balances(),
            loading: false,
            last_updated: None,
            error: None,
            fetch_generation: 0,
            session_generation: None,
        }
    }
}

impl TokenBalancesState {
    pub fn balance(&self, key: TokenKey) -> Option<&BalanceRecord> {
        self.balances.get(&key)
    }
}

fn initial_balances() -> BTreeMap<TokenKey, BalanceRecord> {
    TokenKey::ALL.iter().map(|&key| (key, BalanceRecord::default())).collect()
}

pub struct TokenBalancesStore {
    locator: Rc<dyn ProviderLocator>,
    notifier: Rc<dyn Notifier>,
    state: Observable<TokenBalancesState>,
}

impl TokenBalancesStore {
    pub fn new(locator: Rc<dyn ProviderLocator>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            locator,
            notifier,
            state: Observable::new(TokenBalancesState::default()),
        }
    }

    pub fn state(&self) -> TokenBalancesState {
        self.state.get()
    }

    pub fn subscribe(&self, observer: Observer<TokenBalancesState>) -> ObserverId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.state.unsubscribe(id);
    }

    fn fetch_generation(&self) -> u64 {
        self.state.with(|s| s.fetch_generation)
    }

    /// Clear all balances. In-flight fetches are invalidated.
    pub fn reset(&self) {
        self.state.update(|s| {
            let fetch_generation = s.fetch_generation + 1;
            *s = TokenBalancesState {
                fetch_generation,
                ..TokenBalancesState::default()
            };
        });
    }

    /// Fetch every configured token for `request.account` on `request.chain_id`.
    pub async fn fetch(&self, request: TokenBalancesRequest) {
        let my_gen = self.state.update(|s| {
            s.fetch_generation += 1;
            s.loading = true;
            s.error = None;
            s.fetch_generation
        });

        let (Some(account), Some(chain_id)) = (request.account.as_deref(), request.chain_id) else {
            self.state.update(|s| {
                s.balances = initial_balances();
                s.loading = false;
                s.last_updated = None;
                s.session_generation = None;
            });
            return;
        };

        let Some(provider) = self.locator.locate() else {
            let message = WalletError::NotInstalled.to_string();
            self.state.update(|s| {
                s.loading = false;
                s.error = Some(message.clone());
            });
            if request.manual {
                self.notifier.notify(Notification::error(message));
            }
            return;
        };

        let reader = ProviderErc20Reader::new(provider);
        self.fetch_with(&reader, account, chain_id, &request, my_gen).await;
    }

    async fn fetch_with(
        &self,
        reader: &dyn Erc20Reader,
        account: &str,
        chain_id: u64,
        request: &TokenBalancesRequest,
        my_gen: u64,
    ) {
        let reads = TokenKey::ALL.iter().map(|&key| async move {
            let Some(config) = token_config(chain_id, key) else {
                return Some((key, BalanceRecord::not_issued()));
            };

            let result = reader.balance_of(config.address, account).await;
            if self.fetch_generation() != my_gen {
                tracing::debug!(token = %key, my_gen, "Dropping stale balance read");
                return None;
            }

            let record = match result {
                Ok(balance) => BalanceRecord::ok(config.address, balance.formatted, balance.decimals),
                Err(e) => {
                    tracing::warn!(token = %key, chain_id, error = %e, "Failed to read token balance");
                    BalanceRecord::failed(config.address)
                }
            };
            Some((key, record))
        });

        let results = join_all(reads).await;

        let committed = self.state.update(|s| {
            if s.fetch_generation != my_gen {
                return false;
            }
            let mut balances = initial_balances();
            balances.extend(results.into_iter().flatten());
            s.balances = balances;
            s.loading = false;
            s.last_updated = Some(now_utc());
            s.error = None;
            s.session_generation = Some(request.session_generation);
            true
        });

        if !committed {
            tracing::debug!(my_gen, "Discarding stale token balances");
            return;
        }

        tracing::info!(chain_id, generation = request.session_generation, "Token balances updated");
        if request.manual {
            self.notifier.notify(Notification::success("Balances updated"));
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;
    use crate::balances::BalanceStatus;
    use crate::locator::StaticLocator;
    use crate::mock::{MockProvider, RecordingNotifier, ALICE, BOB, BSC_TESTNET_USDC, BSC_TESTNET_USDT, USDC_MAINNET};

    fn store(mock: &Rc<MockProvider>) -> (TokenBalancesStore, Rc<RecordingNotifier>) {
        let notifier = Rc::new(RecordingNotifier::default());
        let store = TokenBalancesStore::new(Rc::new(StaticLocator::new(mock.clone())), notifier.clone());
        (store, notifier)
    }

    fn request(account: &str, chain_id: u64, manual: bool) -> TokenBalancesRequest {
        TokenBalancesRequest {
            account: Some(account.to_string()),
            chain_id: Some(chain_id),
            session_generation: 1,
            manual,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_token_is_na_without_call() {
        let mock = Rc::new(MockProvider::new());
        mock.set_token(USDC_MAINNET, U256::from(1_500_000u64), 6);
        let (store, notifier) = store(&mock);

        store.fetch(request(ALICE, 1, false)).await;

        let state = store.state();
        let usdc = state.balance(TokenKey::Usdc).unwrap();
        assert_eq!(usdc.status, BalanceStatus::Ok);
        assert_eq!(usdc.value.as_deref(), Some("1.5"));
        assert_eq!(usdc.decimals, Some(6));

        let usdt = state.balance(TokenKey::Usdt).unwrap();
        assert_eq!(usdt.status, BalanceStatus::Na);
        assert_eq!(usdt.address, None);

        // balanceOf + decimals for USDC only
        assert_eq!(mock.count_calls("eth_call"), 2);
        assert!(!state.loading);
        assert!(state.last_updated.is_some());
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_failed_read_keeps_address() {
        let mock = Rc::new(MockProvider::new());
        mock.set_token(BSC_TESTNET_USDC, U256::from(10u64).pow(U256::from(18u64)), 18);
        mock.fail_token(BSC_TESTNET_USDT, "execution reverted");
        let (store, _) = store(&mock);

        store.fetch(request(ALICE, 97, false)).await;

        let state = store.state();
        assert_eq!(state.balance(TokenKey::Usdc).unwrap().value.as_deref(), Some("1"));

        let usdt = state.balance(TokenKey::Usdt).unwrap();
        assert_eq!(usdt.status, BalanceStatus::Error);
        assert_eq!(usdt.address.as_deref(), Some(BSC_TESTNET_USDT));
        assert_eq!(usdt.value, None);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_missing_account_resets_without_calls() {
        let mock = Rc::new(MockProvider::new());
        mock.set_token(USDC_MAINNET, U256::from(1u64), 6);
        let (store, _) = store(&mock);
        store.fetch(request(ALICE, 1, false)).await;

        store
            .fetch(TokenBalancesRequest {
                account: None,
                chain_id: Some(1),
                ..TokenBalancesRequest::default()
            })
            .await;

        let state = store.state();
        assert_eq!(state.balance(TokenKey::Usdc), Some(&BalanceRecord::default()));
        assert_eq!(state.last_updated, None);
        assert!(!state.loading);
        assert_eq!(mock.count_calls("eth_call"), 2);
    }

    #[tokio::test]
    async fn test_manual_refresh_notifies() {
        let mock = Rc::new(MockProvider::new());
        mock.set_token(USDC_MAINNET, U256::from(1u64), 6);
        let (store, notifier) = store(&mock);

        store.fetch(request(ALICE, 1, true)).await;

        assert_eq!(notifier.last(), Some(Notification::success("Balances updated")));
    }

    #[tokio::test]
    async fn test_no_wallet_sets_error() {
        let store = TokenBalancesStore::new(Rc::new(StaticLocator::none()), Rc::new(RecordingNotifier::default()));
        store.fetch(request(ALICE, 1, false)).await;

        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("Wallet not installed"));
        assert!(!state.loading);
    }

    async fn race(release_first: &str, release_second: &str) -> TokenBalancesState {
        let mock = Rc::new(MockProvider::new());
        mock.set_token(USDC_MAINNET, U256::ZERO, 6);
        mock.set_balance(USDC_MAINNET, ALICE, U256::from(1_000_000u64));
        mock.set_balance(USDC_MAINNET, BOB, U256::from(2_000_000u64));
        mock.gate_owner(ALICE);
        mock.gate_owner(BOB);
        let (store, _) = store(&mock);

        let driver = async {
            mock.release_owner(release_first);
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            mock.release_owner(release_second);
        };

        futures::join!(
            store.fetch(request(ALICE, 1, false)),
            store.fetch(request(BOB, 1, false)),
            driver,
        );
        store.state()
    }

    #[tokio::test]
    async fn test_latest_fetch_wins_when_it_finishes_last() {
        let state = race(ALICE, BOB).await;
        assert_eq!(state.balance(TokenKey::Usdc).unwrap().value.as_deref(), Some("2"));
        assert_eq!(state.fetch_generation, 2);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_latest_fetch_wins_when_it_finishes_first() {
        let state = race(BOB, ALICE).await;
        assert_eq!(state.balance(TokenKey::Usdc).unwrap().value.as_deref(), Some("2"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_reset_invalidates_in_flight() {
        let mock = Rc::new(MockProvider::new());
        mock.set_token(USDC_MAINNET, U256::from(1_000_000u64), 6);
        mock.gate_owner(ALICE);
        let (store, _) = store(&mock);

        futures::join!(store.fetch(request(ALICE, 1, false)), async {
            store.reset();
            mock.release_owner(ALICE);
        });

        let state = store.state();
        assert_eq!(state.balance(TokenKey::Usdc), Some(&BalanceRecord::default()));
        assert_eq!(state.last_updated, None);
    }
}
