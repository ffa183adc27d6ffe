//! # Custom Token Store
//!
//! Balance of one user-supplied ERC-20 contract for the connected account.
//! The address is validated locally before any network call. A contract with
//! no `balanceOf`/`decimals` is reported as an error, never as N/A.

use std::rc::Rc;

use serde::Serialize;

use shared::utils::is_valid_evm_address;

use super::classify_balance_error;
use crate::erc20::{Erc20Reader, ProviderErc20Reader};
use crate::error::WalletError;
use crate::locator::ProviderLocator;
use crate::notify::{Notification, Notifier};
use crate::observe::{Observable, Observer, ObserverId};

pub const ZERO_BALANCE_MESSAGE: &str = "Token balance is 0 (wallet has not received tokens from this contract)";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTokenState {
    /// Contract address as typed by the user
    pub contract_address: String,
    pub loading: bool,
    /// Formatted balance
    pub balance: Option<String>,
    pub decimals: Option<u8>,
    pub error: Option<String>,
    pub fetch_generation: u64,
}

pub struct CustomTokenStore {
    locator: Rc<dyn ProviderLocator>,
    notifier: Rc<dyn Notifier>,
    state: Observable<CustomTokenState>,
}

impl CustomTokenStore {
    pub fn new(locator: Rc<dyn ProviderLocator>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            locator,
            notifier,
            state: Observable::new(CustomTokenState::default()),
        }
    }

    pub fn state(&self) -> CustomTokenState {
        self.state.get()
    }

    pub fn subscribe(&self, observer: Observer<CustomTokenState>) -> ObserverId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.state.unsubscribe(id);
    }

    pub fn set_contract_address(&self, address: impl Into<String>) {
        let address = address.into();
        self.state.update(|s| {
            s.contract_address = address;
            s.error = None;
        });
    }

    /// Clear the address and result. In-flight checks are invalidated.
    pub fn reset(&self) {
        self.state.update(|s| {
            *s = CustomTokenState {
                fetch_generation: s.fetch_generation + 1,
                ..CustomTokenState::default()
            };
        });
    }

    /// Read the balance of the current contract address for `account`.
    ///
    /// `manual` marks a button press; only those notify.
    pub async fn check_balance(&self, account: Option<&str>, manual: bool) {
        let (my_gen, address) = self.state.update(|s| {
            s.fetch_generation += 1;
            s.loading = true;
            s.error = None;
            s.balance = None;
            s.decimals = None;
            (s.fetch_generation, s.contract_address.trim().to_string())
        });

        if let Err(e) = validate_contract_address(&address) {
            self.fail(my_gen, e.to_string(), manual);
            return;
        }

        let Some(account) = account else {
            self.fail(my_gen, "Connect your wallet to check token balances".to_string(), manual);
            return;
        };

        let Some(provider) = self.locator.locate() else {
            self.fail(my_gen, WalletError::NotInstalled.to_string(), manual);
            return;
        };

        let reader = ProviderErc20Reader::new(provider);
        self.check_with(&reader, &address, account, manual, my_gen).await;
    }

    async fn check_with(&self, reader: &dyn Erc20Reader, address: &str, account: &str, manual: bool, my_gen: u64) {
        let result = reader.balance_of(address, account).await;

        match result {
            Ok(balance) => {
                let committed = self.state.update(|s| {
                    if s.fetch_generation != my_gen {
                        return false;
                    }
                    s.loading = false;
                    s.balance = Some(balance.formatted.clone());
                    s.decimals = Some(balance.decimals);
                    s.error = None;
                    true
                });
                if !committed {
                    tracing::debug!(my_gen, "Discarding stale custom token balance");
                    return;
                }

                tracing::info!(token = address, balance = %balance.formatted, "Custom token balance read");
                if manual {
                    let notification = if balance.formatted == "0" {
                        Notification::info(ZERO_BALANCE_MESSAGE)
                    } else {
                        Notification::success(format!("Balance: {}", balance.formatted))
                    };
                    self.notifier.notify(notification);
                }
            }
            Err(e) => {
                tracing::warn!(token = address, error = %e, "Custom token balance read failed");
                self.fail(my_gen, classify_balance_error(&e), manual);
            }
        }
    }

    /// Record `message` if `my_gen` is still current.
    fn fail(&self, my_gen: u64, message: String, manual: bool) {
        let committed = self.state.update(|s| {
            if s.fetch_generation != my_gen {
                return false;
            }
            s.loading = false;
            s.balance = None;
            s.decimals = None;
            s.error = Some(message.clone());
            true
        });

        if committed && manual {
            self.notifier.notify(Notification::error(message));
        }
    }
}

fn validate_contract_address(address: &str) -> crate::Result<()> {
    if address.is_empty() {
        return Err(WalletError::Validation("Please enter a contract address".to_string()));
    }
    if !is_valid_evm_address(address) {
        return Err(WalletError::Validation("Invalid Ethereum address format".to_string()));
    }
    Ok(())
}
