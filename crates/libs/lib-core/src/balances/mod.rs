//! # Balance Fetch Stores
//!
//! Two stores read ERC-20 balances for the connected account:
//!
//! - [`TokenBalancesStore`]: the configured tokens (USDC, USDT) on the current chain
//! - [`CustomTokenStore`]: one contract address entered by the user
//!
//! Both guard against stale results with a fetch generation. Every fetch
//! increments the counter first and remembers the value; a result is
//! committed only if the counter still holds that value when it arrives. The
//! most recently *started* fetch wins regardless of completion order.

pub mod custom_token;
pub mod token_list;

pub use custom_token::{CustomTokenState, CustomTokenStore};
pub use token_list::{TokenBalancesRequest, TokenBalancesState, TokenBalancesStore};

use serde::Serialize;

use shared::utils::EMPTY_PLACEHOLDER;

use crate::error::WalletError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Ok,
    /// Token not issued on this chain
    #[default]
    Na,
    Error,
}

/// Balance of one token for the current account and chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceRecord {
    /// Contract address; `None` exactly when the status is `Na`
    pub address: Option<String>,
    /// Formatted amount
    pub value: Option<String>,
    pub status: BalanceStatus,
    pub decimals: Option<u8>,
}

impl BalanceRecord {
    /// Token with no contract on this chain. Not an error.
    pub fn not_issued() -> Self {
        Self {
            address: None,
            value: Some(EMPTY_PLACEHOLDER.to_string()),
            status: BalanceStatus::Na,
            decimals: None,
        }
    }

    pub fn ok(address: &str, value: String, decimals: u8) -> Self {
        Self {
            address: Some(address.to_string()),
            value: Some(value),
            status: BalanceStatus::Ok,
            decimals: Some(decimals),
        }
    }

    /// The read failed; the address is kept so the row can link to it.
    pub fn failed(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            value: None,
            status: BalanceStatus::Error,
            decimals: None,
        }
    }
}

/// Turn a balance read failure into a message for the user.
pub fn classify_balance_error(err: &WalletError) -> String {
    let message = err.to_string();
    let lower = message.to_lowercase();

    if lower.contains("execution reverted") || lower.contains("invalid opcode") {
        "Contract is not a valid ERC-20 token or does not support balanceOf/decimals".to_string()
    } else if lower.contains("network") || lower.contains("rpc") {
        "Network error. Please check your connection and try again".to_string()
    } else if lower.contains("not deployed") || lower.contains("does not exist") {
        "Contract not found on current network".to_string()
    } else if !message.trim().is_empty() {
        message
    } else {
        "Failed to fetch token balance".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_balance_error() {
        let classify = |m: &str| classify_balance_error(&WalletError::BalanceRead(m.to_string()));

        assert_eq!(
            classify("execution reverted: balanceOf returned no data"),
            "Contract is not a valid ERC-20 token or does not support balanceOf/decimals"
        );
        assert_eq!(
            classify("Internal JSON-RPC error"),
            "Network error. Please check your connection and try again"
        );
        assert_eq!(classify("contract does not exist"), "Contract not found on current network");
        assert_eq!(classify("header not found"), "header not found");
        assert_eq!(classify(""), "Failed to fetch token balance");
    }

    #[test]
    fn test_records() {
        let na = BalanceRecord::not_issued();
        assert_eq!(na.status, BalanceStatus::Na);
        assert!(na.address.is_none());

        let failed = BalanceRecord::failed("0xabc");
        assert_eq!(failed.status, BalanceStatus::Error);
        assert_eq!(failed.address.as_deref(), Some("0xabc"));
        assert!(failed.value.is_none());
    }
}
