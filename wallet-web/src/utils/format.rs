//! # Formatting Utilities for Wallet Web
//!
//! Labels shown by the dashboard cards. Amounts are already formatted by the
//! core; these helpers only decide what text a given state turns into.
//!
//! ## Functions
//!
//! - [`network_label`] - Chain name with environment, or an unsupported notice
//! - [`balance_label`] - Value column of a token row
//! - [`status_badge`] - Short status badge of a token row
//! - [`last_updated_label`] - "Last updated: HH:MM:SS"

use lib_core::balances::{BalanceRecord, BalanceStatus, TokenBalancesState};
use lib_core::WalletStatus;
use shared::utils::EMPTY_PLACEHOLDER;
use shared::{chain_by_id, is_supported_chain};

/// Network name for a decimal chain id, e.g. "Ethereum (Mainnet)".
pub fn network_label(chain_id: Option<u64>) -> String {
    match chain_id {
        Some(id) => match chain_by_id(id) {
            Some(chain) => chain.display_name(),
            None => format!("Unsupported network (Chain ID: {})", id),
        },
        None => EMPTY_PLACEHOLDER.to_string(),
    }
}

/// `true` when the banner for an unsupported network should show.
///
/// No chain at all (not connected) is not "unsupported".
pub fn is_unsupported_network(chain_id: Option<u64>) -> bool {
    chain_id.is_some() && !is_supported_chain(chain_id)
}

pub fn balance_label(record: &BalanceRecord, chain_id: Option<u64>) -> String {
    match record.status {
        BalanceStatus::Ok => record.value.clone().unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string()),
        BalanceStatus::Na => match chain_id {
            Some(id) => format!("N/A on this network (Chain ID: {})", id),
            None => "N/A on this network".to_string(),
        },
        BalanceStatus::Error => "Error".to_string(),
    }
}

pub fn status_badge(status: BalanceStatus) -> &'static str {
    match status {
        BalanceStatus::Ok => "OK",
        BalanceStatus::Na => "N/A",
        BalanceStatus::Error => "ERROR",
    }
}

pub fn last_updated_label(state: &TokenBalancesState) -> Option<String> {
    state
        .last_updated
        .map(|time| format!("Last updated: {}", lib_utils::format_clock(time)))
}

/// Headline of the wallet card.
pub fn wallet_status_label(installed: bool, status: WalletStatus) -> &'static str {
    if !installed {
        return "Wallet not installed";
    }
    match status {
        WalletStatus::Idle => "Not connected",
        WalletStatus::Connecting => "Connecting...",
        WalletStatus::Connected => "Connected",
        WalletStatus::Error => "Connection error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_label() {
        assert_eq!(network_label(Some(137)), "Unsupported network (Chain ID: 137)");
        assert_eq!(network_label(Some(97)), "BNB Chain (Testnet)");
        assert_eq!(network_label(None), "—");
        assert!(is_unsupported_network(Some(137)));
        assert!(!is_unsupported_network(Some(1)));
        assert!(!is_unsupported_network(None));
    }

    #[test]
    fn test_balance_label() {
        let ok = BalanceRecord::ok("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "12.5".into(), 6);
        assert_eq!(balance_label(&ok, Some(1)), "12.5");
        assert_eq!(status_badge(ok.status), "OK");

        assert_eq!(balance_label(&BalanceRecord::not_issued(), Some(8453)), "N/A on this network (Chain ID: 8453)");

        let failed = BalanceRecord::failed("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        assert_eq!(balance_label(&failed, Some(1)), "Error");
        assert_eq!(status_badge(failed.status), "ERROR");
    }

    #[test]
    fn test_wallet_status_label() {
        assert_eq!(wallet_status_label(false, WalletStatus::Idle), "Wallet not installed");
        assert_eq!(wallet_status_label(true, WalletStatus::Connecting), "Connecting...");
        assert_eq!(last_updated_label(&TokenBalancesState::default()), None);
    }
}
