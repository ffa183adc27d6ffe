//! # Wallet State Reader and Connector
//!
//! Two provider round-trips the session store is built on:
//!
//! - [`read_wallet_state`]: `eth_chainId` + `eth_accounts`, concurrently.
//!   Never opens a wallet prompt.
//! - [`connect_wallet`]: `eth_requestAccounts`, then `eth_chainId`. May prompt.
//!
//! Both return a [`WalletReadResult`] whose `chain_id_dec` is always the
//! decimal value of `chain_id_hex`.

use futures::try_join;
use serde_json::Value;

use shared::utils::parse_chain_id;

use crate::error::{Result, WalletError};
use crate::provider::{methods, Eip1193Provider, ProviderRpcError};

/// Chain and account state reported by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletReadResult {
    pub chain_id_hex: String,
    pub chain_id_dec: u64,
    pub accounts: Vec<String>,
    /// First entry of `accounts`
    pub account: Option<String>,
}

impl WalletReadResult {
    fn new(chain_id_hex: String, chain_id_dec: u64, accounts: Vec<String>) -> Self {
        let account = accounts.first().cloned();
        Self {
            chain_id_hex,
            chain_id_dec,
            accounts,
            account,
        }
    }
}

/// Read chain and authorized accounts without prompting the user.
///
/// # Errors
///
/// [`WalletError::Read`] if either query fails or returns an unexpected payload.
pub async fn read_wallet_state(provider: &dyn Eip1193Provider) -> Result<WalletReadResult> {
    let (chain_raw, accounts_raw) = try_join!(
        provider.request(methods::ETH_CHAIN_ID, None),
        provider.request(methods::ETH_ACCOUNTS, None),
    )
    .map_err(|e| WalletError::Read(e.message))?;

    let (chain_id_hex, chain_id_dec) = decode_chain_id(&chain_raw).map_err(WalletError::Read)?;
    let accounts = decode_accounts(&accounts_raw).map_err(WalletError::Read)?;

    Ok(WalletReadResult::new(chain_id_hex, chain_id_dec, accounts))
}

/// Ask the wallet for account access, then read the chain.
///
/// # Errors
///
/// - [`WalletError::Rejected`] if the user declined
/// - [`WalletError::Connect`] with the provider's message otherwise
pub async fn connect_wallet(provider: &dyn Eip1193Provider) -> Result<WalletReadResult> {
    let accounts_raw = provider
        .request(methods::ETH_REQUEST_ACCOUNTS, None)
        .await
        .map_err(map_connect_error)?;
    let chain_raw = provider
        .request(methods::ETH_CHAIN_ID, None)
        .await
        .map_err(map_connect_error)?;

    let accounts = decode_accounts(&accounts_raw).map_err(WalletError::Connect)?;
    let (chain_id_hex, chain_id_dec) = decode_chain_id(&chain_raw).map_err(WalletError::Connect)?;

    Ok(WalletReadResult::new(chain_id_hex, chain_id_dec, accounts))
}

fn map_connect_error(err: ProviderRpcError) -> WalletError {
    if err.is_user_rejection() {
        WalletError::Rejected
    } else {
        WalletError::Connect(err.message)
    }
}

/// Decode a hex chain id payload into `(hex, decimal)`.
pub(crate) fn decode_chain_id(value: &Value) -> std::result::Result<(String, u64), String> {
    let hex = value
        .as_str()
        .ok_or_else(|| format!("eth_chainId returned a non-string value: {}", value))?;
    let dec = parse_chain_id(hex).ok_or_else(|| format!("Invalid chain id: {}", hex))?;
    Ok((hex.to_string(), dec))
}

/// Decode an accounts payload (array of address strings).
pub(crate) fn decode_accounts(value: &Value) -> std::result::Result<Vec<String>, String> {
    let entries = value
        .as_array()
        .ok_or_else(|| format!("Expected an array of accounts, got: {}", value))?;

    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("Account entry is not a string: {}", entry))
        })
        .collect()
}
