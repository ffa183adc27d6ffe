//! # ERC-20 Balance Reader
//!
//! Reads `balanceOf(owner)` and `decimals()` from a token contract through the
//! wallet's own `eth_call`, so no separate RPC endpoint is needed. Call data is
//! ABI-encoded from the `sol!` interface below; the 32-byte return words are
//! decoded into [`U256`].
//!
//! A contract that does not implement either function answers with empty (or
//! short) return data, which is reported as
//! `execution reverted: ...` so the balance stores can classify it.

use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use futures::try_join;
use serde_json::{json, Value};

use shared::utils::format_units;

use crate::error::{Result, WalletError};
use crate::provider::{methods, SharedProvider};

sol! {
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

/// Token balance of one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Balance {
    /// Integer amount, decimal digits
    pub raw: String,
    pub decimals: u8,
    /// `raw / 10^decimals`, at most 6 fractional digits, trailing zeros stripped
    pub formatted: String,
}

impl Erc20Balance {
    pub fn new(raw: U256, decimals: u8) -> Self {
        let raw = raw.to_string();
        let formatted = format_units(&raw, decimals);
        Self {
            raw,
            decimals,
            formatted,
        }
    }
}

/// Something that can read an ERC-20 balance.
#[async_trait(?Send)]
pub trait Erc20Reader {
    async fn balance_of(&self, token: &str, owner: &str) -> Result<Erc20Balance>;
}

/// [`Erc20Reader`] over the wallet provider's `eth_call`.
#[derive(Clone)]
pub struct ProviderErc20Reader {
    provider: SharedProvider,
}

impl ProviderErc20Reader {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let params = json!([
            { "to": to.to_string(), "data": hex::encode_prefixed(data) },
            "latest"
        ]);

        let response = self
            .provider
            .request(methods::ETH_CALL, Some(params))
            .await
            .map_err(|e| WalletError::BalanceRead(e.message))?;

        decode_call_response(&response)
    }
}

#[async_trait(?Send)]
impl Erc20Reader for ProviderErc20Reader {
    async fn balance_of(&self, token: &str, owner: &str) -> Result<Erc20Balance> {
        let token = parse_address(token, "token")?;
        let owner = parse_address(owner, "owner")?;

        let (balance_data, decimals_data) = try_join!(
            self.call(token, IERC20::balanceOfCall { owner }.abi_encode()),
            self.call(token, IERC20::decimalsCall {}.abi_encode()),
        )?;

        let raw = decode_word(&balance_data, "balanceOf")?;
        let decimals = decode_decimals(&decimals_data)?;

        tracing::debug!(%token, %owner, %raw, decimals, "ERC-20 balance read");
        Ok(Erc20Balance::new(raw, decimals))
    }
}

fn parse_address(value: &str, what: &str) -> Result<Address> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|e| WalletError::Validation(format!("Invalid {} address {}: {}", what, value, e)))
}

fn decode_call_response(response: &Value) -> Result<Vec<u8>> {
    let encoded = response
        .as_str()
        .ok_or_else(|| WalletError::BalanceRead(format!("eth_call returned a non-string value: {}", response)))?;

    hex::decode(encoded).map_err(|e| WalletError::BalanceRead(format!("eth_call returned invalid hex: {}", e)))
}

/// First 32-byte word of `data` as a [`U256`].
fn decode_word(data: &[u8], function: &str) -> Result<U256> {
    if data.len() < 32 {
        return Err(WalletError::BalanceRead(format!(
            "execution reverted: {} returned no data (is this an ERC-20 contract?)",
            function
        )));
    }
    Ok(U256::from_be_slice(&data[..32]))
}

fn decode_decimals(data: &[u8]) -> Result<u8> {
    let word = decode_word(data, "decimals")?;
    if word > U256::from(u8::MAX) {
        return Err(WalletError::BalanceRead(format!(
            "execution reverted: decimals() out of range: {}",
            word
        )));
    }
    Ok(word.as_limbs()[0] as u8)
}
