//! # Centralized Error Handling
//!
//! This module defines [`WalletError`], the error type shared by the state
//! reader, connector, ERC-20 reader and fetch stores. It follows the
//! `thiserror` pattern used across the workspace.
//!
//! ## Error Categories
//!
//! 1. **Environment** - no wallet is injected
//!    - [`NotInstalled`](WalletError::NotInstalled)
//!
//! 2. **Provider calls**
//!    - [`Read`](WalletError::Read) → non-interactive read failed
//!    - [`Rejected`](WalletError::Rejected) → user declined the prompt (not a fault)
//!    - [`Connect`](WalletError::Connect) → any other interactive failure
//!
//! 3. **Balances and input**
//!    - [`BalanceRead`](WalletError::BalanceRead) → ERC-20 read failed
//!    - [`Validation`](WalletError::Validation) → malformed user input
//!    - [`Config`](WalletError::Config) → bad runtime configuration
//!
//! None of these propagate past the stores: every store catches them where the
//! call was issued and turns them into state fields.

use thiserror::Error;

/// Convenience type alias for `Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

/// Wallet core error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No provider carrying the target flag was found.
    #[error("Wallet not installed")]
    NotInstalled,

    /// `eth_chainId` or `eth_accounts` failed or returned something unexpected.
    #[error("{0}")]
    Read(String),

    /// The user declined `eth_requestAccounts`.
    #[error("Connection request was rejected by user")]
    Rejected,

    /// `eth_requestAccounts` failed for a reason other than rejection.
    #[error("{0}")]
    Connect(String),

    /// ERC-20 `balanceOf`/`decimals` could not be read.
    #[error("{0}")]
    BalanceRead(String),

    /// Invalid user input (e.g. a malformed contract address).
    #[error("{0}")]
    Validation(String),

    /// Invalid runtime configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
