//! # Shared Chain and Token Library
//!
//! Static network metadata and pure helpers used by both the wallet core
//! (`lib-core`) and the browser dashboard (`wallet-web`). Nothing in this crate
//! touches a provider or the DOM, so it compiles and tests natively as well as
//! on `wasm32`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Configuration tables
//!   - **[`dto::chains`]**: Supported chains (id, name, environment, explorer)
//!   - **[`dto::tokens`]**: Per-chain ERC-20 token addresses
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_units`]**: Integer token amounts to display strings
//!   - **[`utils::short_address`]**: Shorten addresses for display
//!   - **[`utils::is_valid_evm_address`]**: `0x` + 40 hex check
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::{chain_by_id, token_config, TokenKey};
//! use shared::utils::format_units;
//!
//! let chain = chain_by_id(97).unwrap();
//! assert_eq!(chain.name, "BNB Chain");
//!
//! // USDC is not configured on Ethereum Sepolia: a first-class "N/A", not an error
//! assert!(token_config(11155111, TokenKey::Usdc).is_none());
//!
//! assert_eq!(format_units("1234500000000000000", 18), "1.2345");
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
