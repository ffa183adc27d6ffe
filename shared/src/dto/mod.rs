//! # Configuration Tables
//!
//! Static chain and token configuration. Adding a chain or a token is a table
//! edit here; the wallet core and the fetch stores never hard-code addresses.
//!
//! ## Module Organization
//!
//! - [`chains`] - Supported networks and their metadata
//! - [`tokens`] - Token contract addresses per chain
//!
//! ## Serialization Format
//!
//! All types derive `Serialize` so the dashboard can dump them in its
//! developer details panel:
//!
//! - **Enums**: Serialize to lowercase strings using `#[serde(rename_all = "lowercase")]`
//! - **Optional fields**: Omitted when `None`

pub mod chains;
pub mod tokens;

pub use chains::*;
pub use tokens::*;
