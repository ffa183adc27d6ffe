//! UI Components

pub mod custom_token;
pub mod navbar;
pub mod network_info;
pub mod toasts;
pub mod token_balances;
pub mod wallet_card;

pub use custom_token::CustomTokenCard;
pub use navbar::Navbar;
pub use network_info::{NetworkInfo, UnsupportedNetworkBanner};
pub use toasts::ToastStack;
pub use token_balances::TokenBalancesCard;
pub use wallet_card::WalletCard;
