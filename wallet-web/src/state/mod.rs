//! Reactive contexts bridging the wallet core into Leptos signals

pub mod balances;
pub mod toasts;
pub mod wallet;

pub use balances::{provide_balances_context, use_balances_context, BalancesContext};
pub use toasts::{provide_toast_context, use_toast_context, Toast, ToastContext, ToastNotifier};
pub use wallet::{provide_wallet_context, use_wallet_context, WalletContext};
