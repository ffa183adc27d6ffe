//! Reusable reactive hooks

pub mod soft_refresh;

pub use soft_refresh::use_soft_refresh;
