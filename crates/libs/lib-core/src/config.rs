//! # Wallet Configuration
//!
//! Runtime knobs for the wallet core, loaded from environment variables with
//! defaults. In the browser there is no environment, so [`WalletConfig::load`]
//! always yields the defaults there; native hosts and tests can override.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `WALLET_TARGET_FLAG` | `isMetaMask` | Identity flag the locator selects on |
//! | `WALLET_EVENT_BUFFER` | `64` | Capacity of the provider event channel |
//! | `WALLET_SOFT_REFRESH_MS` | `200` | Soft-refresh animation length |

use lib_utils::envs::{get_env_or, get_env_parse_or};

use crate::error::{Result, WalletError};

pub const DEFAULT_TARGET_FLAG: &str = "isMetaMask";
pub const DEFAULT_EVENT_BUFFER: usize = 64;
pub const DEFAULT_SOFT_REFRESH_MS: u32 = 200;

/// Wallet core configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    /// Boolean marker identifying the target wallet among injected providers
    pub target_flag: String,

    /// Bounded capacity of the provider event channel
    ///
    /// Valid range: 1-1024
    pub event_buffer: usize,

    /// Duration of the soft-refresh animation in milliseconds
    pub soft_refresh_ms: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            target_flag: DEFAULT_TARGET_FLAG.to_string(),
            event_buffer: DEFAULT_EVENT_BUFFER,
            soft_refresh_ms: DEFAULT_SOFT_REFRESH_MS,
        }
    }
}

impl WalletConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let target_flag = get_env_or("WALLET_TARGET_FLAG", DEFAULT_TARGET_FLAG);

        let event_buffer = get_env_parse_or("WALLET_EVENT_BUFFER", DEFAULT_EVENT_BUFFER)
            .map_err(|e| WalletError::Config(format!("WALLET_EVENT_BUFFER must be a number: {}", e)))?;

        let soft_refresh_ms = get_env_parse_or("WALLET_SOFT_REFRESH_MS", DEFAULT_SOFT_REFRESH_MS)
            .map_err(|e| WalletError::Config(format!("WALLET_SOFT_REFRESH_MS must be a number: {}", e)))?;

        Ok(Self {
            target_flag,
            event_buffer,
            soft_refresh_ms,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.target_flag.trim().is_empty() {
            return Err(WalletError::Config("WALLET_TARGET_FLAG cannot be empty".to_string()));
        }

        if self.event_buffer == 0 || self.event_buffer > 1024 {
            return Err(WalletError::Config(
                "WALLET_EVENT_BUFFER must be between 1 and 1024".to_string(),
            ));
        }

        Ok(())
    }

    /// Load and validate, falling back to defaults (with a warning) on error.
    pub fn load() -> Self {
        match Self::from_env().and_then(|config| config.validate().map(|_| config)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid wallet configuration - using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WalletConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_flag, "isMetaMask");
        assert_eq!(config.event_buffer, 64);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_flag = WalletConfig {
            target_flag: " ".into(),
            ..WalletConfig::default()
        };
        assert!(matches!(empty_flag.validate(), Err(WalletError::Config(_))));

        let no_buffer = WalletConfig {
            event_buffer: 0,
            ..WalletConfig::default()
        };
        assert!(no_buffer.validate().is_err());
    }
}
