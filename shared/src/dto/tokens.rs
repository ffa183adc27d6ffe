use serde::Serialize;

/// Tokens tracked by the fixed-list balance fetcher.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKey {
    #[serde(rename = "USDC")]
    Usdc,
    #[serde(rename = "USDT")]
    Usdt,
}

impl TokenKey {
    /// Every tracked token, in display order.
    pub const ALL: [TokenKey; 2] = [TokenKey::Usdc, TokenKey::Usdt];

    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKey::Usdc => "USDC",
            TokenKey::Usdt => "USDT",
        }
    }
}

impl std::fmt::Display for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A token contract deployed on one chain
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TokenConfig {
    pub address: &'static str,
    pub symbol: TokenKey,
    pub name: &'static str,
}

/// Per-chain token table row. `None` means the token is not issued on that
/// chain, which is a normal state and never a fetch error.
struct ChainTokens {
    chain_id: u64,
    usdc: Option<TokenConfig>,
    usdt: Option<TokenConfig>,
}

const TOKEN_MAP: &[ChainTokens] = &[
    ChainTokens {
        chain_id: 1,
        usdc: Some(TokenConfig {
            address: "0xA0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            symbol: TokenKey::Usdc,
            name: "USD Coin",
        }),
        usdt: None,
    },
    ChainTokens { chain_id: 11155111, usdc: None, usdt: None },
    ChainTokens { chain_id: 56, usdc: None, usdt: None },
    ChainTokens {
        chain_id: 97,
        usdc: Some(TokenConfig {
            address: "0xb32B8625D2708FC7E7041BE4169EB188eeea3c14",
            symbol: TokenKey::Usdc,
            name: "USD Coin",
        }),
        usdt: Some(TokenConfig {
            address: "0x222D12d538b7FB8B17723322aF40379D51C70372",
            symbol: TokenKey::Usdt,
            name: "Tether USD",
        }),
    },
    ChainTokens { chain_id: 8453, usdc: None, usdt: None },
    ChainTokens { chain_id: 84532, usdc: None, usdt: None },
];

/// Full token config for `(chain_id, symbol)`, or `None` if not issued there.
pub fn token_config(chain_id: u64, symbol: TokenKey) -> Option<&'static TokenConfig> {
    let row = TOKEN_MAP.iter().find(|row| row.chain_id == chain_id)?;
    match symbol {
        TokenKey::Usdc => row.usdc.as_ref(),
        TokenKey::Usdt => row.usdt.as_ref(),
    }
}

/// Contract address for `(chain_id, symbol)`, or `None` if not issued there.
pub fn token_address(chain_id: u64, symbol: TokenKey) -> Option<&'static str> {
    token_config(chain_id, symbol).map(|config| config.address)
}
