use serde::Serialize;

/// Whether a chain carries real value or is a test network.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChainEnvironment {
    Mainnet,
    Testnet,
}

impl ChainEnvironment {
    pub fn label(&self) -> &'static str {
        match self {
            ChainEnvironment::Mainnet => "Mainnet",
            ChainEnvironment::Testnet => "Testnet",
        }
    }
}

/// Native gas currency of a chain
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Static metadata for a supported chain
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChainConfig {
    pub id: u64,
    pub name: &'static str,
    pub env: ChainEnvironment,
    pub native_currency: NativeCurrency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_explorer_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<&'static str>,
}

impl ChainConfig {
    /// Display name including the environment, e.g. "Base (Testnet)".
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.env.label())
    }

    /// Explorer link for an address on this chain, if the chain has an explorer.
    pub fn explorer_address_url(&self, address: &str) -> Option<String> {
        self.block_explorer_url
            .map(|base| format!("{}/address/{}", base, address))
    }
}

const ETH: NativeCurrency = NativeCurrency { symbol: "ETH", decimals: 18 };
const BNB: NativeCurrency = NativeCurrency { symbol: "BNB", decimals: 18 };

/// Supported chains: Ethereum, BNB Chain and Base, each with one testnet.
pub const CHAINS: &[ChainConfig] = &[
    ChainConfig {
        id: 1,
        name: "Ethereum",
        env: ChainEnvironment::Mainnet,
        native_currency: ETH,
        block_explorer_url: Some("https://etherscan.io"),
        rpc_url: Some("https://eth.llamarpc.com"),
    },
    ChainConfig {
        id: 11155111,
        name: "Ethereum",
        env: ChainEnvironment::Testnet,
        native_currency: ETH,
        block_explorer_url: Some("https://sepolia.etherscan.io"),
        rpc_url: Some("https://rpc.sepolia.org"),
    },
    ChainConfig {
        id: 56,
        name: "BNB Chain",
        env: ChainEnvironment::Mainnet,
        native_currency: BNB,
        block_explorer_url: Some("https://bscscan.com"),
        rpc_url: Some("https://bsc-dataseed.binance.org"),
    },
    ChainConfig {
        id: 97,
        name: "BNB Chain",
        env: ChainEnvironment::Testnet,
        native_currency: BNB,
        block_explorer_url: Some("https://testnet.bscscan.com"),
        rpc_url: Some("https://data-seed-prebsc-1-s1.binance.org:8545"),
    },
    ChainConfig {
        id: 8453,
        name: "Base",
        env: ChainEnvironment::Mainnet,
        native_currency: ETH,
        block_explorer_url: Some("https://basescan.org"),
        rpc_url: Some("https://mainnet.base.org"),
    },
    ChainConfig {
        id: 84532,
        name: "Base",
        env: ChainEnvironment::Testnet,
        native_currency: ETH,
        block_explorer_url: Some("https://sepolia.basescan.org"),
        rpc_url: Some("https://sepolia.base.org"),
    },
];

/// Look up chain metadata by decimal chain id.
pub fn chain_by_id(chain_id: u64) -> Option<&'static ChainConfig> {
    CHAINS.iter().find(|chain| chain.id == chain_id)
}

/// `true` if the chain appears in [`CHAINS`]. `None` (no chain yet) is unsupported.
pub fn is_supported_chain(chain_id: Option<u64>) -> bool {
    chain_id.and_then(chain_by_id).is_some()
}
