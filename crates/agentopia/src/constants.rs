use alloy::primitives::{address, Address};

/// Production API origin.
pub const API_URL: &str = "https://api.agentopia.xyz";

/// Base mainnet chain ID.
pub const BASE_CHAIN_ID: u64 = 8453;

/// Default RPC endpoint for Base mainnet.
pub const RPC_URL: &str = "https://mainnet.base.org";

/// Native USDC on Base mainnet.
pub const USDC_ADDRESS: Address = address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

/// USDC has 6 decimal places.
pub const TOKEN_DECIMALS: u32 = 6;

/// Upper bound the search endpoint accepts for `limit`.
pub const MAX_SEARCH_LIMIT: u32 = 10;

/// Header carrying the hold identifier on direct service calls.
pub const HOLD_ID_HEADER: &str = "X-Hold-Id";

/// Runtime chain configuration used for on-chain deposits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub usdc_address: Address,
    /// Agentopia micropayment contract. Deposits fail without it.
    pub micropayment_address: Option<Address>,
}

impl Default for ChainConfig {
    /// Defaults to Base mainnet.
    fn default() -> Self {
        Self {
            chain_id: BASE_CHAIN_ID,
            rpc_url: RPC_URL.to_string(),
            usdc_address: USDC_ADDRESS,
            micropayment_address: None,
        }
    }
}
