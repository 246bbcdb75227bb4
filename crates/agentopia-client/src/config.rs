use std::env;
use std::time::Duration;

use agentopia::{ChainConfig, Credentials, API_URL};
use alloy::primitives::Address;
use url::Url;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// How often and for how long to re-read eventually consistent state
/// (balances after a deposit, withdrawals until they settle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Everything an [`Agentopia`](crate::Agentopia) client needs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin, without a trailing slash.
    pub api_url: String,
    pub credentials: Credentials,
    pub chain: ChainConfig,
    pub poll: PollConfig,
}

impl ClientConfig {
    /// Production defaults for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            api_url: API_URL.to_string(),
            credentials,
            chain: ChainConfig::default(),
            poll: PollConfig::default(),
        }
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn chain(mut self, chain: ChainConfig) -> Self {
        self.chain = chain;
        self
    }

    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Load configuration from the environment.
    ///
    /// `AGENTOPIA_API_KEY` takes precedence over a private key
    /// (`AGENTOPIA_PRIVATE_KEY`, then `EVM_PRIVATE_KEY`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = if let Some(key) = non_empty_var("AGENTOPIA_API_KEY") {
            Credentials::from_api_key(key)
        } else {
            let key = non_empty_var("AGENTOPIA_PRIVATE_KEY")
                .or_else(|| non_empty_var("EVM_PRIVATE_KEY"))
                .ok_or(ConfigError::MissingRequired("AGENTOPIA_PRIVATE_KEY"))?;
            Credentials::from_private_key(&key).map_err(|e| ConfigError::InvalidKey(e.to_string()))?
        };

        let api_url = env::var("AGENTOPIA_API_URL").unwrap_or_else(|_| API_URL.to_string());
        Url::parse(&api_url).map_err(|_| ConfigError::InvalidUrl(api_url.clone()))?;

        let defaults = ChainConfig::default();

        let rpc_url = env::var("RPC_URL").unwrap_or(defaults.rpc_url);
        Url::parse(&rpc_url).map_err(|_| ConfigError::InvalidUrl(rpc_url.clone()))?;

        let chain_id = match non_empty_var("CHAIN_ID") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber(raw))?,
            None => defaults.chain_id,
        };

        let usdc_address = match non_empty_var("USDC_ADDRESS") {
            Some(raw) => parse_address(raw)?,
            None => defaults.usdc_address,
        };

        let micropayment_address = non_empty_var("MICROPAYMENT_ADDRESS")
            .map(parse_address)
            .transpose()?;

        if micropayment_address.is_none() {
            tracing::debug!("MICROPAYMENT_ADDRESS not set: deposits are disabled");
        }

        Ok(Self::new(credentials)
            .api_url(api_url)
            .chain(ChainConfig {
                chain_id,
                rpc_url,
                usdc_address,
                micropayment_address,
            }))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_address(raw: String) -> Result<Address, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
