//! Agentopia client SDK.
//!
//! Register HTTP services on the Agentopia marketplace, discover them, and
//! call them either through the billing proxy or directly with a hold.
//!
//! # Quick Example
//!
//! ```no_run
//! use agentopia_client::{Agentopia, ClientConfig, Credentials, RequestOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), agentopia_client::AgentopiaError> {
//! let creds = Credentials::from_private_key("0xYOUR_KEY")?;
//! let client = Agentopia::new(ClientConfig::new(creds))?;
//!
//! let balance = client.get_balance().await?;
//! println!("available: {} USDC", balance.available_balance.to_usdc_string());
//!
//! let reply = client
//!     .service()
//!     .execute_via_proxy("hello-world", "hello_world", "GET", RequestOptions::new())
//!     .await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod api_key;
mod client;
pub mod config;
mod hold;
mod http_client;
pub mod poll;
pub mod request;
mod service;

pub use api_key::ApiKeyManager;
pub use client::Agentopia;
pub use config::{ClientConfig, ConfigError, PollConfig};
pub use hold::HoldManager;
pub use http_client::HttpClient;
pub use request::{ExecuteMethod, RequestOptions};
pub use service::ServiceManager;

// Re-export commonly needed types from core
pub use agentopia::{
    AgentopiaError, ApiKey, Balance, ChainConfig, Credentials, Hold, NewService, Service,
    ServicePathUpdate, ServiceUpdate, UsdcAmount, Withdrawal, WithdrawalStatus,
};
