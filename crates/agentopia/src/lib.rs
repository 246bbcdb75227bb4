//! Core types for the Agentopia API marketplace.
//!
//! Agentopia sells access to HTTP services billed per call in USDC. Calls are
//! covered by *holds*: provisional reservations against the caller's ledger
//! balance that the server settles once the call completes.
//!
//! This crate has no HTTP session of its own. It provides:
//!
//! - [`Service`] and its registration/update payloads ([`service`])
//! - exact smallest-unit amounts ([`UsdcAmount`])
//! - account models: [`Balance`], [`Hold`], [`Withdrawal`], [`ApiKey`]
//! - request signing ([`auth`])
//! - on-chain deposits ([`chain`])
//!
//! The `agentopia-client` crate builds the HTTP SDK on top of these.

pub mod account;
pub mod amount;
pub mod auth;
pub mod chain;
pub mod constants;
pub mod error;
pub mod service;

use alloy::sol;

// ERC-20 subset used for funding deposits.
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
    }
}

// Agentopia micropayment contract: credits the sender's ledger balance.
sol! {
    #[sol(rpc)]
    interface IMicropayment {
        function deposit(uint256 amount) external;
    }
}

pub use account::*;
pub use amount::UsdcAmount;
pub use auth::Credentials;
pub use constants::*;
pub use error::AgentopiaError;
pub use service::{NewService, Service, ServicePathUpdate, ServiceUpdate};
