//! On-chain USDC operations used for funding an Agentopia balance.
//!
//! Deposits are two transactions: `approve(micropayment, amount)` on the USDC
//! contract, then `deposit(amount)` on the micropayment contract. The server
//! picks the deposit up from chain events; callers poll the balance to see it.
//!
//! Nothing is sent unless the RPC endpoint reports the configured chain ID and
//! the wallet holds enough USDC.

use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;

use crate::{AgentopiaError, ChainConfig, UsdcAmount, IMicropayment, IERC20};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Query the USDC balance of `owner`.
pub async fn usdc_balance<P: Provider>(
    provider: &P,
    token: Address,
    owner: Address,
) -> Result<U256, AgentopiaError> {
    let contract = IERC20::new(token, provider);
    contract
        .balanceOf(owner)
        .call()
        .await
        .map_err(|e| AgentopiaError::Chain(format!("balanceOf failed: {e}")))
}

/// Query the allowance that `owner` has granted to `spender`.
pub async fn allowance<P: Provider>(
    provider: &P,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256, AgentopiaError> {
    let contract = IERC20::new(token, provider);
    contract
        .allowance(owner, spender)
        .call()
        .await
        .map_err(|e| AgentopiaError::Chain(format!("allowance failed: {e}")))
}

/// Execute `approve(spender, amount)` on the token contract.
pub async fn approve<P: Provider>(
    provider: &P,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<TxHash, AgentopiaError> {
    let contract = IERC20::new(token, provider);
    let pending = tokio::time::timeout(SEND_TIMEOUT, contract.approve(spender, amount).send())
        .await
        .map_err(|_| AgentopiaError::Chain("approve send timed out after 30s".to_string()))?
        .map_err(|e| AgentopiaError::Chain(format!("approve send failed: {e}")))?;

    let receipt = tokio::time::timeout(RECEIPT_TIMEOUT, pending.get_receipt())
        .await
        .map_err(|_| AgentopiaError::Chain("approve receipt timed out after 60s".to_string()))?
        .map_err(|e| AgentopiaError::Chain(format!("approve receipt failed: {e}")))?;

    if !receipt.status() {
        return Err(AgentopiaError::Chain("approve reverted".to_string()));
    }
    Ok(receipt.transaction_hash)
}

/// Execute `deposit(amount)` on the micropayment contract.
pub async fn deposit<P: Provider>(
    provider: &P,
    micropayment: Address,
    amount: U256,
) -> Result<TxHash, AgentopiaError> {
    let contract = IMicropayment::new(micropayment, provider);
    let pending = tokio::time::timeout(SEND_TIMEOUT, contract.deposit(amount).send())
        .await
        .map_err(|_| AgentopiaError::Chain("deposit send timed out after 30s".to_string()))?
        .map_err(|e| AgentopiaError::Chain(format!("deposit send failed: {e}")))?;

    let receipt = tokio::time::timeout(RECEIPT_TIMEOUT, pending.get_receipt())
        .await
        .map_err(|_| AgentopiaError::Chain("deposit receipt timed out after 60s".to_string()))?
        .map_err(|e| AgentopiaError::Chain(format!("deposit receipt failed: {e}")))?;

    if !receipt.status() {
        return Err(AgentopiaError::Chain("deposit reverted".to_string()));
    }
    Ok(receipt.transaction_hash)
}

/// Approve (if the current allowance is short) and deposit `amount` USDC
/// from the signer's wallet. Returns the deposit transaction hash.
///
/// Fails with [`AgentopiaError::Chain`] if the RPC endpoint serves a different
/// chain than `config.chain_id`, and with [`AgentopiaError::InvalidAmount`] if
/// the wallet's USDC balance is below `amount`.
pub async fn deposit_usdc(
    signer: &PrivateKeySigner,
    config: &ChainConfig,
    amount: UsdcAmount,
) -> Result<TxHash, AgentopiaError> {
    let micropayment = config.micropayment_address.ok_or_else(|| {
        AgentopiaError::Config("micropayment contract address is not configured".to_string())
    })?;
    if amount == UsdcAmount::ZERO {
        return Err(AgentopiaError::InvalidAmount(
            "deposit amount must be positive".to_string(),
        ));
    }

    let rpc_url = url::Url::parse(&config.rpc_url)
        .map_err(|e| AgentopiaError::Config(format!("invalid RPC URL '{}': {e}", config.rpc_url)))?;
    let owner = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer.clone()))
        .connect_http(rpc_url);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| AgentopiaError::Chain(format!("eth_chainId failed: {e}")))?;
    if chain_id != config.chain_id {
        return Err(AgentopiaError::Chain(format!(
            "RPC {} serves chain {chain_id}, expected {}",
            config.rpc_url, config.chain_id
        )));
    }

    let value = U256::from(amount.units());
    let held = usdc_balance(&provider, config.usdc_address, owner).await?;
    if held < value {
        return Err(AgentopiaError::InvalidAmount(format!(
            "wallet {owner} holds {held} USDC units, deposit needs {value}"
        )));
    }

    let current = allowance(&provider, config.usdc_address, owner, micropayment).await?;
    if current < value {
        let tx = approve(&provider, config.usdc_address, micropayment, value).await?;
        tracing::info!(%owner, %tx, amount = %amount, "approved micropayment contract");
    }

    let tx = deposit(&provider, micropayment, value).await?;
    tracing::info!(%owner, %tx, amount = %amount, "deposit confirmed");
    Ok(tx)
}
