//! Deposit USDC into the Agentopia ledger and wait for it to be credited.
//!
//! Reads the usual `AGENTOPIA_*` / chain variables plus `DEPOSIT_AMOUNT`
//! (smallest units, or a `$1.25`-style USDC value).

use agentopia_client::{Agentopia, ClientConfig, UsdcAmount};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agentopia_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("deposit failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let raw = std::env::var("DEPOSIT_AMOUNT").map_err(|_| "DEPOSIT_AMOUNT is required")?;
    let amount = if raw.trim_start().starts_with('$') {
        UsdcAmount::from_usdc(&raw)?
    } else {
        raw.parse::<UsdcAmount>()?
    };

    let poll = config.poll;
    let client = Agentopia::new(config)?;
    let address = client
        .address()
        .ok_or("depositing requires AGENTOPIA_PRIVATE_KEY")?;

    let before = client.get_balance().await?;
    tracing::info!(
        "Wallet {address:#x}: available {} USDC, on hold {} USDC",
        before.available_balance.to_usdc_string(),
        before.amount_on_hold.to_usdc_string()
    );

    let target = before
        .available_balance
        .checked_add(amount)
        .ok_or("deposit would overflow the balance")?;

    let tx = client.deposit(amount).await?;
    tracing::info!("Deposit of {} USDC mined in {tx}", amount.to_usdc_string());

    let after = client
        .wait_for_balance(|b| b.available_balance >= target, poll)
        .await?;
    tracing::info!(
        "Credited: available {} USDC",
        after.available_balance.to_usdc_string()
    );
    Ok(())
}
