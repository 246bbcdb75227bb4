use agentopia::{
    AgentopiaError, Balance, UsdcAmount, Withdrawal, WithdrawRequest,
};
use alloy::primitives::{Address, TxHash};
use uuid::Uuid;

use crate::api_key::ApiKeyManager;
use crate::config::{ClientConfig, PollConfig};
use crate::hold::HoldManager;
use crate::http_client::HttpClient;
use crate::poll::poll_until;
use crate::service::ServiceManager;

/// Entry point of the SDK.
///
/// Holds the authenticated HTTP client and hands out the per-resource
/// managers. Account operations (balance, deposit, withdrawal) live here.
#[derive(Debug, Clone)]
pub struct Agentopia {
    http: HttpClient,
    config: ClientConfig,
}

impl Agentopia {
    pub fn new(config: ClientConfig) -> Result<Self, AgentopiaError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AgentopiaError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client around a custom `reqwest::Client` (timeouts, proxies).
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        let http = HttpClient::new(http, config.api_url.clone(), config.credentials.clone());
        Self { http, config }
    }

    /// Build from environment variables. See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, AgentopiaError> {
        let config = ClientConfig::from_env().map_err(|e| AgentopiaError::Config(e.to_string()))?;
        Self::new(config)
    }

    /// Address of the signing key, if the client was built from one.
    pub fn address(&self) -> Option<Address> {
        self.config.credentials.address()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn service(&self) -> ServiceManager<'_> {
        ServiceManager::new(&self.http)
    }

    pub fn hold(&self) -> HoldManager<'_> {
        HoldManager::new(&self.http)
    }

    pub fn api_key(&self) -> ApiKeyManager<'_> {
        ApiKeyManager::new(&self.http)
    }

    fn require_address(&self, operation: &str) -> Result<Address, AgentopiaError> {
        self.address().ok_or_else(|| {
            AgentopiaError::Config(format!("{operation} requires a private key, not an API key"))
        })
    }

    pub async fn get_balance(&self) -> Result<Balance, AgentopiaError> {
        let address = self.require_address("get_balance")?;
        self.http.get(&format!("/v1/user/{address}/balance")).await
    }

    /// Poll the balance until `predicate` holds. Settlement and deposits are
    /// eventually consistent; this is how callers wait for them.
    pub async fn wait_for_balance<P>(
        &self,
        predicate: P,
        poll: PollConfig,
    ) -> Result<Balance, AgentopiaError>
    where
        P: Fn(&Balance) -> bool,
    {
        poll_until("balance condition", poll, move || self.get_balance(), predicate).await
    }

    /// Deposit USDC from the signer's wallet into the Agentopia ledger.
    ///
    /// Returns once the deposit transaction is mined; the ledger balance may
    /// lag behind it.
    pub async fn deposit(&self, amount: UsdcAmount) -> Result<TxHash, AgentopiaError> {
        let signer = self.config.credentials.signer().ok_or_else(|| {
            AgentopiaError::Config("deposit requires a private key, not an API key".to_string())
        })?;
        agentopia::chain::deposit_usdc(signer, &self.config.chain, amount).await
    }

    /// Request a withdrawal of `amount` to the signer's wallet. With `wait`,
    /// polls until the withdrawal completes or fails.
    pub async fn withdraw(
        &self,
        amount: UsdcAmount,
        wait: bool,
    ) -> Result<Withdrawal, AgentopiaError> {
        self.require_address("withdraw")?;
        if amount == UsdcAmount::ZERO {
            return Err(AgentopiaError::InvalidAmount(
                "withdrawal amount must be positive".to_string(),
            ));
        }

        let withdrawal: Withdrawal = self
            .http
            .post("/v1/withdrawal", &WithdrawRequest { amount })
            .await?;
        tracing::info!(id = %withdrawal.id, amount = %amount, status = ?withdrawal.status, "withdrawal requested");

        if !wait || withdrawal.status.is_terminal() {
            return Ok(withdrawal);
        }
        self.wait_for_withdrawal(withdrawal.id, self.config.poll)
            .await
    }

    pub async fn get_withdrawal(&self, id: Uuid) -> Result<Withdrawal, AgentopiaError> {
        self.http.get(&format!("/v1/withdrawal/{id}")).await
    }

    /// Poll a withdrawal until it reaches `completed` or `failed`.
    pub async fn wait_for_withdrawal(
        &self,
        id: Uuid,
        poll: PollConfig,
    ) -> Result<Withdrawal, AgentopiaError> {
        let withdrawal = poll_until(
            "withdrawal settlement",
            poll,
            move || self.get_withdrawal(id),
            |w| w.status.is_terminal(),
        )
        .await?;

        if let Some(ref reason) = withdrawal.error {
            tracing::warn!(%id, %reason, "withdrawal failed");
        }
        Ok(withdrawal)
    }
}
