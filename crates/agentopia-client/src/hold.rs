use agentopia::{AgentopiaError, CreateHoldRequest, Hold, UsdcAmount};
use uuid::Uuid;

use crate::http_client::HttpClient;

/// Hold management: reserve funds before a billed direct call.
pub struct HoldManager<'a> {
    client: &'a HttpClient,
}

impl<'a> HoldManager<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Reserve `amount` against the caller's balance for `service_id`,
    /// expiring after `expires_in` seconds. Returns the hold ID.
    pub async fn create(
        &self,
        service_id: Uuid,
        amount: UsdcAmount,
        expires_in: u64,
    ) -> Result<Uuid, AgentopiaError> {
        Ok(self.create_hold(service_id, amount, expires_in).await?.id)
    }

    /// Like [`create`](Self::create) but returns the full hold record.
    pub async fn create_hold(
        &self,
        service_id: Uuid,
        amount: UsdcAmount,
        expires_in: u64,
    ) -> Result<Hold, AgentopiaError> {
        if expires_in == 0 {
            return Err(AgentopiaError::InvalidArgument(
                "hold expires_in must be positive".to_string(),
            ));
        }

        let body = CreateHoldRequest {
            service_id,
            amount,
            expires_in,
        };
        let hold: Hold = self.client.post("/v1/hold", &body).await?;
        tracing::info!(hold_id = %hold.id, %service_id, amount = %amount, expires_in, "hold created");
        Ok(hold)
    }

    pub async fn get(&self, hold_id: Uuid) -> Result<Hold, AgentopiaError> {
        self.client.get(&format!("/v1/hold/{hold_id}")).await
    }
}
