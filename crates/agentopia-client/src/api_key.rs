use agentopia::{AgentopiaError, ApiKey, CreateApiKeyRequest};

use crate::http_client::HttpClient;

/// API keys let another process spend from this account without the
/// private key, e.g. an OpenAI-compatible client pointed at the proxy.
pub struct ApiKeyManager<'a> {
    client: &'a HttpClient,
}

impl<'a> ApiKeyManager<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Issue a new key. The secret is only ever returned here.
    pub async fn create(&self, name: &str) -> Result<ApiKey, AgentopiaError> {
        if name.trim().is_empty() {
            return Err(AgentopiaError::InvalidArgument(
                "api key name cannot be empty".to_string(),
            ));
        }
        let body = CreateApiKeyRequest {
            name: name.to_string(),
        };
        let key: ApiKey = self.client.post("/v1/api-key", &body).await?;
        tracing::info!(id = %key.id, name = %key.name, "api key created");
        Ok(key)
    }

    pub async fn list(&self) -> Result<Vec<ApiKey>, AgentopiaError> {
        self.client.get("/v1/api-key").await
    }
}
