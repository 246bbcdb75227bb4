//! Service registry and execution.
//!
//! Two execution modes:
//!
//! - **Proxied** ([`ServiceManager::execute_via_proxy`]): the call goes through
//!   `/v1/execute/service/{slug}/{path}` and the server handles the hold,
//!   forwarding, settlement and debit.
//! - **Direct** ([`ServiceManager::execute`]): the client creates the hold
//!   itself and calls the service's `base_url` with an `X-Hold-Id` header.

use agentopia::service::{validate_slug, NewService, ServicePathUpdate, ServiceUpdate};
use agentopia::{AgentopiaError, Service, HOLD_ID_HEADER, MAX_SEARCH_LIMIT};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use crate::hold::HoldManager;
use crate::http_client::{read_reply, HttpClient};
use crate::request::{normalize_endpoint_path, ExecuteMethod, RequestOptions};

pub struct ServiceManager<'a> {
    client: &'a HttpClient,
}

impl<'a> ServiceManager<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Register a new service. A taken slug comes back as
    /// [`AgentopiaError::Conflict`].
    pub async fn register(&self, new: &NewService) -> Result<Service, AgentopiaError> {
        new.validate()?;
        let service = checked(self.client.post("/v1/service", &new.request_body()).await?)?;
        tracing::info!(slug = %service.slug, id = %service.id, "service registered");
        Ok(service)
    }

    /// Apply a partial update. Fields left unset in `update` are not sent.
    pub async fn update(
        &self,
        slug: &str,
        update: &ServiceUpdate,
    ) -> Result<serde_json::Value, AgentopiaError> {
        validate_slug(slug)?;
        update.validate()?;
        self.client
            .put(&format!("/v1/service/{}", urlencoding::encode(slug)), &update.request_body())
            .await
    }

    /// Override hold settings for one `(method, path)` of a service.
    pub async fn update_path(
        &self,
        slug: &str,
        path: &str,
        method: &str,
        update: &ServicePathUpdate,
    ) -> Result<serde_json::Value, AgentopiaError> {
        validate_slug(slug)?;
        let method = method.trim().to_ascii_uppercase();
        if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AgentopiaError::InvalidArgument(format!(
                "invalid HTTP method '{method}'"
            )));
        }

        let path = encode_path(path);
        self.client
            .put_with_query(
                &format!("/v1/service/{}/path/{path}", urlencoding::encode(slug)),
                &[("method", method.as_str())],
                &update.request_body(),
            )
            .await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Service, AgentopiaError> {
        validate_slug(slug)?;
        checked(
            self.client
                .get(&format!("/v1/service/slug/{}", urlencoding::encode(slug)))
                .await?,
        )
    }

    pub async fn get(&self, id: Uuid) -> Result<Service, AgentopiaError> {
        checked(self.client.get(&format!("/v1/service/{id}")).await?)
    }

    /// Full-text search. `limit` is capped at 10; ordering is up to the server.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Service>, AgentopiaError> {
        let limit = limit.min(MAX_SEARCH_LIMIT);
        let services: Vec<Service> = self
            .client
            .get_with_query(
                "/v1/service/search",
                &[("query", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        services.into_iter().map(checked).collect()
    }

    /// Execute through the platform proxy; billing happens server-side.
    ///
    /// Any non-2xx reply is [`AgentopiaError::Http`], including 404 and 409.
    /// An empty 2xx reply is a [`AgentopiaError::Validation`] error.
    pub async fn execute_via_proxy(
        &self,
        slug: &str,
        endpoint_path: &str,
        method: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value, AgentopiaError> {
        let method: ExecuteMethod = method.parse()?;
        validate_slug(slug)?;

        let path = format!(
            "/v1/execute/service/{}/{}",
            urlencoding::encode(slug),
            endpoint_path.trim_start_matches('/')
        );
        self.client.send(method.as_reqwest(), &path, &options).await
    }

    /// Execute by calling the service origin directly.
    ///
    /// Looks the service up, creates a hold for its default amount and expiry,
    /// then calls `{base_url}{endpoint_path}` with `X-Hold-Id`. Caller headers
    /// are layered on top and win on a name clash. The HTTP session lives only
    /// for this call.
    ///
    /// An unknown slug is [`AgentopiaError::NotFound`]. Once the service is
    /// resolved, any non-2xx reply from it is [`AgentopiaError::Http`] and an
    /// empty 2xx reply is [`AgentopiaError::Validation`].
    pub async fn execute(
        &self,
        slug: &str,
        endpoint_path: &str,
        method: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value, AgentopiaError> {
        let method: ExecuteMethod = method.parse()?;
        let service = self.get_by_slug(slug).await?;

        let hold_id = HoldManager::new(self.client)
            .create(
                service.id,
                service.default_hold_amount,
                service.default_hold_expires_in,
            )
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-hold-id"),
            HeaderValue::from_str(&hold_id.to_string()).map_err(|e| {
                AgentopiaError::InvalidArgument(format!("{HOLD_ID_HEADER}: {e}"))
            })?,
        );

        let url = format!(
            "{}{}",
            service.base_url.trim_end_matches('/'),
            normalize_endpoint_path(endpoint_path)
        );
        tracing::debug!(%url, %hold_id, ?method, "direct service call");

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AgentopiaError::Transport(format!("failed to build HTTP client: {e}")))?;
        let request = options.apply(http.request(method.as_reqwest(), &url), headers)?;
        let resp = request
            .send()
            .await
            .map_err(|e| AgentopiaError::Transport(format!("request to {url} failed: {e}")))?;
        read_reply(resp).await
    }
}

/// Percent-encode each segment of a service path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn checked(service: Service) -> Result<Service, AgentopiaError> {
    service.validate()?;
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("chat/completions"), "chat/completions");
        assert_eq!(encode_path("/user/details"), "user/details");
        assert_eq!(encode_path("a b/c"), "a%20b/c");
    }

    #[test]
    fn test_hold_header_name_matches_constant() {
        assert_eq!(
            HeaderName::from_static("x-hold-id"),
            HeaderName::from_bytes(HOLD_ID_HEADER.as_bytes()).unwrap()
        );
    }
}
