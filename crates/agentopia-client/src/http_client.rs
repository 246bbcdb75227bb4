use agentopia::{AgentopiaError, Credentials};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::request::RequestOptions;

/// Authenticated JSON client for the Agentopia API.
///
/// Wraps `reqwest::Client`. Every request is sent to `{api_url}{path}` with a
/// freshly signed `Authorization` header. Typed responses are decoded straight
/// from the body bytes so amounts keep their literal precision.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    api_url: String,
    credentials: Credentials,
}

impl HttpClient {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AgentopiaError> {
        let request = self.authorized(reqwest::Method::GET, path)?;
        self.dispatch(request, path).await
    }

    pub async fn get_with_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, AgentopiaError> {
        let request = self.authorized(reqwest::Method::GET, path)?.query(query);
        self.dispatch(request, path).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AgentopiaError> {
        let request = self.authorized(reqwest::Method::POST, path)?.json(body);
        self.dispatch(request, path).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AgentopiaError> {
        self.put_with_query(path, &[] as &[(&str, &str)], body).await
    }

    pub async fn put_with_query<Q: Serialize + ?Sized, B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
        body: &B,
    ) -> Result<T, AgentopiaError> {
        let request = self
            .authorized(reqwest::Method::PUT, path)?
            .query(query)
            .json(body);
        self.dispatch(request, path).await
    }

    /// Forward a request with caller-supplied query, body and headers.
    ///
    /// The response belongs to whatever sits behind `path` (the execution
    /// proxy), so it is read with [`read_reply`].
    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<serde_json::Value, AgentopiaError> {
        let request = options.apply(self.authorized(method, path)?, HeaderMap::new())?;
        let resp = request
            .send()
            .await
            .map_err(|e| AgentopiaError::Transport(format!("request to {path} failed: {e}")))?;
        read_reply(resp).await
    }

    fn authorized(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, AgentopiaError> {
        let auth = HeaderValue::from_str(&self.credentials.authorization()?)
            .map_err(|e| AgentopiaError::Signature(format!("invalid auth header: {e}")))?;
        tracing::debug!(%method, path, "agentopia request");
        Ok(self.http.request(method, self.url(path)).header(AUTHORIZATION, auth))
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T, AgentopiaError> {
        let resp = request
            .send()
            .await
            .map_err(|e| AgentopiaError::Transport(format!("request to {path} failed: {e}")))?;
        let body = read_body(resp, AgentopiaError::from_status).await?;
        decode(path, &body)
    }
}

/// Collect a 2xx body, or turn a non-2xx response into the error `on_error`
/// builds from its status and untouched body.
async fn read_body(
    resp: reqwest::Response,
    on_error: fn(u16, String) -> AgentopiaError,
) -> Result<Vec<u8>, AgentopiaError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "request failed");
        return Err(on_error(status.as_u16(), body));
    }

    resp.bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| AgentopiaError::Transport(format!("failed to read response body: {e}")))
}

/// Read the reply of an executed service.
///
/// Every non-2xx status is [`AgentopiaError::Http`]: a 404 here is the
/// service's own answer, not a missing registry entry. A 2xx reply must carry
/// a JSON body.
pub(crate) async fn read_reply(resp: reqwest::Response) -> Result<serde_json::Value, AgentopiaError> {
    let body = read_body(resp, |status, body| AgentopiaError::Http { status, body }).await?;
    if body.is_empty() {
        return Err(AgentopiaError::Validation(
            "service replied with an empty body".to_string(),
        ));
    }
    serde_json::from_slice(&body)
        .map_err(|e| AgentopiaError::Validation(format!("service reply is not JSON: {e}")))
}

/// Deserialize an API body into `T`, failing closed on any mismatch. An empty
/// body decodes as `null`.
fn decode<T: DeserializeOwned>(what: &str, body: &[u8]) -> Result<T, AgentopiaError> {
    let body = if body.is_empty() { b"null".as_slice() } else { body };
    serde_json::from_slice(body).map_err(|e| AgentopiaError::Validation(format!("{what}: {e}")))
}
