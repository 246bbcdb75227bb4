use std::str::FromStr;

use agentopia::AgentopiaError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// HTTP methods a service can be executed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteMethod {
    Get,
    Post,
}

impl ExecuteMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            ExecuteMethod::Get => reqwest::Method::GET,
            ExecuteMethod::Post => reqwest::Method::POST,
        }
    }
}

impl FromStr for ExecuteMethod {
    type Err = AgentopiaError;

    /// Case-insensitive; anything but GET or POST is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(ExecuteMethod::Get),
            "POST" => Ok(ExecuteMethod::Post),
            _ => Err(AgentopiaError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Extra request parts forwarded to a service call as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Layer the caller's headers over `base`. On a name clash the caller's
    /// value replaces the base one.
    pub fn merged_headers(&self, mut base: HeaderMap) -> Result<HeaderMap, AgentopiaError> {
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                AgentopiaError::InvalidArgument(format!("header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                AgentopiaError::InvalidArgument(format!("header value for '{name}': {e}"))
            })?;
            base.insert(name, value);
        }
        Ok(base)
    }

    /// Apply query, body and headers to a request.
    pub(crate) fn apply(
        &self,
        mut request: reqwest::RequestBuilder,
        base_headers: HeaderMap,
    ) -> Result<reqwest::RequestBuilder, AgentopiaError> {
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        if let Some(ref body) = self.json {
            request = request.json(body);
        }
        Ok(request.headers(self.merged_headers(base_headers)?))
    }
}

/// Ensure `path` starts with exactly one `/`.
pub fn normalize_endpoint_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}
