//! Service records and the payloads that create or modify them.
//!
//! - [`Service`]: the server's canonical representation (create, fetch, search)
//! - [`NewService`]: registration payload
//! - [`ServiceUpdate`] / [`ServicePathUpdate`]: partial updates where only the
//!   fields that were set are serialized

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::{AgentopiaError, UsdcAmount};

fn default_true() -> bool {
    true
}

/// A registered service as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub slug: String,
    pub default_hold_amount: UsdcAmount,
    pub default_hold_expires_in: u64,
    #[serde(default)]
    pub app_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub readme_url: Option<String>,
    #[serde(default)]
    pub api_schema_url: Option<String>,
    /// Inline OpenAPI document, when the provider uploaded one.
    #[serde(default)]
    pub api_schema: Option<serde_json::Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub service_provider_id: Address,
    #[serde(default)]
    pub is_public: bool,
}

impl Service {
    /// Checks a decoded record must pass on top of its shape: a non-empty
    /// slug and a positive default expiry.
    pub fn validate(&self) -> Result<(), AgentopiaError> {
        if self.slug.is_empty() {
            return Err(AgentopiaError::Validation(
                "service: slug is empty".to_string(),
            ));
        }
        if self.default_hold_expires_in == 0 {
            return Err(AgentopiaError::Validation(format!(
                "service '{}': default_hold_expires_in must be positive",
                self.slug
            )));
        }
        Ok(())
    }
}

/// Registration payload for `POST /v1/service`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub slug: String,
    pub initial_hold_amount: UsdcAmount,
    pub initial_hold_expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_schema_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_schema: Option<serde_json::Value>,
    #[serde(skip)]
    pub tags: Vec<String>,
}

/// Wire envelope: `{"service": {...}, "tags": [...]}`.
#[derive(Debug, Serialize)]
pub struct RegisterServiceRequest<'a> {
    pub service: &'a NewService,
    pub tags: &'a [String],
}

impl NewService {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        base_url: impl Into<String>,
        slug: impl Into<String>,
        initial_hold_amount: UsdcAmount,
        initial_hold_expires_in: u64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            base_url: base_url.into(),
            slug: slug.into(),
            initial_hold_amount,
            initial_hold_expires_in,
            app_url: None,
            logo_url: None,
            readme_url: None,
            api_schema_url: None,
            api_schema: None,
            tags: Vec::new(),
        }
    }

    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = Some(url.into());
        self
    }

    pub fn logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn readme_url(mut self, url: impl Into<String>) -> Self {
        self.readme_url = Some(url.into());
        self
    }

    pub fn api_schema_url(mut self, url: impl Into<String>) -> Self {
        self.api_schema_url = Some(url.into());
        self
    }

    /// Upload the OpenAPI document inline instead of (or as well as) by URL.
    pub fn api_schema(mut self, schema: serde_json::Value) -> Self {
        self.api_schema = Some(schema);
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Client-side checks that need no round-trip. Slug uniqueness is left
    /// to the server.
    pub fn validate(&self) -> Result<(), AgentopiaError> {
        validate_slug(&self.slug)?;
        validate_base_url(&self.base_url)?;
        if self.initial_hold_expires_in == 0 {
            return Err(AgentopiaError::InvalidArgument(
                "initial_hold_expires_in must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_body(&self) -> RegisterServiceRequest<'_> {
        RegisterServiceRequest {
            service: self,
            tags: &self.tags,
        }
    }
}

/// Partial update for `PUT /v1/service/{slug}`. Unset fields are left out of
/// the payload entirely so the server keeps its current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_hold_amount: Option<UsdcAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_hold_expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_schema_url: Option<String>,
    #[serde(skip)]
    pub tags: Option<Vec<String>>,
}

/// Wire envelope: `service` is always present, `tags` only when supplied.
#[derive(Debug, Serialize)]
pub struct UpdateServiceRequest<'a> {
    pub service: &'a ServiceUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
}

impl ServiceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn initial_hold_amount(mut self, amount: UsdcAmount) -> Self {
        self.initial_hold_amount = Some(amount);
        self
    }

    pub fn initial_hold_expires_in(mut self, seconds: u64) -> Self {
        self.initial_hold_expires_in = Some(seconds);
        self
    }

    pub fn is_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = Some(url.into());
        self
    }

    pub fn logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn readme_url(mut self, url: impl Into<String>) -> Self {
        self.readme_url = Some(url.into());
        self
    }

    pub fn api_schema_url(mut self, url: impl Into<String>) -> Self {
        self.api_schema_url = Some(url.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<(), AgentopiaError> {
        if let Some(ref base_url) = self.base_url {
            validate_base_url(base_url)?;
        }
        if self.initial_hold_expires_in == Some(0) {
            return Err(AgentopiaError::InvalidArgument(
                "initial_hold_expires_in must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_body(&self) -> UpdateServiceRequest<'_> {
        UpdateServiceRequest {
            service: self,
            tags: self.tags.as_deref(),
        }
    }
}

/// Billing override for one `(method, path)` pair of a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServicePathUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_amount: Option<UsdcAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateServicePathRequest<'a> {
    pub service_path: &'a ServicePathUpdate,
}

impl ServicePathUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold_amount(mut self, amount: UsdcAmount) -> Self {
        self.hold_amount = Some(amount);
        self
    }

    pub fn hold_expires_in(mut self, seconds: u64) -> Self {
        self.hold_expires_in = Some(seconds);
        self
    }

    pub fn request_body(&self) -> UpdateServicePathRequest<'_> {
        UpdateServicePathRequest { service_path: self }
    }
}

/// Validate slug format: non-empty, URL-safe unreserved characters only.
pub fn validate_slug(slug: &str) -> Result<(), AgentopiaError> {
    if slug.is_empty() {
        return Err(AgentopiaError::InvalidArgument(
            "slug cannot be empty".to_string(),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    {
        return Err(AgentopiaError::InvalidArgument(format!(
            "slug '{slug}' must contain only alphanumerics, '-', '_', '.' or '~'"
        )));
    }
    Ok(())
}

/// Validate a service origin: absolute http(s) URL with a host.
pub fn validate_base_url(base_url: &str) -> Result<(), AgentopiaError> {
    let parsed = Url::parse(base_url)
        .map_err(|e| AgentopiaError::InvalidArgument(format!("base_url '{base_url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AgentopiaError::InvalidArgument(format!(
            "base_url '{base_url}' must use http or https"
        )));
    }
    if parsed.host().is_none() {
        return Err(AgentopiaError::InvalidArgument(format!(
            "base_url '{base_url}' must have a host"
        )));
    }
    Ok(())
}
