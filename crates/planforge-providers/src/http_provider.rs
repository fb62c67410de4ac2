//! Direct vendor client — one pooled `reqwest::Client` for every provider.
//!
//! The relay uses [`VendorClient::forward`] to pass a vendor's reply through
//! unchanged; the CLI uses [`VendorClient`] as a [`CompletionBackend`] when
//! no relay is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error};

use crate::adapter::adapter_for;
use crate::error::ProviderError;
use crate::registry::{resolve_model, resolve_route, Route};
use crate::traits::{CompletionBackend, CompletionRequest};

/// Default upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Raw upstream reply: status plus decoded JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct VendorReply {
    pub status: u16,
    pub body: Value,
}

impl VendorReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx reply into [`ProviderError::Upstream`].
    pub fn into_error(self) -> ProviderError {
        upstream_error(self.status, self.body)
    }
}

/// Build an [`ProviderError::Upstream`] from a vendor error body.
///
/// The message is `error.message` (or a bare string `error`) when present,
/// otherwise `AI API Error: <canonical reason>`.
pub fn upstream_error(status: u16, body: Value) -> ProviderError {
    let message = body
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .map(String::from)
        .unwrap_or_else(|| {
            let reason = StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown status");
            format!("AI API Error: {reason}")
        });

    ProviderError::Upstream {
        status,
        message,
        details: Some(body),
    }
}

// ─────────────────────────────────────────────
// VendorClient
// ─────────────────────────────────────────────

/// Talks to vendor APIs directly.
#[derive(Clone)]
pub struct VendorClient {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    timeout: Duration,
}

impl std::fmt::Debug for VendorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorClient")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for VendorClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl VendorClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        VendorClient { client, timeout }
    }

    /// POST `body` to the route's endpoint with the adapter's auth headers.
    ///
    /// Any status is returned as-is; only transport failures and non-JSON
    /// bodies are errors.
    pub async fn forward(
        &self,
        route: &Route,
        api_key: &str,
        body: &Value,
    ) -> Result<VendorReply, ProviderError> {
        let headers = adapter_for(route.adapter).authenticate(api_key)?;

        let response = self
            .client
            .post(&route.endpoint)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = route.display_name(), error = %e, "HTTP request failed");
                ProviderError::Http {
                    endpoint: route.endpoint.clone(),
                    source: e,
                }
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ProviderError::Http {
            endpoint: route.endpoint.clone(),
            source: e,
        })?;

        let body = serde_json::from_str::<Value>(&text).map_err(|e| {
            error!(
                provider = route.display_name(),
                status,
                error = %e,
                "Upstream returned a non-JSON body"
            );
            ProviderError::MalformedResponse(format!("upstream body is not JSON ({e})"))
        })?;

        Ok(VendorReply { status, body })
    }
}

#[async_trait]
impl CompletionBackend for VendorClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        request.ensure_api_key()?;

        let route = resolve_route(&request.provider, request.custom_endpoint.as_deref())?;
        let model = resolve_model(&request.provider, route.spec, request.model.as_deref())?;
        let adapter = adapter_for(route.adapter);

        debug!(
            provider = route.display_name(),
            model = %model,
            messages = request.messages.len(),
            "Calling vendor"
        );

        let body = adapter.build_request(&model, &request.messages, &request.params);
        let reply = self.forward(&route, &request.api_key, &body).await?;

        if !reply.is_success() {
            error!(
                provider = route.display_name(),
                status = reply.status,
                "API error"
            );
            return Err(reply.into_error());
        }

        let text = adapter.parse_response(&reply.body)?;
        debug!(
            provider = route.display_name(),
            chars = text.len(),
            "Vendor reply received"
        );
        Ok(text)
    }

    fn display_name(&self) -> &str {
        "direct"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
