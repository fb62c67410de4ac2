//! Client for a running Planforge relay.
//!
//! Posts `{apiKey, model, messages, customEndpoint}` to
//! `<relay>/api/ai/<provider>` and decodes the vendor body the relay passes
//! back with the provider's adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use planforge_core::types::Message;

use crate::adapter::adapter_for;
use crate::error::ProviderError;
use crate::http_provider::DEFAULT_TIMEOUT;
use crate::registry::{find_by_name, AdapterKind};
use crate::traits::{CompletionBackend, CompletionRequest, RequestParams};

/// Wire body of `POST /api/ai/{provider}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
    api_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_endpoint: Option<&'a str>,
}

pub struct RelayClient {
    client: reqwest::Client,
    /// Relay origin, without a trailing slash (e.g. `"http://localhost:3001"`).
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        RelayClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL for one provider.
    pub fn endpoint_for(&self, provider: &str) -> String {
        format!("{}/api/ai/{}", self.base_url, provider)
    }
}

/// The relay wire body has no sampling fields, so only the defaults survive.
fn forwards_params(params: &RequestParams) -> bool {
    *params == RequestParams::default()
}

#[async_trait]
impl CompletionBackend for RelayClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        request.ensure_api_key()?;

        // Unknown providers reach the relay only with a custom endpoint, which
        // it treats as OpenAI-compatible.
        let kind = find_by_name(&request.provider).map_or(AdapterKind::OpenAiCompatible, |s| s.adapter);
        let url = self.endpoint_for(&request.provider);

        let body = RelayRequest {
            api_key: &request.api_key,
            model: request.model.as_deref().filter(|m| !m.trim().is_empty()),
            messages: &request.messages,
            custom_endpoint: request
                .custom_endpoint
                .as_deref()
                .filter(|e| !e.trim().is_empty()),
        };

        if !forwards_params(&request.params) {
            debug!(
                max_tokens = request.params.max_tokens,
                temperature = request.params.temperature,
                "Relay applies its own sampling parameters; configured values are not sent"
            );
        }

        debug!(
            provider = %request.provider,
            relay = %self.base_url,
            messages = request.messages.len(),
            "Calling relay"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(relay = %self.base_url, error = %e, "Relay unreachable");
                ProviderError::Unreachable {
                    url: self.base_url.clone(),
                    source: e,
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ProviderError::Unreachable {
            url: self.base_url.clone(),
            source: e,
        })?;

        if !status.is_success() {
            // Proxies in front of the relay may answer with HTML or an empty body.
            let payload = serde_json::from_str::<Value>(&text).ok();
            let message = payload
                .as_ref()
                .and_then(|p| p.get("error"))
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| {
                    format!("AI API Error: {}", status.canonical_reason().unwrap_or("Unknown status"))
                });
            error!(provider = %request.provider, status = status.as_u16(), error = %message, "Relay returned an error");
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
                details: payload.and_then(|p| p.get("details").cloned()),
            });
        }

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(format!("relay body is not JSON ({e})")))?;

        adapter_for(kind).parse_response(&payload)
    }

    fn display_name(&self) -> &str {
        &self.base_url
    }
}
