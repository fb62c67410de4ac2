//! The completion backend trait — what the planner calls.
//!
//! Two implementations exist: [`crate::VendorClient`] talks to vendors directly,
//! [`crate::RelayClient`] goes through a running relay.

use async_trait::async_trait;
use planforge_core::types::Message;

use crate::error::ProviderError;

/// Sampling parameters attached to every vendor request.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestParams {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature. Only OpenAI-compatible vendors receive it.
    pub temperature: f64,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            temperature: 0.1,
        }
    }
}

/// One completion call, before routing.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    /// Provider name from the registry, or any name when `custom_endpoint` is set.
    pub provider: String,
    /// Model override. `None` uses the provider's default.
    pub model: Option<String>,
    /// User-supplied key, forwarded to the vendor.
    pub api_key: String,
    /// Endpoint override.
    pub custom_endpoint: Option<String>,
    pub messages: Vec<Message>,
    pub params: RequestParams,
}

impl CompletionRequest {
    /// Fail fast on a blank key, before any network I/O.
    pub fn ensure_api_key(&self) -> Result<(), ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        Ok(())
    }
}

/// Anything that turns a [`CompletionRequest`] into reply text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the request and return the model's text reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str) -> CompletionRequest {
        CompletionRequest {
            provider: "openai".into(),
            model: None,
            api_key: key.into(),
            custom_endpoint: None,
            messages: vec![Message::user("hi")],
            params: RequestParams::default(),
        }
    }

    #[test]
    fn test_default_params() {
        let params = RequestParams::default();
        assert_eq!(params.max_tokens, 4000);
        assert_eq!(params.temperature, 0.1);
    }

    #[test]
    fn test_ensure_api_key() {
        assert!(request("sk-123").ensure_api_key().is_ok());
        assert!(matches!(
            request("  ").ensure_api_key(),
            Err(ProviderError::MissingApiKey)
        ));
    }
}
