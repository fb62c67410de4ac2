//! Vendor adapters — one per request/response dialect.
//!
//! An adapter knows three things about a vendor: how to authenticate, how to
//! shape the request body, and where the reply text sits in the response.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use planforge_core::types::Message;

use crate::error::ProviderError;
use crate::registry::AdapterKind;
use crate::traits::RequestParams;

/// Anthropic API version sent with every Messages API call.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Uniform interface over vendor dialects.
pub trait ProviderAdapter: Send + Sync {
    /// The dialect this adapter implements.
    fn kind(&self) -> AdapterKind;

    /// Headers carrying the user's key (plus any fixed vendor headers).
    fn authenticate(&self, api_key: &str) -> Result<HeaderMap, ProviderError>;

    /// JSON request body for a chat call.
    fn build_request(&self, model: &str, messages: &[Message], params: &RequestParams) -> Value;

    /// Extract the reply text from a successful response body.
    fn parse_response(&self, body: &Value) -> Result<String, ProviderError>;
}

/// Adapter for a dialect. Adapters are stateless, so one static instance each.
pub fn adapter_for(kind: AdapterKind) -> &'static dyn ProviderAdapter {
    match kind {
        AdapterKind::Anthropic => &AnthropicAdapter,
        AdapterKind::OpenAiCompatible => &OpenAiCompatibleAdapter,
    }
}

fn secret_header(name: &'static str, value: &str) -> Result<HeaderValue, ProviderError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| ProviderError::InvalidHeader(name))?;
    value.set_sensitive(true);
    Ok(value)
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

// ─────────────────────────────────────────────
// Anthropic
// ─────────────────────────────────────────────

/// Anthropic Messages API.
#[derive(Debug, Default)]
pub struct AnthropicAdapter;

impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Anthropic
    }

    fn authenticate(&self, api_key: &str) -> Result<HeaderMap, ProviderError> {
        let mut headers = json_headers();
        headers.insert("x-api-key", secret_header("x-api-key", api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }

    fn build_request(&self, model: &str, messages: &[Message], params: &RequestParams) -> Value {
        // System prompts go in a top-level field, not in the message list.
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| matches!(m, Message::System { .. }))
            .map(Message::content)
            .collect();
        let conversation: Vec<&Message> = messages
            .iter()
            .filter(|m| !matches!(m, Message::System { .. }))
            .collect();

        let mut body = json!({
            "model": model,
            "max_tokens": params.max_tokens,
            "messages": conversation,
        });
        if !system.is_empty() {
            body["system"] = json!(system.join("\n"));
        }
        body
    }

    fn parse_response(&self, body: &Value) -> Result<String, ProviderError> {
        let text: String = body
            .get("content")
            .and_then(Value::as_array)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|b| b.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
                    .filter_map(|b| b.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyReply);
        }
        Ok(text)
    }
}

// ─────────────────────────────────────────────
// OpenAI-compatible
// ─────────────────────────────────────────────

/// OpenAI chat completions, also spoken by xAI, DeepSeek, and most custom endpoints.
#[derive(Debug, Default)]
pub struct OpenAiCompatibleAdapter;

impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::OpenAiCompatible
    }

    fn authenticate(&self, api_key: &str) -> Result<HeaderMap, ProviderError> {
        let mut headers = json_headers();
        headers.insert(
            AUTHORIZATION,
            secret_header("authorization", &format!("Bearer {api_key}"))?,
        );
        Ok(headers)
    }

    fn build_request(&self, model: &str, messages: &[Message], params: &RequestParams) -> Value {
        json!({
            "model": model,
            "messages": messages,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        })
    }

    fn parse_response(&self, body: &Value) -> Result<String, ProviderError> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
            .ok_or(ProviderError::EmptyReply)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
