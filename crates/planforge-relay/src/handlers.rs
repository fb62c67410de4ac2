//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use planforge_core::types::Message;
use planforge_core::utils::timestamp;
use planforge_providers::registry::{relayable, resolve_model, resolve_route};
use planforge_providers::{adapter_for, RequestParams};

use crate::error::RelayError;
use crate::state::RelayState;

/// Validated body of `POST /api/ai/{provider}`.
#[derive(Debug)]
struct ProxyRequest<'a> {
    api_key: &'a str,
    model: Option<&'a str>,
    messages: Vec<Message>,
    custom_endpoint: Option<&'a str>,
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl<'a> ProxyRequest<'a> {
    fn from_body(body: &'a Value) -> Result<Self, RelayError> {
        let api_key = non_blank(body.get("apiKey"))
            .ok_or_else(|| RelayError::BadRequest("API Key is required".into()))?;

        let messages = match body.get("messages") {
            Some(list @ Value::Array(_)) => serde_json::from_value::<Vec<Message>>(list.clone())
                .map_err(|e| RelayError::BadRequest(format!("Invalid messages: {e}")))?,
            _ => return Err(RelayError::BadRequest("Messages array is required".into())),
        };

        Ok(Self {
            api_key,
            model: non_blank(body.get("model")),
            messages,
            custom_endpoint: non_blank(body.get("customEndpoint")),
        })
    }
}

/// `POST /api/ai/{provider}` — forward a chat call to the vendor.
///
/// Success returns the vendor JSON untouched; a vendor error keeps its status.
pub async fn proxy(
    State(state): State<RelayState>,
    Path(provider): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, RelayError> {
    let Json(body) = body?;
    let request = ProxyRequest::from_body(&body)?;

    info!(
        provider = %provider,
        model = request.model.unwrap_or("(default)"),
        messages = request.messages.len(),
        "AI request"
    );

    let overrides = state.overrides(&provider);
    let endpoint = request
        .custom_endpoint
        .or_else(|| overrides.and_then(|c| c.api_base.as_deref()));
    let route = resolve_route(&provider, endpoint)?;
    let model = resolve_model(
        &provider,
        route.spec,
        request
            .model
            .or_else(|| overrides.and_then(|c| c.model.as_deref())),
    )?;

    let upstream_body = adapter_for(route.adapter).build_request(
        &model,
        &request.messages,
        &RequestParams::default(),
    );
    let reply = state
        .client
        .forward(&route, request.api_key, &upstream_body)
        .await?;

    if !reply.is_success() {
        warn!(
            provider = %provider,
            model = %model,
            status = reply.status,
            "AI API error"
        );
        return Err(reply.into_error().into());
    }

    Ok(Json(reply.body))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    let providers: Vec<&str> = relayable().map(|spec| spec.name).collect();
    Json(json!({
        "status": "ok",
        "timestamp": timestamp(),
        "supportedProviders": providers,
    }))
}

/// `GET /api/providers` — provider names and the endpoint each forwards to.
pub async fn list_providers(State(state): State<RelayState>) -> Json<Value> {
    let mut configs = Map::new();
    let mut names = Vec::new();
    for spec in relayable() {
        let endpoint = state
            .overrides(spec.name)
            .and_then(|c| c.api_base.as_deref())
            .or(spec.endpoint);
        configs.insert(spec.name.to_string(), json!({ "endpoint": endpoint }));
        names.push(spec.name);
    }
    Json(json!({ "providers": names, "configs": configs }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_valid() {
        let body = json!({
            "apiKey": "sk-1",
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "hi"}],
            "customEndpoint": "  "
        });
        let req = ProxyRequest::from_body(&body).unwrap();
        assert_eq!(req.api_key, "sk-1");
        assert_eq!(req.model, Some("gpt-4o"));
        assert_eq!(req.messages, vec![Message::user("hi")]);
        assert_eq!(req.custom_endpoint, None);
    }

    #[test]
    fn test_from_body_key_checked_first() {
        let err = ProxyRequest::from_body(&json!({"messages": "nope"})).unwrap_err();
        assert_eq!(err.to_string(), "API Key is required");
    }

    #[test]
    fn test_from_body_bad_messages() {
        let err = ProxyRequest::from_body(&json!({"apiKey": "k", "messages": {"role": "user"}}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Messages array is required");

        let err = ProxyRequest::from_body(&json!({"apiKey": "k", "messages": [{"role": "robot", "content": "x"}]}))
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid messages:"));
    }
}
