//! Router assembly: routes, body limit, CORS, and request tracing.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use planforge_core::config::RelayConfig;

use crate::handlers;
use crate::state::RelayState;

/// Build the relay router with CORS, body limit, and request tracing.
pub fn create_router(state: RelayState, config: &RelayConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/providers", get(handlers::list_providers))
        .route("/api/ai/{provider}", post(handlers::proxy))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins. A `"*"` entry mirrors the caller's
/// origin, since a literal wildcard cannot be combined with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::mirror_request()
    } else {
        let list: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use planforge_core::config::{ProviderConfig, ProvidersConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app() -> Router {
        app_with(RelayConfig::default(), ProvidersConfig::default())
    }

    fn app_with(config: RelayConfig, providers: ProvidersConfig) -> Router {
        create_router(RelayState::new(&config, providers), &config)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn user_messages() -> Value {
        json!([{"role": "user", "content": "Plan a habit tracker"}])
    }

    // ── info endpoints ──

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
        assert_eq!(
            body["supportedProviders"],
            json!(["claude", "openai", "xai", "deepseek"])
        );
    }

    #[tokio::test]
    async fn test_list_providers() {
        let (status, body) = send(app(), get_request("/api/providers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["providers"].as_array().unwrap().len(), 4);
        assert_eq!(
            body["configs"]["claude"]["endpoint"],
            "https://api.anthropic.com/v1/messages"
        );
        assert!(body["configs"].get("custom").is_none());
    }

    // ── validation ──

    #[tokio::test]
    async fn test_missing_api_key() {
        let (status, body) = send(
            app(),
            post_json("/api/ai/openai", &json!({"messages": user_messages()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "API Key is required"}));
    }

    #[tokio::test]
    async fn test_messages_required() {
        let (status, body) = send(
            app(),
            post_json("/api/ai/openai", &json!({"apiKey": "sk-1", "messages": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Messages array is required"}));
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let (status, body) = send(
            app(),
            post_json(
                "/api/ai/mistral",
                &json!({"apiKey": "sk-1", "messages": user_messages()}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Unsupported provider: mistral"}));
    }

    #[tokio::test]
    async fn test_custom_needs_endpoint() {
        let (status, body) = send(
            app(),
            post_json(
                "/api/ai/custom",
                &json!({"apiKey": "sk-1", "model": "m", "messages": user_messages()}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Provider 'custom' needs an endpoint URL");
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ai/openai")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let config = RelayConfig {
            body_limit_bytes: 64,
            ..Default::default()
        };
        let big = json!({"apiKey": "sk-1", "messages": [{"role": "user", "content": "x".repeat(500)}]});
        let (status, _) = send(
            app_with(config, ProvidersConfig::default()),
            post_json("/api/ai/openai", &big),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    // ── forwarding ──

    #[tokio::test]
    async fn test_forward_success_verbatim() {
        let server = MockServer::start().await;
        let vendor_body = json!({
            "id": "chatcmpl-1",
            "choices": [{"message": {"role": "assistant", "content": "{}"}}]
        });
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-1"))
            .and(body_partial_json(json!({
                "model": "gpt-4-turbo-preview",
                "max_tokens": 4000,
                "temperature": 0.1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(vendor_body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let (status, body) = send(
            app(),
            post_json(
                "/api/ai/openai",
                &json!({
                    "apiKey": "sk-1",
                    "messages": user_messages(),
                    "customEndpoint": format!("{}/v1/chat/completions", server.uri())
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, vendor_body);
    }

    #[tokio::test]
    async fn test_forward_claude_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-api-key", "sk-ant-1"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({"model": "claude-3-haiku-20240307", "max_tokens": 4000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
            .expect(1)
            .mount(&server)
            .await;

        let (status, _) = send(
            app(),
            post_json(
                "/api/ai/claude",
                &json!({
                    "apiKey": "sk-ant-1",
                    "model": "claude-3-haiku-20240307",
                    "messages": user_messages(),
                    "customEndpoint": server.uri()
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forward_upstream_error() {
        let server = MockServer::start().await;
        let vendor_error = json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}});
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(vendor_error.clone()))
            .mount(&server)
            .await;

        let (status, body) = send(
            app(),
            post_json(
                "/api/ai/deepseek",
                &json!({"apiKey": "sk-bad", "messages": user_messages(), "customEndpoint": server.uri()}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Incorrect API key provided");
        assert_eq!(body["details"], vendor_error);
    }

    #[tokio::test]
    async fn test_forward_transport_failure() {
        let (status, body) = send(
            app(),
            post_json(
                "/api/ai/openai",
                &json!({
                    "apiKey": "sk-1",
                    "messages": user_messages(),
                    "customEndpoint": "http://127.0.0.1:1/v1/chat/completions"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal proxy error");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_config_overrides_endpoint_and_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/llm"))
            .and(body_partial_json(json!({"model": "local-7b"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let providers = ProvidersConfig {
            custom: ProviderConfig {
                api_base: Some(format!("{}/llm", server.uri())),
                model: Some("local-7b".into()),
            },
            ..Default::default()
        };
        let (status, body) = send(
            app_with(RelayConfig::default(), providers),
            post_json(
                "/api/ai/custom",
                &json!({"apiKey": "k", "messages": user_messages()}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }

    // ── CORS ──

    #[tokio::test]
    async fn test_cors_wildcard_mirrors_origin() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/ai/claude")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "http://localhost:5173"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_cors_explicit_list() {
        let config = RelayConfig {
            allowed_origins: vec!["http://localhost:3000".into()],
            ..Default::default()
        };
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app_with(config.clone(), ProvidersConfig::default())
            .oneshot(request)
            .await
            .unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());

        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app_with(config, ProvidersConfig::default())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }
}
