//! Provider registry — the static dispatch table.
//!
//! Each `ProviderSpec` says where a vendor lives, which adapter shapes its
//! requests (auth headers + body), which models the UI offers, and where the
//! user's key is read from.

use crate::error::ProviderError;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Which request/response dialect a vendor speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    /// Anthropic Messages API (`x-api-key`, `content[].text`).
    Anthropic,
    /// OpenAI chat completions and compatible APIs (Bearer, `choices[0]`).
    OpenAiCompatible,
}

/// Static specification describing one LLM provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSpec {
    /// Internal name used in URLs and config (e.g. `"claude"`).
    pub name: &'static str,
    /// Human-readable name. E.g. `"Claude (Anthropic)"`.
    pub display_name: &'static str,
    /// Fixed endpoint. `None` means the caller must supply one.
    pub endpoint: Option<&'static str>,
    /// Request/response dialect.
    pub adapter: AdapterKind,
    /// Models offered for selection, most capable first.
    pub models: &'static [&'static str],
    /// Model used when the caller does not pick one.
    pub default_model: Option<&'static str>,
    /// Environment variable holding the API key.
    pub env_key: &'static str,
    /// What a key typically looks like, for prompts and placeholders.
    pub key_hint: &'static str,
    /// Where users obtain a key.
    pub console_url: Option<&'static str>,
}

impl ProviderSpec {
    /// Whether the relay can forward to this provider without a custom endpoint.
    pub fn is_relayable(&self) -> bool {
        self.endpoint.is_some()
    }
}

// ─────────────────────────────────────────────
// All providers
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "claude",
        display_name: "Claude (Anthropic)",
        endpoint: Some("https://api.anthropic.com/v1/messages"),
        adapter: AdapterKind::Anthropic,
        models: &[
            "claude-3-sonnet-20240229",
            "claude-3-opus-20240229",
            "claude-3-haiku-20240307",
        ],
        default_model: Some("claude-3-sonnet-20240229"),
        env_key: "ANTHROPIC_API_KEY",
        key_hint: "sk-ant-...",
        console_url: Some("https://console.anthropic.com/"),
    },
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        endpoint: Some("https://api.openai.com/v1/chat/completions"),
        adapter: AdapterKind::OpenAiCompatible,
        models: &["gpt-4-turbo-preview", "gpt-4", "gpt-3.5-turbo", "gpt-4o"],
        default_model: Some("gpt-4-turbo-preview"),
        env_key: "OPENAI_API_KEY",
        key_hint: "sk-...",
        console_url: Some("https://platform.openai.com/"),
    },
    ProviderSpec {
        name: "xai",
        display_name: "xAI (Grok)",
        endpoint: Some("https://api.x.ai/v1/chat/completions"),
        adapter: AdapterKind::OpenAiCompatible,
        models: &["grok-4-0709", "grok-3", "grok-3-latest"],
        default_model: Some("grok-3"),
        env_key: "XAI_API_KEY",
        key_hint: "xai-...",
        console_url: Some("https://console.x.ai/"),
    },
    ProviderSpec {
        name: "deepseek",
        display_name: "DeepSeek",
        endpoint: Some("https://api.deepseek.com/v1/chat/completions"),
        adapter: AdapterKind::OpenAiCompatible,
        models: &["deepseek-chat", "deepseek-coder"],
        default_model: Some("deepseek-chat"),
        env_key: "DEEPSEEK_API_KEY",
        key_hint: "sk-...",
        console_url: Some("https://platform.deepseek.com/"),
    },
    ProviderSpec {
        name: "custom",
        display_name: "Custom API",
        endpoint: None,
        adapter: AdapterKind::OpenAiCompatible,
        models: &[],
        default_model: None,
        env_key: "CUSTOM_API_KEY",
        key_hint: "your-api-key",
        console_url: None,
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Providers with a fixed endpoint, in table order.
pub fn relayable() -> impl Iterator<Item = &'static ProviderSpec> {
    PROVIDERS.iter().filter(|spec| spec.is_relayable())
}

// ─────────────────────────────────────────────
// Routing
// ─────────────────────────────────────────────

/// Where a request goes and how it is shaped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Provider name as requested by the caller.
    pub provider: String,
    /// Full URL the request is POSTed to.
    pub endpoint: String,
    /// Dialect used for auth, body, and response parsing.
    pub adapter: AdapterKind,
    /// Registry entry, if the provider is known.
    pub spec: Option<&'static ProviderSpec>,
}

impl Route {
    /// Display name for logs.
    pub fn display_name(&self) -> &str {
        self.spec.map_or(self.provider.as_str(), |s| s.display_name)
    }
}

/// Resolve a provider name and optional custom endpoint into a [`Route`].
///
/// Rules:
/// - A non-empty custom endpoint always wins over the table endpoint.
/// - An unknown provider is accepted only with a custom endpoint; it gets the
///   OpenAI-compatible dialect.
/// - `custom` without an endpoint is [`ProviderError::MissingEndpoint`].
pub fn resolve_route(
    provider: &str,
    custom_endpoint: Option<&str>,
) -> Result<Route, ProviderError> {
    let custom = custom_endpoint.map(str::trim).filter(|e| !e.is_empty());
    let spec = find_by_name(provider);

    match (spec, custom) {
        (Some(spec), Some(endpoint)) => Ok(Route {
            provider: provider.to_string(),
            endpoint: endpoint.to_string(),
            adapter: spec.adapter,
            spec: Some(spec),
        }),
        (Some(spec), None) => {
            let endpoint = spec
                .endpoint
                .ok_or_else(|| ProviderError::MissingEndpoint(provider.to_string()))?;
            Ok(Route {
                provider: provider.to_string(),
                endpoint: endpoint.to_string(),
                adapter: spec.adapter,
                spec: Some(spec),
            })
        }
        (None, Some(endpoint)) => Ok(Route {
            provider: provider.to_string(),
            endpoint: endpoint.to_string(),
            adapter: AdapterKind::OpenAiCompatible,
            spec: None,
        }),
        (None, None) => Err(ProviderError::UnsupportedProvider(provider.to_string())),
    }
}

/// Pick the model: the requested one if non-blank, else the provider default.
pub fn resolve_model(
    provider: &str,
    spec: Option<&ProviderSpec>,
    requested: Option<&str>,
) -> Result<String, ProviderError> {
    requested
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or_else(|| spec.and_then(|s| s.default_model))
        .map(String::from)
        .ok_or_else(|| ProviderError::MissingModel(provider.to_string()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name() {
        let spec = find_by_name("deepseek").unwrap();
        assert_eq!(spec.display_name, "DeepSeek");
        assert_eq!(spec.env_key, "DEEPSEEK_API_KEY");
        assert!(find_by_name("mistral").is_none());
    }

    #[test]
    fn test_claude_uses_anthropic_dialect() {
        let spec = find_by_name("claude").unwrap();
        assert_eq!(spec.adapter, AdapterKind::Anthropic);
        assert_eq!(spec.endpoint, Some("https://api.anthropic.com/v1/messages"));
    }

    #[test]
    fn test_default_models_are_selectable() {
        for spec in PROVIDERS.iter().filter(|s| s.default_model.is_some()) {
            let default = spec.default_model.unwrap();
            assert!(
                spec.models.contains(&default),
                "{} default {} not in its model list",
                spec.name,
                default
            );
        }
    }

    #[test]
    fn test_relayable_excludes_custom() {
        let names: Vec<&str> = relayable().map(|s| s.name).collect();
        assert_eq!(names, vec!["claude", "openai", "xai", "deepseek"]);
    }

    #[test]
    fn test_all_providers_have_unique_names() {
        let names: Vec<&str> = PROVIDERS.iter().map(|s| s.name).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "Duplicate provider names found");
    }

    // ── resolve_route ──

    #[test]
    fn test_route_known_provider() {
        let route = resolve_route("xai", None).unwrap();
        assert_eq!(route.endpoint, "https://api.x.ai/v1/chat/completions");
        assert_eq!(route.adapter, AdapterKind::OpenAiCompatible);
        assert_eq!(route.display_name(), "xAI (Grok)");
    }

    #[test]
    fn test_routes_compare_by_value() {
        let a = resolve_route("deepseek", None).unwrap();
        let b = resolve_route("deepseek", None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.spec, find_by_name("deepseek"));
        assert_ne!(a, resolve_route("deepseek", Some("http://localhost:9000")).unwrap());
    }

    #[test]
    fn test_route_custom_endpoint_overrides_table() {
        let route = resolve_route("claude", Some("http://localhost:9000/v1/messages")).unwrap();
        assert_eq!(route.endpoint, "http://localhost:9000/v1/messages");
        assert_eq!(route.adapter, AdapterKind::Anthropic);
    }

    #[test]
    fn test_route_blank_custom_endpoint_ignored() {
        let route = resolve_route("openai", Some("   ")).unwrap();
        assert_eq!(route.endpoint, "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_route_custom_requires_endpoint() {
        let err = resolve_route("custom", None).unwrap_err();
        assert!(matches!(err, ProviderError::MissingEndpoint(ref p) if p == "custom"));

        let route = resolve_route("custom", Some("https://llm.example.com/v1/chat")).unwrap();
        assert_eq!(route.endpoint, "https://llm.example.com/v1/chat");
        assert_eq!(route.adapter, AdapterKind::OpenAiCompatible);
    }

    #[test]
    fn test_route_unknown_provider() {
        let err = resolve_route("mistral", None).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported provider: mistral");

        let route = resolve_route("mistral", Some("https://api.mistral.ai/v1/chat/completions"))
            .unwrap();
        assert!(route.spec.is_none());
        assert_eq!(route.adapter, AdapterKind::OpenAiCompatible);
        assert_eq!(route.display_name(), "mistral");
    }

    // ── resolve_model ──

    #[test]
    fn test_resolve_model_requested_wins() {
        let spec = find_by_name("openai");
        assert_eq!(resolve_model("openai", spec, Some("gpt-4o")).unwrap(), "gpt-4o");
    }

    #[test]
    fn test_resolve_model_falls_back_to_default() {
        let spec = find_by_name("deepseek");
        assert_eq!(resolve_model("deepseek", spec, None).unwrap(), "deepseek-chat");
        assert_eq!(resolve_model("deepseek", spec, Some("  ")).unwrap(), "deepseek-chat");
    }

    #[test]
    fn test_resolve_model_custom_needs_model() {
        let spec = find_by_name("custom");
        let err = resolve_model("custom", spec, None).unwrap_err();
        assert!(matches!(err, ProviderError::MissingModel(_)));
    }
}
