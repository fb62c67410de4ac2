//! Configuration schema.
//!
//! Hierarchy: `Config` → `RelayConfig`, `PlannerConfig`, `ProvidersConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! API keys are deliberately absent: they come from the command line or the
//! environment and are never written to disk.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.planforge/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub relay: RelayConfig,
    pub planner: PlannerConfig,
    pub providers: ProvidersConfig,
}

// ─────────────────────────────────────────────
// Relay
// ─────────────────────────────────────────────

/// Relay server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Origins allowed by CORS. `"*"` mirrors whatever origin calls.
    pub allowed_origins: Vec<String>,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
    /// Timeout for the upstream vendor call, in seconds.
    pub upstream_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "*".to_string(),
            ],
            body_limit_bytes: 10 * 1024 * 1024,
            upstream_timeout_secs: 120,
        }
    }
}

impl RelayConfig {
    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// Planner
// ─────────────────────────────────────────────

/// Defaults for `planforge plan`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    /// Provider name from the registry (e.g. `"claude"`).
    pub provider: String,
    /// Model override. `None` uses the provider's default model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum tokens the model may generate.
    pub max_tokens: u32,
    /// Sampling temperature for OpenAI-compatible vendors.
    pub temperature: f64,
    /// Route calls through a running relay instead of calling vendors directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: "claude".to_string(),
            model: None,
            max_tokens: 4000,
            temperature: 0.1,
            relay_url: None,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Per-provider overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Endpoint override. Required for the `custom` provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Preferred model for this provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// All provider overrides, one per registry entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub claude: ProviderConfig,
    pub openai: ProviderConfig,
    pub xai: ProviderConfig,
    pub deepseek: ProviderConfig,
    pub custom: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by name (e.g. `"claude"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "claude" => Some(&self.claude),
            "openai" => Some(&self.openai),
            "xai" => Some(&self.xai),
            "deepseek" => Some(&self.deepseek),
            "custom" => Some(&self.custom),
            _ => None,
        }
    }

    /// Mutable lookup, used by env overrides.
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "claude" => Some(&mut self.claude),
            "openai" => Some(&mut self.openai),
            "xai" => Some(&mut self.xai),
            "deepseek" => Some(&mut self.deepseek),
            "custom" => Some(&mut self.custom),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
