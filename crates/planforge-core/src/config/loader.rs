//! Config loader — reads `~/.planforge/config.json`, merges env vars, and
//! strips fields that must never live on disk.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.planforge/config.json`
//! 3. Environment variables `PLANFORGE_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Provider names that accept `PLANFORGE_PROVIDERS__<NAME>__*` overrides.
const PROVIDER_NAMES: &[&str] = &["claude", "openai", "xai", "deepseek", "custom"];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let mut raw: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    strip_secrets(&mut raw);

    let config: Config = match serde_json::from_value(raw) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to deserialize config: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Drop `providers.<name>.apiKey` entries a hand-edited file may carry.
///
/// Keys are read from the environment only.
fn strip_secrets(raw: &mut serde_json::Value) {
    let Some(providers) = raw.get_mut("providers").and_then(|p| p.as_object_mut()) else {
        return;
    };
    for (name, entry) in providers.iter_mut() {
        if let Some(obj) = entry.as_object_mut() {
            if obj.remove("apiKey").is_some() {
                warn!(
                    provider = %name,
                    "Ignoring apiKey in config file; set it in the environment instead"
                );
            }
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `PLANFORGE_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `PLANFORGE_RELAY__HOST` → `relay.host`
/// - `PLANFORGE_RELAY__PORT` → `relay.port` (`PORT` is honoured when this is unset)
/// - `PLANFORGE_RELAY__ALLOWED_ORIGINS` → `relay.allowed_origins` (comma separated)
/// - `PLANFORGE_RELAY__BODY_LIMIT_BYTES` → `relay.body_limit_bytes`
/// - `PLANFORGE_RELAY__UPSTREAM_TIMEOUT_SECS` → `relay.upstream_timeout_secs`
/// - `PLANFORGE_PLANNER__PROVIDER` → `planner.provider`
/// - `PLANFORGE_PLANNER__MODEL` → `planner.model`
/// - `PLANFORGE_PLANNER__MAX_TOKENS` → `planner.max_tokens`
/// - `PLANFORGE_PLANNER__TEMPERATURE` → `planner.temperature`
/// - `PLANFORGE_PLANNER__RELAY_URL` → `planner.relay_url`
/// - `PLANFORGE_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `PLANFORGE_PROVIDERS__<NAME>__MODEL` → `providers.<name>.model`
fn apply_env_overrides(mut config: Config) -> Config {
    // Relay
    if let Ok(val) = std::env::var("PLANFORGE_RELAY__HOST") {
        config.relay.host = val;
    }
    let port = std::env::var("PLANFORGE_RELAY__PORT").or_else(|_| std::env::var("PORT"));
    if let Ok(val) = port {
        if let Ok(p) = val.parse::<u16>() {
            config.relay.port = p;
        }
    }
    if let Ok(val) = std::env::var("PLANFORGE_RELAY__ALLOWED_ORIGINS") {
        config.relay.allowed_origins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("PLANFORGE_RELAY__BODY_LIMIT_BYTES") {
        if let Ok(n) = val.parse::<usize>() {
            config.relay.body_limit_bytes = n;
        }
    }
    if let Ok(val) = std::env::var("PLANFORGE_RELAY__UPSTREAM_TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.relay.upstream_timeout_secs = n;
        }
    }

    // Planner
    if let Ok(val) = std::env::var("PLANFORGE_PLANNER__PROVIDER") {
        config.planner.provider = val;
    }
    if let Ok(val) = std::env::var("PLANFORGE_PLANNER__MODEL") {
        config.planner.model = Some(val);
    }
    if let Ok(val) = std::env::var("PLANFORGE_PLANNER__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.planner.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("PLANFORGE_PLANNER__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.planner.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("PLANFORGE_PLANNER__RELAY_URL") {
        config.planner.relay_url = Some(val);
    }

    // Providers
    for name in PROVIDER_NAMES {
        apply_provider_env(&mut config, name);
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(config: &mut Config, name: &str) {
    let upper = name.to_uppercase();
    let Some(provider) = config.providers.get_by_name_mut(name) else {
        return;
    };
    if let Ok(val) = std::env::var(format!("PLANFORGE_PROVIDERS__{upper}__API_BASE")) {
        provider.api_base = Some(val);
    }
    if let Ok(val) = std::env::var(format!("PLANFORGE_PROVIDERS__{upper}__MODEL")) {
        provider.model = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
