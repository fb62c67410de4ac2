//! `planforge plan` — analyse a description and print the checklist.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use planforge_core::config::{load_config, Config};
use planforge_core::types::Plan;
use planforge_planner::{PlanSettings, Planner};
use planforge_providers::registry::find_by_name;
use planforge_providers::{CompletionBackend, RelayClient, RequestParams, VendorClient};

use crate::{helpers, repl};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Project description. Omit to enter descriptions interactively.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Provider name (claude, openai, xai, deepseek, custom)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model name (defaults to the provider's default)
    #[arg(long)]
    pub model: Option<String>,

    /// API key (defaults to the provider's environment variable)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Endpoint URL; required for the custom provider
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Send requests through a running relay (e.g. http://localhost:3001).
    /// The relay uses its own max_tokens and temperature.
    #[arg(long)]
    pub relay: Option<String>,

    /// Print the plan as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also write the plan as JSON to this file
    #[arg(short, long)]
    pub out: Option<String>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub logs: bool,
}

/// Run the plan command.
pub async fn run(args: PlanArgs) -> Result<()> {
    let config = load_config(None);
    let settings = build_settings(&args, &config, |name| std::env::var(name).ok())?;

    let relay_url = args.relay.clone().or_else(|| config.planner.relay_url.clone());
    let backend: Arc<dyn CompletionBackend> = match relay_url {
        Some(url) => {
            info!(relay = %url, "Using relay");
            Arc::new(relay_client(url, &config))
        }
        None => Arc::new(VendorClient::new(Duration::from_secs(
            config.relay.upstream_timeout_secs,
        ))),
    };
    let planner = Planner::new(backend);

    match args.message {
        Some(description) => {
            helpers::print_thinking();
            let result = planner.plan(&settings, &description).await;
            helpers::clear_thinking();
            let plan = result.context("planning failed")?;
            emit(&plan, args.json, args.out.as_deref())
        }
        None => repl::run(&planner, &settings, args.json, args.out.as_deref()).await,
    }
}

/// Relay client using the same upstream timeout as direct mode.
fn relay_client(url: String, config: &Config) -> RelayClient {
    RelayClient::with_timeout(url, Duration::from_secs(config.relay.upstream_timeout_secs))
}

/// Print a plan and optionally save it.
pub fn emit(plan: &Plan, json: bool, out: Option<&str>) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
    } else {
        helpers::print_plan(plan);
    }
    if let Some(out) = out {
        let path = helpers::expand_tilde(out);
        write_plan(plan, &path)?;
        helpers::print_saved(&path);
    }
    Ok(())
}

fn write_plan(plan: &Plan, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Merge flags, config, and environment into request settings.
///
/// Precedence: flag → `providers.<name>` in config → `planner` defaults.
/// `env` looks up environment variables (injected for tests).
pub fn build_settings(
    args: &PlanArgs,
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<PlanSettings> {
    let provider = args
        .provider
        .clone()
        .unwrap_or_else(|| config.planner.provider.clone());
    let overrides = config.providers.get_by_name(&provider);

    let custom_endpoint = args
        .endpoint
        .clone()
        .or_else(|| overrides.and_then(|c| c.api_base.clone()));

    if find_by_name(&provider).is_none() && custom_endpoint.is_none() {
        bail!(
            "Unknown provider '{provider}'. Run `planforge providers` for the list, \
             or pass --endpoint for an OpenAI-compatible API."
        );
    }

    let model = args
        .model
        .clone()
        .or_else(|| overrides.and_then(|c| c.model.clone()))
        .or_else(|| {
            (provider == config.planner.provider)
                .then(|| config.planner.model.clone())
                .flatten()
        });

    let api_key = resolve_api_key(args.api_key.as_deref(), &provider, env)?;

    Ok(PlanSettings {
        provider,
        model,
        api_key,
        custom_endpoint,
        params: RequestParams {
            max_tokens: config.planner.max_tokens,
            temperature: config.planner.temperature,
        },
    })
}

/// Environment variable holding the key for `provider`.
pub fn api_key_env(provider: &str) -> String {
    find_by_name(provider)
        .map(|spec| spec.env_key.to_string())
        .unwrap_or_else(|| format!("{}_API_KEY", provider.to_uppercase().replace('-', "_")))
}

/// `--api-key` wins; otherwise the provider's environment variable.
fn resolve_api_key(
    flag: Option<&str>,
    provider: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    if let Some(key) = flag.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    let var = api_key_env(provider);
    if let Some(key) = env(&var).filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }

    let hint = find_by_name(provider)
        .and_then(|spec| spec.console_url)
        .map(|url| format!(" Get one at {url}"))
        .unwrap_or_default();
    bail!("API Key is required: pass --api-key or set {var}.{hint}")
}
