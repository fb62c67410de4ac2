//! `planforge status` — show configuration and API key status.

use anyhow::Result;
use colored::Colorize;

use planforge_core::config::{get_config_path, load_config};
use planforge_core::utils::mask_secret;
use planforge_providers::registry::PROVIDERS;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "Planforge Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );
    println!(
        "  {:<18} http://{}",
        "Relay address:".bold(),
        config.relay.bind_addr()
    );
    println!(
        "  {:<18} {}",
        "CORS origins:".bold(),
        config.relay.allowed_origins.join(", ")
    );
    println!(
        "  {:<18} {}",
        "Default provider:".bold(),
        config.planner.provider
    );
    println!(
        "  {:<18} {}",
        "Mode:".bold(),
        match &config.planner.relay_url {
            Some(url) => format!("via relay {url}"),
            None => "direct".to_string(),
        }
    );
    println!(
        "  {:<18} {} | max_tokens: {}",
        "Parameters:".bold(),
        format!("temp: {}", config.planner.temperature).dimmed(),
        format!("{}", config.planner.max_tokens).dimmed(),
    );

    println!();
    println!("  {}", "API keys:".bold());
    for spec in PROVIDERS {
        let status = key_status(std::env::var(spec.env_key).ok().as_deref());
        println!("    {:<20} {:<20} {}", spec.display_name, spec.env_key.dimmed(), status);
    }
    println!();

    Ok(())
}

fn key_status(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(key) => format!("{} {}", "✓".green(), mask_secret(key)),
        None => format!("{}", "· not set".dimmed()),
    }
}
