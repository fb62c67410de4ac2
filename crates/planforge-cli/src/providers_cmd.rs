//! `planforge providers` — print the provider dispatch table.

use anyhow::Result;
use colored::Colorize;

use planforge_providers::registry::{AdapterKind, PROVIDERS};

pub fn run() -> Result<()> {
    println!();
    println!("{}", "Supported providers".cyan().bold());

    for spec in PROVIDERS {
        println!();
        println!("  {} {}", spec.name.bold(), format!("({})", spec.display_name).dimmed());
        println!(
            "    {:<14} {}",
            "Endpoint:",
            spec.endpoint.unwrap_or("(set with --endpoint or providers.custom.apiBase)")
        );
        println!("    {:<14} {}", "Format:", adapter_label(spec.adapter));
        if !spec.models.is_empty() {
            let default = spec.default_model.unwrap_or_default();
            let models: Vec<String> = spec
                .models
                .iter()
                .map(|m| {
                    if *m == default {
                        format!("{m} (default)")
                    } else {
                        m.to_string()
                    }
                })
                .collect();
            println!("    {:<14} {}", "Models:", models.join(", "));
        }
        println!("    {:<14} {} ({})", "API key:", spec.env_key, spec.key_hint.dimmed());
        if let Some(url) = spec.console_url {
            println!("    {:<14} {}", "Console:", url);
        }
    }
    println!();

    Ok(())
}

fn adapter_label(kind: AdapterKind) -> &'static str {
    match kind {
        AdapterKind::Anthropic => "Anthropic Messages API",
        AdapterKind::OpenAiCompatible => "OpenAI-compatible chat completions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_labels() {
        assert_eq!(adapter_label(AdapterKind::Anthropic), "Anthropic Messages API");
        assert!(adapter_label(AdapterKind::OpenAiCompatible).contains("OpenAI"));
    }
}
