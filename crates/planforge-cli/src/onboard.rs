//! `planforge onboard` — write the default configuration.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use planforge_core::config::{get_config_path, save_config, Config};
use planforge_core::utils::get_history_path;
use planforge_providers::registry::PROVIDERS;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "Planforge — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    if let Some(history_dir) = get_history_path().parent() {
        std::fs::create_dir_all(history_dir)
            .with_context(|| format!("failed to create {}", history_dir.display()))?;
    }

    println!();
    println!("  API keys are read from the environment (or a .env file):");
    for spec in PROVIDERS {
        println!("    {:<20} {}", spec.env_key, spec.display_name.dimmed());
    }
    println!();
    println!(
        "{}",
        "  Setup complete! Run `planforge plan` to plan a project.".green()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` unless a file already exists. Returns whether it wrote.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(write_default_config(&path).unwrap());
        let written: Config = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.relay.port, 3001);
        assert_eq!(written.planner.provider, "claude");

        std::fs::write(&path, r#"{"relay": {"port": 4100}}"#).unwrap();
        assert!(!write_default_config(&path).unwrap());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("4100"));
    }
}
