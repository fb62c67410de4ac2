//! Planforge CLI — entry point.
//!
//! # Commands
//!
//! - `planforge plan [-m DESCRIPTION]` — analyse a project and print the checklist
//! - `planforge relay` — run the same-origin relay for browser front-ends
//! - `planforge providers` — list supported LLM vendors
//! - `planforge status` — show configuration and API key status
//! - `planforge onboard` — write the default config

mod helpers;
mod onboard;
mod plan_cmd;
mod providers_cmd;
mod repl;
mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use planforge_core::config::load_config;
use planforge_providers::registry::relayable;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Planforge — turn a project idea into a phased development plan
#[derive(Parser)]
#[command(name = "planforge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a project description and print a development checklist
    Plan(plan_cmd::PlanArgs),

    /// Run the relay that forwards browser requests to LLM vendors
    Relay {
        /// Listen address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List supported providers, endpoints, and models
    Providers,

    /// Show configuration and API key status
    Status,

    /// Write the default configuration file
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => {
            init_logging(args.logs, "warn");
            plan_cmd::run(args).await
        }
        Commands::Relay { host, port, logs } => {
            init_logging(logs, "info");
            run_relay(host, port).await
        }
        Commands::Providers => providers_cmd::run(),
        Commands::Status => status::run(),
        Commands::Onboard => onboard::run(),
    }
}

// ─────────────────────────────────────────────
// Relay command
// ─────────────────────────────────────────────

async fn run_relay(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(None);
    if let Some(host) = host {
        config.relay.host = host;
    }
    if let Some(port) = port {
        config.relay.port = port;
    }

    let base = format!("http://{}", config.relay.bind_addr());
    let names: Vec<&str> = relayable().map(|spec| spec.name).collect();

    println!();
    println!("{}", "Planforge relay".cyan().bold());
    println!("  {:<14} {}", "Address:".bold(), base);
    println!("  {:<14} {}/health", "Health:".bold(), base);
    println!("  {:<14} {}", "Providers:".bold(), names.join(", "));
    println!("  {:<14} POST {}/api/ai/<provider>", "Usage:".bold(), base);
    println!();

    planforge_relay::serve(config.relay, config.providers)
        .await
        .context("relay server failed")
}

/// Initialize tracing/logging.
///
/// `--logs` turns on debug output for Planforge crates; otherwise `RUST_LOG`
/// wins when set, falling back to `default`.
fn init_logging(verbose: bool, default: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("planforge=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
