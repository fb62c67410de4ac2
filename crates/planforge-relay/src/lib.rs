//! Same-origin relay for browser front-ends.
//!
//! Browsers cannot call most LLM vendors directly (CORS), so the planner UI
//! posts to this relay, which attaches the caller's key in the vendor's auth
//! shape and forwards the request.
//!
//! Routes:
//! - `POST /api/ai/{provider}` — forward a chat call
//! - `GET /health` — liveness plus the provider list
//! - `GET /api/providers` — provider names and endpoints

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::RelayError;
pub use router::{cors_layer, create_router};
pub use state::RelayState;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use planforge_core::config::{ProvidersConfig, RelayConfig};
use planforge_providers::registry::relayable;

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(relay: RelayConfig, providers: ProvidersConfig) -> std::io::Result<()> {
    let addr = relay.bind_addr();
    let app = create_router(RelayState::new(&relay, providers), &relay);

    let listener = TcpListener::bind(&addr).await?;
    let names: Vec<&str> = relayable().map(|spec| spec.name).collect();
    info!(
        addr = %addr,
        providers = %names.join(", "),
        "Relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
