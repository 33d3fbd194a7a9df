//! # cadet-server
//!
//! HTTP API for a flight-training school.
//!
//! This binary provides:
//! - **Session auth** with an HttpOnly cookie and student/instructor roles
//! - **REST API** (axum) over bookings, flight logs, milestones, dashboards
//!   and messages
//! - **In-memory store**, optionally seeded with a demo school at startup

mod api;
mod config;
mod error;
mod extract;
mod session;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadet_store::Store;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cadet_server=debug,cadet_store=debug")),
        )
        .init();

    info!("Starting Cadet server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Build the store
    // -----------------------------------------------------------------------
    let store = if config.seed_demo_data {
        Store::with_demo_data(Utc::now())?
    } else {
        Store::new()
    };

    let http_addr = config.http_addr;
    let app_state = AppState::new(store, config);

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------

    // Periodic session cleanup (every 10 minutes)
    let sessions = app_state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            sessions.purge_expired().await;
        }
    });

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
