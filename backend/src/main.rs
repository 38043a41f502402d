//! Fleetbridge server binary.

use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use fleetbridge::{
    auth::AuthConfig, config::Config, create_app_with_config, fleet::FleetClient, state::AppState,
};

/// Fleetbridge - MCP bridge for a fleet-tracking API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Base URL of the upstream fleet-tracking API
    #[arg(long)]
    upstream_host: Option<String>,

    /// Bearer token for the upstream fleet-tracking API
    #[arg(long)]
    upstream_token: Option<String>,

    /// Shared secret required from connecting agents
    #[arg(long)]
    connector_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration first; a missing upstream host or token fails
    // fast here, before anything binds.
    let config = Config::from_figment(
        args.port,
        args.upstream_host,
        args.upstream_token,
        args.connector_token,
    )?;

    // Initialize logging - RUST_LOG wins over the configured level
    let default_level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    info!("Starting Fleetbridge server...");
    info!("Upstream fleet API: {}", config.upstream_host);

    let state = AppState::new(FleetClient::new(
        config.upstream_host.clone(),
        config.upstream_token.clone(),
    ));
    let auth_config = AuthConfig::new(config.connector_token.clone());
    let app = create_app_with_config(state, auth_config);

    // Bind to 0.0.0.0 to be accessible from all interfaces
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received Ctrl+C, shutting down gracefully...");
}
