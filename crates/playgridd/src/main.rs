//! playgridd — the playgrid daemon.
//!
//! Loads `playgrid.toml`, builds the fabric clients, brings up one warm
//! session pool per configured game, and serves the REST API until a
//! shutdown signal arrives.
//!
//! # Usage
//!
//! ```text
//! playgridd serve --config /etc/playgrid/playgrid.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use playgrid_core::ServiceConfig;
use playgrid_fabric::{Fabric, FabricClient, GatewayClient, ManagementClient};
use playgrid_fleet::FleetSupervisor;

#[derive(Parser)]
#[command(name = "playgridd", about = "Playgrid session pool daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the orchestrator and its REST API.
    Serve {
        /// Path to the configuration file.
        #[arg(long, default_value = "playgrid.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,playgridd=debug,playgrid=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config } => serve(config).await,
    }
}

async fn serve(config_path: PathBuf) -> anyhow::Result<()> {
    info!(path = ?config_path, "playgrid daemon starting");

    let config = ServiceConfig::from_file(&config_path)?;

    // ── Fabric clients ─────────────────────────────────────────
    let gateway = GatewayClient::new(
        config.fabric.gateway_address.clone(),
        config.fabric.api_token.clone(),
    )?;
    let management = ManagementClient::new(
        config.fabric.management_address.clone(),
        &config.fabric.client_cert,
        &config.fabric.client_key,
    )?;
    let fabric: Arc<dyn Fabric> = Arc::new(FabricClient::new(gateway, management));
    info!(gateway = %config.fabric.gateway_address, "fabric clients ready");

    // ── Fleet ──────────────────────────────────────────────────
    let fleet = Arc::new(FleetSupervisor::new(config.games.clone(), fabric));
    fleet.init().await?;
    fleet.start().await?;
    info!(games = config.games.len(), "fleet running");

    // ── API server ─────────────────────────────────────────────
    let router = playgrid_api::build_router(Arc::clone(&fleet));
    let addr: SocketAddr = config.server.address.parse()?;

    info!(%addr, "API server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    fleet.stop().await?;

    info!("playgrid daemon stopped");
    Ok(())
}
