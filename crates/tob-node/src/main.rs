//! # TOB Node Runtime
//!
//! Entry point of the top-of-block auction service.

use std::sync::Arc;

use anyhow::{Context, Result};
use tob_auction::{build_attestor, AuctionConfig, WorkerRegistry};
use tob_node::{Node, NodeConfig};
use tob_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry_config = TelemetryConfig::from_env();
    let _telemetry = init_telemetry(&telemetry_config).context("Failed to initialize telemetry")?;

    let node_config = NodeConfig::from_env().context("Invalid node configuration")?;
    let auction_config = AuctionConfig::from_env();

    info!("===========================================");
    info!("  TOB Auction Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        rpc_addr = %node_config.rpc_addr,
        tick_ms = auction_config.tick_interval.as_millis() as u64,
        attestation = ?auction_config.attestation,
        "Configuration loaded"
    );

    let attestor = build_attestor(&auction_config);
    let registry = Arc::new(WorkerRegistry::new(auction_config, attestor));
    let node = Node::new(registry);

    let listener = tokio::net::TcpListener::bind(node_config.rpc_addr)
        .await
        .with_context(|| format!("Failed to bind {}", node_config.rpc_addr))?;
    info!(addr = %node_config.rpc_addr, "JSON-RPC server listening");

    node.serve(listener, shutdown_signal())
        .await
        .context("JSON-RPC server failed")?;

    info!("Node stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal, stopping..."),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, stopping"),
    }
}
