//! # TOB Node
//!
//! Process wiring for the top-of-block auction service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + Prometheus registry)
//! 2. Load `AuctionConfig` and `NodeConfig` from the environment
//! 3. Build the attestor selected by `TOB_ATTESTATION`
//! 4. Build the worker registry, service and IPC handler
//! 5. Serve JSON-RPC on `TOB_RPC_ADDR` until Ctrl-C
//! 6. Stop every chain worker (active auctions are not finalized)

pub mod config;
pub mod rpc;

pub use config::{ConfigError, NodeConfig};
pub use rpc::build_router;

use std::future::Future;
use std::sync::Arc;
use tob_auction::{AuctionHandler, AuctionService, WorkerRegistry};

/// Everything the node serves, wired together.
pub struct Node {
    pub registry: Arc<WorkerRegistry>,
    pub handler: AuctionHandler,
}

impl Node {
    pub fn new(registry: Arc<WorkerRegistry>) -> Self {
        let service = AuctionService::new(Arc::clone(&registry));
        Self {
            registry,
            handler: AuctionHandler::new(Arc::new(service)),
        }
    }

    /// Serve JSON-RPC on `listener` until `signal` resolves, then stop the workers.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let router = build_router(self.handler.clone());
        let served = axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .await;

        self.registry.shutdown().await;
        served
    }
}
