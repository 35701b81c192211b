//! Auction Service: implements [`AuctionApi`] over the worker registry

use super::registry::WorkerRegistry;
use super::worker::ChainWorker;
use crate::config::AuctionConfig;
use crate::domain::entities::{AuctionInfo, AuctionState, Bid, Transaction};
use crate::domain::errors::{AuctionError, Result};
use crate::domain::value_objects::ChainId;
use crate::ports::inbound::AuctionApi;
use crate::ports::outbound::Attestor;
use async_trait::async_trait;
use std::sync::Arc;

/// Entry point for callers: routes every operation to its chain's worker.
#[derive(Debug)]
pub struct AuctionService {
    registry: Arc<WorkerRegistry>,
}

impl AuctionService {
    pub fn new(registry: Arc<WorkerRegistry>) -> Self {
        Self { registry }
    }

    /// Service with a fresh registry
    pub fn with_config(config: AuctionConfig, attestor: Arc<dyn Attestor>) -> Self {
        Self::new(Arc::new(WorkerRegistry::new(config, attestor)))
    }

    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.registry
    }

    fn worker(&self, chain_id: ChainId) -> Result<Arc<ChainWorker>> {
        self.registry
            .get(chain_id)
            .ok_or(AuctionError::ChainNotFound(chain_id))
    }
}

#[async_trait]
impl AuctionApi for AuctionService {
    async fn add_auction(&self, info: AuctionInfo) -> Result<()> {
        self.registry.resolve(info.chain_id)?.enqueue(info)
    }

    async fn submit_bids(&self, chain_id: ChainId, auction_id: &str, bids: Vec<Bid>) -> Result<()> {
        self.worker(chain_id)?.submit_bids(auction_id, bids)
    }

    async fn get_auction_info(&self, chain_id: ChainId) -> Result<AuctionInfo> {
        self.worker(chain_id)?
            .active_info()
            .ok_or(AuctionError::NoActiveAuction(chain_id))
    }

    async fn get_auction_state(&self, chain_id: ChainId) -> Result<Option<AuctionState>> {
        Ok(self.worker(chain_id)?.state_snapshot())
    }

    async fn get_latest_tob(&self, chain_id: ChainId) -> Result<Vec<Transaction>> {
        Ok(self.worker(chain_id)?.latest_tob())
    }
}
