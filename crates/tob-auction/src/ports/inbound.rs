//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{AuctionInfo, AuctionState, Bid, Transaction};
use crate::domain::errors::Result;
use crate::domain::value_objects::ChainId;
use async_trait::async_trait;

/// Primary auction API, mapped 1:1 onto RPC methods by the IPC handler.
#[async_trait]
pub trait AuctionApi: Send + Sync {
    /// Register an auction on its chain, creating the chain worker on first use.
    ///
    /// Fails on `end ≤ start`, `start < now` or a duplicate auction id.
    async fn add_auction(&self, info: AuctionInfo) -> Result<()>;

    /// Submit bids to the chain's active auction.
    ///
    /// Fails if the chain is unknown, no auction is active, the auction id
    /// does not match the active one, or the auction has ended.
    async fn submit_bids(&self, chain_id: ChainId, auction_id: &str, bids: Vec<Bid>)
        -> Result<()>;

    /// Info of the auction occupying the chain's active slot.
    async fn get_auction_info(&self, chain_id: ChainId) -> Result<AuctionInfo>;

    /// Snapshot of the chain's active slot; `None` before the first activation.
    async fn get_auction_state(&self, chain_id: ChainId) -> Result<Option<AuctionState>>;

    /// Current ranked transaction list; final once the auction has ended.
    async fn get_latest_tob(&self, chain_id: ChainId) -> Result<Vec<Transaction>>;
}
