//! Core entities for the blockspace auction

use super::value_objects::{AuctionId, AuctionStatus, ChainId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Raw transaction carried by a bid. Opaque to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    pub data: String,
}

impl Transaction {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl From<&str> for Transaction {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

/// A priced offer for the top of the block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Chain the bid is for
    pub chain_id: ChainId,
    /// Auction the bid is for
    pub auction_id: AuctionId,
    /// Bidder address
    pub bidder_address: String,
    /// Bid amount; higher ranks first
    pub amount: i64,
    /// Bidder signature, carried but not verified
    pub bidder_signature: String,
    /// Transactions in the order they must appear in the block
    pub transactions: Vec<Transaction>,
}

impl Bid {
    pub fn new(
        chain_id: ChainId,
        auction_id: impl Into<AuctionId>,
        bidder_address: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            chain_id,
            auction_id: auction_id.into(),
            bidder_address: bidder_address.into(),
            amount,
            bidder_signature: String::new(),
            transactions: Vec::new(),
        }
    }

    pub fn with_transactions<I, T>(mut self, txs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Transaction>,
    {
        self.transactions = txs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.bidder_signature = signature.into();
        self
    }

    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Details of an auction as registered by the seller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionInfo {
    /// Unique within the chain's queued and active auctions
    pub auction_id: AuctionId,
    /// Chain whose blockspace is sold
    pub chain_id: ChainId,
    /// Bidding opens
    pub start_time: DateTime<Utc>,
    /// Bidding closes and the ranking is frozen
    pub end_time: DateTime<Utc>,
    /// Seller address
    pub seller_address: String,
    /// Block the auctioned space belongs to
    pub block_number: i64,
    /// Amount of blockspace on sale
    pub blockspace_size: i64,
    /// Seller signature, carried but not verified
    pub seller_signature: String,
}

impl AuctionInfo {
    pub fn new(
        auction_id: impl Into<AuctionId>,
        chain_id: ChainId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            auction_id: auction_id.into(),
            chain_id,
            start_time,
            end_time,
            seller_address: String::new(),
            block_number: 0,
            blockspace_size: 0,
            seller_signature: String::new(),
        }
    }

    pub fn with_seller(mut self, address: impl Into<String>, signature: impl Into<String>) -> Self {
        self.seller_address = address.into();
        self.seller_signature = signature.into();
        self
    }

    pub fn with_block(mut self, block_number: i64, blockspace_size: i64) -> Self {
        self.block_number = block_number;
        self.blockspace_size = blockspace_size;
        self
    }

    /// Length of the bidding window
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_time
    }

    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }
}

/// State of the auction occupying a chain's active slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub info: AuctionInfo,
    /// Accepted bids in submission order
    pub bids: Vec<Bid>,
    /// Ranked transaction list; frozen once `ended` is set
    pub tob: Vec<Transaction>,
    pub ended: bool,
}

impl AuctionState {
    /// Fresh state for an auction being activated
    pub fn new(info: AuctionInfo) -> Self {
        Self {
            info,
            bids: Vec::new(),
            tob: Vec::new(),
            ended: false,
        }
    }

    pub fn auction_id(&self) -> &str {
        &self.info.auction_id
    }

    pub fn status(&self) -> AuctionStatus {
        if self.ended {
            AuctionStatus::Ended
        } else {
            AuctionStatus::Active
        }
    }

    /// Append accepted bids. Callers have already checked `ended` and the auction id.
    pub(crate) fn append_bids(&mut self, bids: Vec<Bid>) {
        debug_assert!(!self.ended, "bids appended to an ended auction");
        self.bids.extend(bids);
    }

    /// Recompute the TOB from the current bids. No-op once ended.
    pub(crate) fn rerank(&mut self) -> usize {
        if !self.ended {
            self.tob = crate::algorithms::rank(&self.bids).tob;
        }
        self.tob.len()
    }

    /// Final ranking pass and the `Active → Ended` transition.
    ///
    /// Returns `false` if the auction had already ended.
    pub(crate) fn finalize(&mut self) -> bool {
        if self.ended {
            return false;
        }
        self.rerank();
        self.ended = true;
        true
    }
}
