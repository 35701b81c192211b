//! Invariant checks for auction registration and bid submission
//!
//! Pure functions; the worker calls them under its lock so the checks and
//! the mutation they guard are atomic.

use super::entities::{AuctionInfo, Bid};
use super::errors::AuctionError;
use super::value_objects::ChainId;
use chrono::{DateTime, Utc};

/// `start < end`
pub fn check_time_range(info: &AuctionInfo) -> Result<(), AuctionError> {
    if info.end_time <= info.start_time {
        return Err(AuctionError::InvalidTimeRange {
            start: info.start_time,
            end: info.end_time,
        });
    }
    Ok(())
}

/// `start ≥ now` at registration
pub fn check_start_not_past(info: &AuctionInfo, now: DateTime<Utc>) -> Result<(), AuctionError> {
    if info.start_time < now {
        return Err(AuctionError::StartInPast {
            start: info.start_time,
            now,
        });
    }
    Ok(())
}

/// Every bid names the chain and auction it was submitted for
pub fn check_bid_targets(
    chain_id: ChainId,
    auction_id: &str,
    bids: &[Bid],
) -> Result<(), AuctionError> {
    if let Some(bid) = bids
        .iter()
        .find(|bid| bid.chain_id != chain_id || bid.auction_id != auction_id)
    {
        return Err(AuctionError::BidTargetMismatch {
            chain_id,
            auction_id: auction_id.to_string(),
            bid_chain: bid.chain_id,
            bid_auction: bid.auction_id.clone(),
        });
    }
    Ok(())
}

/// Transactions per bid stay under `max_txs_per_bid`
pub fn check_bid_sizes(bids: &[Bid], max_txs_per_bid: usize) -> Result<(), AuctionError> {
    if let Some(bid) = bids.iter().find(|bid| bid.tx_count() > max_txs_per_bid) {
        return Err(AuctionError::TooManyTransactions {
            bidder: bid.bidder_address.clone(),
            count: bid.tx_count(),
            max: max_txs_per_bid,
        });
    }
    Ok(())
}

/// Accepted plus incoming bids stay under `max_bids`
pub fn check_bid_capacity(accepted: usize, incoming: usize, max_bids: usize) -> Result<(), AuctionError> {
    let count = accepted.saturating_add(incoming);
    if count > max_bids {
        return Err(AuctionError::TooManyBids {
            count,
            max: max_bids,
        });
    }
    Ok(())
}
