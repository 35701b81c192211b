//! IPC Payloads for the auction service
//!
//! JSON wire types with camelCase field names. Times travel as unix
//! milliseconds; everything else maps 1:1 onto the domain entities.

use crate::domain::entities::{AuctionInfo, AuctionState, Bid, Transaction};
use crate::domain::errors::AuctionError;
use crate::domain::value_objects::{AuctionId, ChainId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unix milliseconds → `DateTime<Utc>`
pub fn from_unix_millis(ms: i64) -> Result<DateTime<Utc>, AuctionError> {
    DateTime::from_timestamp_millis(ms).ok_or(AuctionError::InvalidTimestamp(ms))
}

// ============================================================
// SHARED WIRE TYPES
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxPayload {
    pub tx_data: String,
}

impl From<TxPayload> for Transaction {
    fn from(tx: TxPayload) -> Self {
        Transaction::new(tx.tx_data)
    }
}

impl From<Transaction> for TxPayload {
    fn from(tx: Transaction) -> Self {
        Self { tx_data: tx.data }
    }
}

/// Bid as submitted by a buyer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidPayload {
    pub chain_id: ChainId,
    pub auction_id: AuctionId,
    #[serde(default)]
    pub bidder_addr: String,
    pub bid_amount: i64,
    #[serde(default)]
    pub bidder_signature: String,
    #[serde(default)]
    pub tx_list: Vec<TxPayload>,
}

impl From<BidPayload> for Bid {
    fn from(bid: BidPayload) -> Self {
        Bid::new(bid.chain_id, bid.auction_id, bid.bidder_addr, bid.bid_amount)
            .with_signature(bid.bidder_signature)
            .with_transactions(bid.tx_list)
    }
}

impl From<Bid> for BidPayload {
    fn from(bid: Bid) -> Self {
        Self {
            chain_id: bid.chain_id,
            auction_id: bid.auction_id,
            bidder_addr: bid.bidder_address,
            bid_amount: bid.amount,
            bidder_signature: bid.bidder_signature,
            tx_list: bid.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Auction as registered by a seller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionInfoPayload {
    pub auction_id: AuctionId,
    pub chain_id: ChainId,
    /// Unix milliseconds
    pub start_time: i64,
    /// Unix milliseconds
    pub end_time: i64,
    #[serde(default)]
    pub seller_address: String,
    #[serde(default)]
    pub block_number: i64,
    #[serde(default)]
    pub blockspace_size: i64,
    #[serde(default)]
    pub seller_signature: String,
}

impl TryFrom<AuctionInfoPayload> for AuctionInfo {
    type Error = AuctionError;

    fn try_from(info: AuctionInfoPayload) -> Result<Self, Self::Error> {
        let start_time = from_unix_millis(info.start_time)?;
        let end_time = from_unix_millis(info.end_time)?;
        Ok(AuctionInfo::new(info.auction_id, info.chain_id, start_time, end_time)
            .with_seller(info.seller_address, info.seller_signature)
            .with_block(info.block_number, info.blockspace_size))
    }
}

impl From<AuctionInfo> for AuctionInfoPayload {
    fn from(info: AuctionInfo) -> Self {
        Self {
            auction_id: info.auction_id,
            chain_id: info.chain_id,
            start_time: info.start_time.timestamp_millis(),
            end_time: info.end_time.timestamp_millis(),
            seller_address: info.seller_address,
            block_number: info.block_number,
            blockspace_size: info.blockspace_size,
            seller_signature: info.seller_signature,
        }
    }
}

/// Snapshot of a chain's active slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionStatePayload {
    pub auction_info: AuctionInfoPayload,
    pub bid_list: Vec<BidPayload>,
    pub sorted_tx_list: Vec<TxPayload>,
    pub is_ended: bool,
}

impl From<AuctionState> for AuctionStatePayload {
    fn from(state: AuctionState) -> Self {
        Self {
            auction_info: state.info.into(),
            bid_list: state.bids.into_iter().map(Into::into).collect(),
            sorted_tx_list: state.tob.into_iter().map(Into::into).collect(),
            is_ended: state.ended,
        }
    }
}

impl TryFrom<AuctionStatePayload> for AuctionState {
    type Error = AuctionError;

    fn try_from(state: AuctionStatePayload) -> Result<Self, Self::Error> {
        Ok(AuctionState {
            info: state.auction_info.try_into()?,
            bids: state.bid_list.into_iter().map(Into::into).collect(),
            tob: state.sorted_tx_list.into_iter().map(Into::into).collect(),
            ended: state.is_ended,
        })
    }
}

// ============================================================
// REQUESTS / RESPONSES
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAuctionRequest {
    pub auction_info: AuctionInfoPayload,
}

/// In-band outcome of `AddAuction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddAuctionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBidsRequest {
    pub chain_id: ChainId,
    pub auction_id: AuctionId,
    #[serde(default)]
    pub bid_list: Vec<BidPayload>,
}

/// In-band outcome of `SubmitBids`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBidsResponse {
    pub success: bool,
    pub message: String,
}

/// Body shared by the three getters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRequest {
    pub chain_id: ChainId,
}

pub type GetAuctionInfoRequest = ChainRequest;
pub type GetAuctionStateRequest = ChainRequest;
pub type GetLatestTobRequest = ChainRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAuctionInfoResponse {
    pub auction_info: AuctionInfoPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAuctionStateResponse {
    /// `null` until the chain's first auction activates
    pub state: Option<AuctionStatePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLatestTobResponse {
    pub tx_list: Vec<TxPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auction_info_from_wire() {
        let payload: AuctionInfoPayload = serde_json::from_value(json!({
            "auctionId": "a-1",
            "chainId": 5,
            "startTime": 1_700_000_000_000i64,
            "endTime": 1_700_000_002_500i64,
            "blockNumber": 12,
        }))
        .unwrap();

        let info = AuctionInfo::try_from(payload.clone()).unwrap();
        assert_eq!(info.chain_id, 5);
        assert_eq!(info.duration().num_milliseconds(), 2_500);
        assert_eq!(info.block_number, 12);
        assert!(info.seller_address.is_empty());

        assert_eq!(AuctionInfoPayload::from(info), payload);
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let payload = AuctionInfoPayload {
            auction_id: "a".into(),
            chain_id: 1,
            start_time: i64::MAX,
            end_time: i64::MAX,
            seller_address: String::new(),
            block_number: 0,
            blockspace_size: 0,
            seller_signature: String::new(),
        };

        let err = AuctionInfo::try_from(payload).unwrap_err();
        assert_eq!(err, AuctionError::InvalidTimestamp(i64::MAX));
    }

    #[test]
    fn test_bid_wire_names() {
        let bid = Bid::new(1, "a", "0xb", 7).with_transactions(["t1"]);
        let value = serde_json::to_value(BidPayload::from(bid.clone())).unwrap();

        assert_eq!(value["bidAmount"], 7);
        assert_eq!(value["bidderAddr"], "0xb");
        assert_eq!(value["txList"][0]["txData"], "t1");

        let back: BidPayload = serde_json::from_value(value).unwrap();
        assert_eq!(Bid::from(back), bid);
    }

    #[test]
    fn test_state_payload() {
        let start = from_unix_millis(1_000).unwrap();
        let end = from_unix_millis(2_000).unwrap();
        let mut state = AuctionState::new(AuctionInfo::new("a", 1, start, end));
        state.tob = vec![Transaction::new("x")];
        state.ended = true;

        let value = serde_json::to_value(AuctionStatePayload::from(state.clone())).unwrap();
        assert_eq!(value["isEnded"], true);
        assert_eq!(value["sortedTxList"][0]["txData"], "x");
        assert_eq!(value["auctionInfo"]["startTime"], 1_000);

        let back: AuctionStatePayload = serde_json::from_value(value).unwrap();
        assert_eq!(AuctionState::try_from(back).unwrap(), state);
    }
}
