//! Error types for the auction engine

use super::value_objects::{AuctionId, ChainId, REPORT_DATA_LEN};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for auction operations
pub type Result<T> = std::result::Result<T, AuctionError>;

/// Error category, used by the RPC layer and by metrics labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad time range or malformed input
    Validation,
    /// Duplicate auction id
    Conflict,
    /// Unknown chain, no active auction or auction id mismatch
    NotFound,
    /// Bids submitted after the auction ended, or the service is stopping
    State,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::State => "state",
        }
    }
}

/// All errors returned synchronously by auction operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// End time is not after start time
    #[error("end time {end} is not after start time {start}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Start time already passed at registration
    #[error("invalid auction start time: {start} is before now {now}")]
    StartInPast {
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// Auction registered on a worker serving another chain
    #[error("auction is for chain {got}, worker serves chain {expected}")]
    WrongChain { expected: ChainId, got: ChainId },

    /// Bid addressed to another chain or auction than the submission
    #[error("bid targets chain {bid_chain} auction {bid_auction}, submission is for chain {chain_id} auction {auction_id}")]
    BidTargetMismatch {
        chain_id: ChainId,
        auction_id: AuctionId,
        bid_chain: ChainId,
        bid_auction: AuctionId,
    },

    /// Auction would exceed its bid cap
    #[error("too many bids: {count} > {max}")]
    TooManyBids { count: usize, max: usize },

    /// Bid carries more transactions than allowed
    #[error("bid from {bidder} carries too many transactions: {count} > {max}")]
    TooManyTransactions {
        bidder: String,
        count: usize,
        max: usize,
    },

    /// Wire timestamp outside the representable range
    #[error("invalid timestamp: {0} ms")]
    InvalidTimestamp(i64),

    /// Malformed request payload
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// An auction with this id is already queued or active
    #[error("auction ID {0} already exists")]
    DuplicateAuction(AuctionId),

    /// No worker exists for the chain
    #[error("chain {0} not found")]
    ChainNotFound(ChainId),

    /// The chain has no auction in its active slot
    #[error("no active auction on chain {0}")]
    NoActiveAuction(ChainId),

    /// Submission names a different auction than the active one
    #[error("invalid auction ID: {got} is not active (active: {active})")]
    AuctionIdMismatch { active: AuctionId, got: AuctionId },

    /// Auction finalized, bids are no longer accepted
    #[error("auction {0} has already ended")]
    AuctionEnded(AuctionId),

    /// Workers are stopping; nothing new would ever activate
    #[error("auction service is shutting down")]
    ShuttingDown,
}

impl AuctionError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTimeRange { .. }
            | Self::StartInPast { .. }
            | Self::WrongChain { .. }
            | Self::BidTargetMismatch { .. }
            | Self::TooManyBids { .. }
            | Self::TooManyTransactions { .. }
            | Self::InvalidTimestamp(_)
            | Self::InvalidPayload(_) => ErrorKind::Validation,
            Self::DuplicateAuction(_) => ErrorKind::Conflict,
            Self::ChainNotFound(_) | Self::NoActiveAuction(_) | Self::AuctionIdMismatch { .. } => {
                ErrorKind::NotFound
            }
            Self::AuctionEnded(_) | Self::ShuttingDown => ErrorKind::State,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Errors from the attestation collaborator. Logged, never propagated to callers.
#[derive(Debug, Error)]
pub enum AttestationError {
    /// Report data does not fit the quote field
    #[error("report data too long: {len} > {max}", max = REPORT_DATA_LEN)]
    ReportDataTooLong { len: usize },

    /// Quote provider is not present on this host
    #[error("quote provider unavailable: {0}")]
    Unavailable(String),

    /// Provider returned no quote
    #[error("quote provider returned an empty quote")]
    EmptyQuote,

    /// I/O against the quote provider failed
    #[error("quote provider I/O error: {0}")]
    Io(#[from] std::io::Error),
}
