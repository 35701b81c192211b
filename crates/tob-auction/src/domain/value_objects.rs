//! Value objects for the auction domain

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain identifier. One worker, one queue and one active slot per chain.
pub type ChainId = i64;

/// Auction identifier, unique among the queued and active auctions of a chain.
pub type AuctionId = String;

/// Size of the report-data field bound into an attestation quote.
pub const REPORT_DATA_LEN: usize = 64;

/// Lifecycle of a single auction. `Ended` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    /// Waiting in the chain queue for its start time
    Queued,
    /// Installed in the active slot and accepting bids
    Active,
    /// Ranking frozen, no further bids
    Ended,
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Caller-chosen data embedded in an attestation quote.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ReportData(pub [u8; REPORT_DATA_LEN]);

impl ReportData {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ReportData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReportData({})", self.to_hex())
    }
}

/// Opaque attestation quote returned by the collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct Quote(pub Vec<u8>);

impl Quote {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = &self.0[..self.0.len().min(16)];
        write!(f, "Quote({} bytes, {}..)", self.0.len(), hex::encode(prefix))
    }
}
