//! Time-ordered queue of pending auctions
//!
//! Entries are keyed by `(start_time, arrival sequence)`, so auctions with
//! equal start times leave the queue in the order they arrived.

use super::entities::AuctionInfo;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Pending auctions of one chain, earliest start first
#[derive(Debug, Default)]
pub struct AuctionQueue {
    entries: BTreeMap<(DateTime<Utc>, u64), AuctionInfo>,
    next_seq: u64,
}

impl AuctionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, auction_id: &str) -> bool {
        self.entries.values().any(|info| info.auction_id == auction_id)
    }

    /// Earliest-starting auction
    pub fn peek(&self) -> Option<&AuctionInfo> {
        self.entries.values().next()
    }

    /// Insert an auction. Returns `true` if it became the head of the queue.
    pub fn push(&mut self, info: AuctionInfo) -> bool {
        let key = (info.start_time, self.next_seq);
        self.next_seq += 1;
        self.entries.insert(key, info);
        self.entries.keys().next() == Some(&key)
    }

    /// Remove and return the head if its start time has been reached.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<AuctionInfo> {
        match self.entries.first_key_value() {
            Some(((start, _), _)) if *start <= now => {
                self.entries.pop_first().map(|(_, info)| info)
            }
            _ => None,
        }
    }

    /// Pending auctions in activation order
    pub fn iter(&self) -> impl Iterator<Item = &AuctionInfo> {
        self.entries.values()
    }
}
