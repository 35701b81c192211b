//! Bid ranking and top-of-block construction
//!
//! Total order: bid amount descending, ties kept in submission order.
//! `slice::sort_by_key` is stable, which is what makes the tie-break hold.

use crate::domain::entities::{Bid, Transaction};
use std::cmp::Reverse;

/// Ranked view of a bid set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking<'a> {
    /// Bids, best first
    pub bids: Vec<&'a Bid>,
    /// Concatenated transactions of `bids`, in that order
    pub tob: Vec<Transaction>,
}

/// Rank `bids` (given in submission order) and build the TOB.
pub fn rank(bids: &[Bid]) -> Ranking<'_> {
    let mut ranked: Vec<&Bid> = bids.iter().collect();
    ranked.sort_by_key(|bid| Reverse(bid.amount));

    let tob = ranked
        .iter()
        .flat_map(|bid| bid.transactions.iter().cloned())
        .collect();

    Ranking { bids: ranked, tob }
}
