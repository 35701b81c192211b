//! # TOB Auction: Per-Chain Blockspace Auction Engine
//!
//! Sellers register time-boxed auctions for a chain's top-of-block space;
//! buyers submit priced bids carrying transactions while an auction is open;
//! at the end time the bids are ranked and their transactions concatenated
//! into the final top-of-block (TOB) list.
//!
//! ## Architecture
//!
//! - **Domain**: Entities (AuctionInfo, Bid, AuctionState), the time-ordered
//!   auction queue, invariants and errors
//! - **Algorithms**: Bid ranking and the result digest used as attestation report data
//! - **Application**: ChainWorker (queue processor + active-auction updater),
//!   WorkerRegistry (chain id → worker) and AuctionService
//! - **Ports**: Inbound (AuctionApi) and Outbound (Attestor)
//! - **Adapters**: Mock and configfs-tsm attestors
//! - **IPC**: Wire payloads and the request handler used by the RPC layer
//!
//! ## Auction lifecycle
//!
//! ```text
//!  add_auction ──→ Queued ──(now ≥ start)──→ Active ──(now ≥ end)──→ Ended
//!                                              ↑                       │
//!                               submit_bids ───┘          attestation ←┘
//! ```
//!
//! ## Invariants
//!
//! 1. At most one active auction per chain
//! 2. Auctions on one chain activate in non-decreasing start-time order
//! 3. Bids are accepted only by a non-ended auction with a matching id
//! 4. `Ended` is terminal; the finalized TOB never changes afterwards

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use adapters::attestation::{build_attestor, ConfigFsTsmAttestor, MockAttestor};
pub use algorithms::{rank, report_data, Ranking};
pub use application::{AuctionService, ChainWorker, WorkerRegistry};
pub use config::{AttestationMode, AuctionConfig};
pub use domain::entities::*;
pub use domain::errors::{AttestationError, AuctionError, ErrorKind, Result};
pub use domain::queue::AuctionQueue;
pub use domain::value_objects::*;
pub use ipc::*;
pub use ports::inbound::AuctionApi;
pub use ports::outbound::Attestor;
