//! IPC Module for the auction service
//!
//! Wire payloads and the transport-independent request handler used by the
//! JSON-RPC layer in `tob-node`.

pub mod handler;
pub mod payloads;

pub use handler::AuctionHandler;
pub use payloads::*;
