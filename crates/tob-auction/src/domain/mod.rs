//! Domain module for the auction engine
//!
//! Contains core entities, value objects, the auction queue, errors and invariants.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod queue;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use queue::AuctionQueue;
pub use value_objects::*;
