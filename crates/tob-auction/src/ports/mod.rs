//! Ports (hexagonal boundaries)

pub mod inbound;
pub mod outbound;

pub use inbound::AuctionApi;
pub use outbound::Attestor;
