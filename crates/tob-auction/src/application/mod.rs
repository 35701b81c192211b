//! Application layer: chain workers, their registry and the service facade

mod registry;
mod service;
mod worker;

pub use registry::WorkerRegistry;
pub use service::AuctionService;
pub use worker::ChainWorker;
