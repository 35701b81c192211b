//! JSON-RPC transport over HTTP

pub mod error;
pub mod router;

pub use error::{codes, RpcError};
pub use router::{build_router, route_method};
