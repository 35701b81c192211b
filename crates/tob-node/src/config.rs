//! # Node Configuration
//!
//! Runtime parameters of the node binary. The auction engine and telemetry
//! read their own settings (`AuctionConfig::from_env`, `TelemetryConfig::from_env`).

use std::net::SocketAddr;
use thiserror::Error;

/// Default JSON-RPC listen address
pub const DEFAULT_RPC_ADDR: &str = "0.0.0.0:50051";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `TOB_RPC_ADDR` is not a socket address.
    #[error("invalid TOB_RPC_ADDR {value:?}: {reason}")]
    InvalidRpcAddr { value: String, reason: String },
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// JSON-RPC listen address.
    pub rpc_addr: SocketAddr,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_addr: SocketAddr::from(([0, 0, 0, 0], 50051)),
        }
    }
}

impl NodeConfig {
    /// Load from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TOB_RPC_ADDR` | `0.0.0.0:50051` |
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("TOB_RPC_ADDR") {
            Ok(value) => Self::with_rpc_addr(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Parse an explicit listen address.
    pub fn with_rpc_addr(value: &str) -> Result<Self, ConfigError> {
        let rpc_addr = value
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidRpcAddr {
                value: value.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { rpc_addr })
    }
}
