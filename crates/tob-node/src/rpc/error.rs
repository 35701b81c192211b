//! JSON-RPC error objects

use serde::Serialize;
use tob_auction::{AuctionError, ErrorKind};

/// JSON-RPC 2.0 error codes
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    /// Server-defined: unknown chain or no active auction
    pub const NOT_FOUND: i32 = -32004;
    /// Server-defined: any other failure
    pub const SERVER_ERROR: i32 = -32000;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {detail}"))
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(
            codes::INVALID_REQUEST,
            format!("Invalid Request: {}", detail.into()),
        )
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )
    }

    pub fn invalid_params(detail: impl std::fmt::Display) -> Self {
        Self::new(codes::INVALID_PARAMS, format!("Invalid params: {detail}"))
    }
}

impl From<AuctionError> for RpcError {
    fn from(err: AuctionError) -> Self {
        let code = match err.kind() {
            ErrorKind::NotFound => codes::NOT_FOUND,
            ErrorKind::Validation => codes::INVALID_PARAMS,
            ErrorKind::Conflict | ErrorKind::State => codes::SERVER_ERROR,
        };
        Self::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auction_error_codes() {
        assert_eq!(RpcError::from(AuctionError::ChainNotFound(1)).code, codes::NOT_FOUND);
        assert_eq!(RpcError::from(AuctionError::NoActiveAuction(1)).code, codes::NOT_FOUND);
        assert_eq!(
            RpcError::from(AuctionError::AuctionEnded("a".into())).code,
            codes::SERVER_ERROR
        );
        assert_eq!(
            RpcError::from(AuctionError::InvalidTimestamp(0)).code,
            codes::INVALID_PARAMS
        );
    }
}
