//! # JSON-RPC Router
//!
//! `POST /` takes a JSON-RPC 2.0 request or batch, `GET /health` answers a
//! liveness probe and `GET /metrics` renders the Prometheus registry.
//!
//! Every method takes a single params object (or a one-element array
//! holding it) in the wire format of `tob_auction::ipc::payloads`.

use super::error::{codes, RpcError};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tob_auction::{AddAuctionRequest, AuctionHandler, ChainRequest, SubmitBidsRequest};
use tracing::{debug, warn};

/// Max length of a string request id
const MAX_ID_LEN: usize = 256;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    handler: AuctionHandler,
}

/// Build the HTTP router around `handler`.
pub fn build_router(handler: AuctionHandler) -> Router {
    Router::new()
        .route("/", post(handle_json_rpc))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(AppState { handler })
}

/// Handle JSON-RPC request
async fn handle_json_rpc(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(error_response(Value::Null, RpcError::parse_error(e))),
            );
        }
    };

    let response = match request {
        Value::Array(requests) => {
            if requests.is_empty() {
                error_response(Value::Null, RpcError::invalid_request("empty batch"))
            } else {
                let mut responses = Vec::with_capacity(requests.len());
                for req in &requests {
                    responses.push(process_single_request(&state, req).await);
                }
                Value::Array(responses)
            }
        }
        single => process_single_request(&state, &single).await,
    };

    (StatusCode::OK, Json(response))
}

/// Process a single JSON-RPC request
async fn process_single_request(state: &AppState, request: &Value) -> Value {
    let id = match validate_id(request) {
        Ok(id) => id,
        Err(e) => return error_response(Value::Null, e),
    };

    let Some(method) = request.get("method").and_then(Value::as_str) else {
        return error_response(id, RpcError::invalid_request("missing method"));
    };
    let params = request.get("params");

    debug!(method, "JSON-RPC request");
    match route_method(&state.handler, method, params).await {
        Ok(result) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": result
        }),
        Err(e) => {
            debug!(method, code = e.code, error = %e.message, "JSON-RPC request failed");
            error_response(id, e)
        }
    }
}

/// Requests must carry a string or number id; notifications are not supported.
fn validate_id(request: &Value) -> Result<Value, RpcError> {
    if !request.is_object() {
        return Err(RpcError::invalid_request("request must be an object"));
    }
    match request.get("id") {
        None | Some(Value::Null) => Err(RpcError::invalid_request(
            "null id (notifications not supported)",
        )),
        Some(Value::String(s)) if s.is_empty() => Err(RpcError::invalid_request("empty string id")),
        Some(Value::String(s)) if s.len() > MAX_ID_LEN => Err(RpcError::invalid_request(format!(
            "id string too long (max {MAX_ID_LEN} chars)"
        ))),
        Some(id @ (Value::String(_) | Value::Number(_))) => Ok(id.clone()),
        Some(_) => Err(RpcError::invalid_request("id must be string or number")),
    }
}

/// Route JSON-RPC method to the auction handler.
pub async fn route_method(
    handler: &AuctionHandler,
    method: &str,
    params: Option<&Value>,
) -> Result<Value, RpcError> {
    match method {
        "auction_addAuction" => {
            let request: AddAuctionRequest = parse_params(params)?;
            to_value(handler.handle_add_auction(request).await)
        }
        "auction_submitBids" => {
            let request: SubmitBidsRequest = parse_params(params)?;
            to_value(handler.handle_submit_bids(request).await)
        }
        "auction_getAuctionInfo" => {
            let request: ChainRequest = parse_params(params)?;
            to_value(handler.handle_get_auction_info(request).await?)
        }
        "auction_getAuctionState" => {
            let request: ChainRequest = parse_params(params)?;
            to_value(handler.handle_get_auction_state(request).await?)
        }
        "auction_getLatestTob" => {
            let request: ChainRequest = parse_params(params)?;
            to_value(handler.handle_get_latest_tob(request).await?)
        }
        _ => Err(RpcError::method_not_found(method)),
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<&Value>) -> Result<T, RpcError> {
    let param = match params {
        Some(Value::Array(items)) => items.first(),
        Some(other) => Some(other),
        None => None,
    }
    .ok_or_else(|| RpcError::invalid_params("missing params object"))?;

    serde_json::from_value(param.clone()).map_err(RpcError::invalid_params)
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::new(codes::SERVER_ERROR, e.to_string()))
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": error
    })
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Prometheus text exposition
async fn metrics() -> impl IntoResponse {
    match tob_telemetry::gather_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => {
            warn!(error = %e, "Failed to render metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                e.to_string(),
            )
        }
    }
}
