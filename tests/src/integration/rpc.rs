//! # JSON-RPC Flows
//!
//! The same lifecycle through the HTTP router, with the wire payloads
//! (camelCase, unix-millisecond times) a remote caller sends.

#[cfg(test)]
mod tests {
    use crate::fixtures::{test_config, wait_until, RecordingAttestor};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tob_auction::WorkerRegistry;
    use tob_node::{build_router, Node};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tower::ServiceExt;

    fn node() -> (Node, Arc<WorkerRegistry>) {
        let registry = Arc::new(WorkerRegistry::new(
            test_config(),
            Arc::new(RecordingAttestor::default()),
        ));
        (Node::new(Arc::clone(&registry)), registry)
    }

    async fn call(router: &Router, method: &str, params: Value) -> Value {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
        let response = router
            .clone()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn auction_params(id: &str, start_ms: i64, end_ms: i64) -> Value {
        let now = Utc::now().timestamp_millis();
        json!({
            "auctionInfo": {
                "auctionId": id,
                "chainId": 10,
                "startTime": now + start_ms,
                "endTime": now + end_ms,
                "sellerAddress": "0xseller",
                "blockNumber": 42,
                "blockspaceSize": 30000,
                "sellerSignature": "sig"
            }
        })
    }

    fn bid_params(auction_id: &str, amount: i64, txs: &[&str]) -> Value {
        let tx_list: Vec<Value> = txs.iter().map(|t| json!({ "txData": t })).collect();
        json!({
            "chainId": 10,
            "auctionId": auction_id,
            "bidList": [{
                "chainId": 10,
                "auctionId": auction_id,
                "bidderAddr": "0xbidder",
                "bidAmount": amount,
                "bidderSignature": "sig",
                "txList": tx_list
            }]
        })
    }

    #[tokio::test]
    async fn test_rpc_auction_lifecycle() {
        let (node, registry) = node();
        let router = build_router(node.handler.clone());

        let added = call(&router, "auction_addAuction", auction_params("X", 50, 400)).await;
        assert_eq!(added["result"]["success"], true);

        let duplicate = call(&router, "auction_addAuction", auction_params("X", 500, 600)).await;
        assert_eq!(duplicate["result"]["success"], false);

        let worker = registry.get(10).unwrap();
        assert!(wait_until(Duration::from_secs(1), || worker.active_info().is_some()).await);

        let info = call(&router, "auction_getAuctionInfo", json!({ "chainId": 10 })).await;
        assert_eq!(info["result"]["auctionInfo"]["auctionId"], "X");
        assert_eq!(info["result"]["auctionInfo"]["blockNumber"], 42);

        let low = call(&router, "auction_submitBids", bid_params("X", 5, &["a"])).await;
        assert_eq!(low["result"]["success"], true);
        let high = call(&router, "auction_submitBids", bid_params("X", 9, &["b", "c"])).await;
        assert_eq!(high["result"]["success"], true);

        let wrong = call(&router, "auction_submitBids", bid_params("Y", 1, &["x"])).await;
        assert_eq!(wrong["result"]["success"], false);

        assert!(
            wait_until(Duration::from_secs(2), || {
                worker.state_snapshot().is_some_and(|s| s.ended)
            })
            .await
        );

        let tob = call(&router, "auction_getLatestTob", json!({ "chainId": 10 })).await;
        assert_eq!(
            tob["result"]["txList"],
            json!([{ "txData": "b" }, { "txData": "c" }, { "txData": "a" }])
        );

        let state = call(&router, "auction_getAuctionState", json!({ "chainId": 10 })).await;
        assert_eq!(state["result"]["state"]["isEnded"], true);
        assert_eq!(state["result"]["state"]["bidList"].as_array().unwrap().len(), 2);

        let late = call(&router, "auction_submitBids", bid_params("X", 100, &["z"])).await;
        assert_eq!(late["result"]["success"], false);

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn test_rpc_unknown_chain() {
        let (node, _registry) = node();
        let router = build_router(node.handler.clone());

        let response = call(&router, "auction_getAuctionState", json!({ "chainId": 999 })).await;
        assert_eq!(response["error"]["code"], -32004);

        let response = call(&router, "auction_submitBids", bid_params("X", 1, &["t"])).await;
        assert_eq!(response["result"]["success"], false);
    }

    #[tokio::test]
    async fn test_node_serves_and_stops() {
        let (node, registry) = node();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(node.serve(listener, async move {
            let _ = stop_rx.await;
        }));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(raw.contains(r#"{"status":"ok"}"#));

        stop_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("server should stop")
            .unwrap()
            .unwrap();
        assert!(registry.is_shutting_down());
    }
}
