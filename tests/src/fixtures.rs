//! Shared test fixtures

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tob_auction::{
    AttestationError, Attestor, AuctionConfig, AuctionInfo, AuctionService, Bid, ChainId, Quote,
    WorkerRegistry,
};

/// Tick short enough for sub-second auctions
pub const TEST_TICK: Duration = Duration::from_millis(20);

/// Records every report it is asked to attest
#[derive(Default)]
pub struct RecordingAttestor {
    reports: Mutex<Vec<Vec<u8>>>,
}

impl RecordingAttestor {
    pub fn reports(&self) -> Vec<Vec<u8>> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl Attestor for RecordingAttestor {
    async fn produce_attestation(&self, report_data: &[u8]) -> Result<Quote, AttestationError> {
        self.reports.lock().push(report_data.to_vec());
        Ok(Quote(report_data.to_vec()))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn test_config() -> AuctionConfig {
    AuctionConfig::default().with_tick_interval(TEST_TICK)
}

/// Service over a fresh registry, plus the attestor it reports to
pub fn test_service() -> (AuctionService, Arc<RecordingAttestor>) {
    let attestor = Arc::new(RecordingAttestor::default());
    let registry = WorkerRegistry::new(test_config(), attestor.clone());
    (AuctionService::new(Arc::new(registry)), attestor)
}

/// Auction whose window is given in milliseconds from now
pub fn auction(chain_id: ChainId, id: &str, start_ms: i64, end_ms: i64) -> AuctionInfo {
    let now = Utc::now();
    AuctionInfo::new(
        id,
        chain_id,
        now + ChronoDuration::milliseconds(start_ms),
        now + ChronoDuration::milliseconds(end_ms),
    )
    .with_seller("0xseller", "seller-sig")
    .with_block(100, 30_000)
}

pub fn bid(chain_id: ChainId, auction_id: &str, amount: i64, txs: &[&str]) -> Bid {
    Bid::new(chain_id, auction_id, format!("0xbidder{amount}"), amount)
        .with_transactions(txs.iter().copied())
}

/// Poll `cond` every 5 ms until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
