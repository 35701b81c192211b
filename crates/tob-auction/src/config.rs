//! Configuration for the auction engine

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default interval between ranking passes of the active auction.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Default configfs-tsm report directory on TDX guests.
pub const DEFAULT_TSM_REPORT_PATH: &str = "/sys/kernel/config/tsm/report";

/// Which attestation collaborator finalized auctions are reported to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationMode {
    /// In-process quote that only echoes the report data
    #[default]
    Mock,
    /// Intel TDX quote through the Linux configfs-tsm interface
    Tdx,
}

impl AttestationMode {
    /// Parse a mode name, `None` when unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mock" | "mock_tdx" => Some(Self::Mock),
            "tdx" => Some(Self::Tdx),
            _ => None,
        }
    }
}

/// Auction engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Interval between ranking passes while an auction is open
    pub tick_interval: Duration,
    /// Maximum bids one auction accepts (anti-DoS)
    pub max_bids_per_auction: usize,
    /// Maximum transactions a single bid may carry
    pub max_txs_per_bid: usize,
    /// Attestation collaborator
    pub attestation: AttestationMode,
    /// configfs-tsm report directory, used in `Tdx` mode
    pub tsm_report_path: PathBuf,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            max_bids_per_auction: 10_000,
            max_txs_per_bid: 256,
            attestation: AttestationMode::Mock,
            tsm_report_path: PathBuf::from(DEFAULT_TSM_REPORT_PATH),
        }
    }
}

impl AuctionConfig {
    /// Load configuration from environment variables.
    ///
    /// - `TOB_TICK_INTERVAL_MS`: ranking interval (default: 500)
    /// - `TOB_MAX_BIDS_PER_AUCTION`: bid cap per auction (default: 10000)
    /// - `TOB_MAX_TXS_PER_BID`: transaction cap per bid (default: 256)
    /// - `TOB_ATTESTATION`: `mock` or `tdx` (default: mock)
    /// - `TOB_TSM_REPORT_PATH`: configfs-tsm report dir
    ///
    /// Unparseable values are logged and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = parse_env::<u64>("TOB_TICK_INTERVAL_MS") {
            if ms == 0 {
                warn!("TOB_TICK_INTERVAL_MS must be positive, keeping default");
            } else {
                config.tick_interval = Duration::from_millis(ms);
            }
        }
        if let Some(max) = parse_env::<usize>("TOB_MAX_BIDS_PER_AUCTION") {
            config.max_bids_per_auction = max;
        }
        if let Some(max) = parse_env::<usize>("TOB_MAX_TXS_PER_BID") {
            config.max_txs_per_bid = max;
        }
        if let Ok(mode) = env::var("TOB_ATTESTATION") {
            match AttestationMode::parse(&mode) {
                Some(mode) => config.attestation = mode,
                None => warn!(
                    value = %mode,
                    "Unknown TOB_ATTESTATION value, defaulting to mock attestation"
                ),
            }
        }
        if let Ok(path) = env::var("TOB_TSM_REPORT_PATH") {
            config.tsm_report_path = PathBuf::from(path);
        }

        config
    }

    /// Builder-style tick override, mostly for tests.
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick_interval = tick;
        self
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Invalid value in environment, keeping default");
            None
        }
    }
}
