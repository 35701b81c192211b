//! Prometheus metrics for the auction service.
//!
//! All metrics follow the naming convention: `tob_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::core::Collector;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, GaugeVec, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Registry scraped by `GET /metrics`
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // AUCTION LIFECYCLE
    // =========================================================================

    /// Auctions accepted into a chain queue
    pub static ref AUCTIONS_ENQUEUED: Counter = Counter::new(
        "tob_auction_enqueued_total",
        "Total number of auctions accepted into a chain queue"
    ).expect("static metric definition");

    /// Auction registrations rejected, by reason
    pub static ref ENQUEUE_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("tob_auction_enqueue_rejections_total", "Auction registrations rejected"),
        &["reason"]  // validation, conflict
    ).expect("static metric definition");

    /// Auctions moved from the queue into the active slot
    pub static ref AUCTIONS_ACTIVATED: Counter = Counter::new(
        "tob_auction_activated_total",
        "Total number of auctions activated"
    ).expect("static metric definition");

    /// Auctions whose ranking has been frozen
    pub static ref AUCTIONS_FINALIZED: Counter = Counter::new(
        "tob_auction_finalized_total",
        "Total number of auctions finalized"
    ).expect("static metric definition");

    /// Pending auctions per chain
    pub static ref QUEUE_DEPTH: GaugeVec = GaugeVec::new(
        Opts::new("tob_auction_queue_depth", "Number of auctions waiting in a chain queue"),
        &["chain_id"]
    ).expect("static metric definition");

    // =========================================================================
    // BIDS
    // =========================================================================

    /// Bids accepted into an active auction
    pub static ref BIDS_ACCEPTED: Counter = Counter::new(
        "tob_bids_accepted_total",
        "Total number of bids accepted"
    ).expect("static metric definition");

    /// Bid submissions rejected, by reason
    pub static ref BID_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("tob_bids_rejections_total", "Bid submissions rejected"),
        &["reason"]  // not_found, ended, validation
    ).expect("static metric definition");

    /// Time spent ranking bids into a TOB
    pub static ref RANKING_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "tob_ranking_duration_seconds",
            "Time spent ranking bids and building the top-of-block"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("static bucket layout"))
    ).expect("static metric definition");

    // =========================================================================
    // ATTESTATION
    // =========================================================================

    /// Attestation requests, by outcome
    pub static ref ATTESTATIONS: CounterVec = CounterVec::new(
        Opts::new("tob_attestations_total", "Attestation requests for finalized auctions"),
        &["outcome"]  // success, failure
    ).expect("static metric definition");
}

/// Register every metric with [`REGISTRY`]. Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let collectors: [Box<dyn Collector>; 9] = [
        Box::new(AUCTIONS_ENQUEUED.clone()),
        Box::new(ENQUEUE_REJECTIONS.clone()),
        Box::new(AUCTIONS_ACTIVATED.clone()),
        Box::new(AUCTIONS_FINALIZED.clone()),
        Box::new(QUEUE_DEPTH.clone()),
        Box::new(BIDS_ACCEPTED.clone()),
        Box::new(BID_REJECTIONS.clone()),
        Box::new(RANKING_DURATION.clone()),
        Box::new(ATTESTATIONS.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::Registration(e.to_string())),
        }
    }
    Ok(())
}

/// Render [`REGISTRY`] in the Prometheus text exposition format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let mut out = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut out)
        .map_err(|e| TelemetryError::Encode(e.to_string()))?;
    String::from_utf8(out).map_err(|e| TelemetryError::Encode(e.to_string()))
}
