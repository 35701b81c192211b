//! # TOB Telemetry
//!
//! Structured logs and Prometheus metrics for the auction service.
//!
//! Logs go through `tracing`; [`init_tracing`] installs an `EnvFilter` and a
//! compact or JSON stdout layer. Metrics are process-wide statics registered
//! with [`REGISTRY`] and rendered by [`gather_metrics`] for `GET /metrics`.
//!
//! ```rust,ignore
//! let _telemetry = tob_telemetry::init_telemetry(&TelemetryConfig::from_env())?;
//! ```

#![warn(missing_docs)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::{LogFormat, TelemetryConfig};
pub use metrics::{
    gather_metrics, register_metrics, ATTESTATIONS, AUCTIONS_ACTIVATED, AUCTIONS_ENQUEUED,
    AUCTIONS_FINALIZED, BIDS_ACCEPTED, BID_REJECTIONS, ENQUEUE_REJECTIONS, QUEUE_DEPTH,
    RANKING_DURATION, REGISTRY,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Why telemetry could not be set up or exported
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Bad filter directives, or a global subscriber already exists
    #[error("tracing subscriber: {0}")]
    Subscriber(String),

    /// A collector was rejected by the registry
    #[error("metric registration: {0}")]
    Registration(String),

    /// Text exposition failed
    #[error("metric encoding: {0}")]
    Encode(String),
}

/// Register metrics, then install the tracing subscriber.
///
/// Keep the returned guard alive until the process exits.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    init_tracing(config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}

/// Logs a final line when the process tears telemetry down.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Telemetry shut down");
    }
}
