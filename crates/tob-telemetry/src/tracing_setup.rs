//! Global `tracing` subscriber: an `EnvFilter` plus at most one output layer.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;
use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` directives, when present and valid, take precedence over
/// `config.log_filter`. Fails if a subscriber is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| TelemetryError::Subscriber(format!("bad filter {:?}: {e}", config.log_filter)))?,
    };

    let pretty = (config.format == LogFormat::Pretty).then(|| fmt::layer().compact().with_target(true));
    let json = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_thread_names(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        filter = %config.log_filter,
        format = ?config.format,
        "Logging ready"
    );
    Ok(())
}
