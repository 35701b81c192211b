//! Logging settings, read from the environment.

use std::env;

/// How log lines are written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable compact lines
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
    /// No output layer; spans and events are still filtered and counted
    Off,
}

/// Settings for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Attached to the startup line so mixed log streams can be told apart
    pub service_name: String,
    /// `EnvFilter` directives, e.g. `info` or `tob_auction=debug,info`
    pub log_filter: String,
    /// Output layer
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tob-auction".to_string(),
            log_filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl TelemetryConfig {
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OTEL_SERVICE_NAME` | `tob-auction` |
    /// | `TOB_LOG_LEVEL`, then `RUST_LOG` | `info` |
    /// | `TOB_JSON_LOGS` | `true` inside Kubernetes/Docker, else `false` |
    /// | `TOB_CONSOLE_OUTPUT` | `true`; `false` silences output entirely |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let in_container =
            env::var_os("KUBERNETES_SERVICE_HOST").is_some() || env::var_os("DOCKER_CONTAINER").is_some();

        let console = flag_from_env("TOB_CONSOLE_OUTPUT").unwrap_or(true);
        let json = flag_from_env("TOB_JSON_LOGS").unwrap_or(in_container);

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_filter: env::var("TOB_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_filter),
            format: LogFormat::select(console, json),
        }
    }
}

impl LogFormat {
    fn select(console: bool, json: bool) -> Self {
        match (console, json) {
            (false, _) => Self::Off,
            (true, true) => Self::Json,
            (true, false) => Self::Pretty,
        }
    }
}

fn flag_from_env(key: &str) -> Option<bool> {
    env::var(key).ok().and_then(|raw| parse_flag(&raw))
}

/// `None` for anything that is not a recognizable boolean.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(LogFormat::select(true, false), LogFormat::Pretty);
        assert_eq!(LogFormat::select(true, true), LogFormat::Json);
        assert_eq!(LogFormat::select(false, true), LogFormat::Off);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
