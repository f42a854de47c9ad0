//! # Router Configuration
//!
//! Controls how much of each request the router logs, and when a request is
//! reported as slow. Every field has a default, so an empty YAML document and
//! an empty environment both give [`RouterConfig::default()`].
//!
//! ## Environment Variables
//!
//! | variable | field | default |
//! |---|---|---|
//! | `LAYERED_ROUTER_LOG_HEADERS` | `log_headers` | `true` |
//! | `LAYERED_ROUTER_LOG_BODIES` | `log_bodies` | `false` |
//! | `LAYERED_ROUTER_SLOW_REQUEST_MS` | `slow_request_threshold_ms` | `1000` |
//!
//! Booleans accept `1/0`, `true/false`, `yes/no`, `on/off`. A value that does
//! not parse keeps the default.
//!
//! ## YAML
//!
//! ```yaml
//! log_headers: true
//! log_bodies: false
//! slow_request_threshold_ms: 250
//! ```

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Logging and diagnostics settings for a [`Router`](crate::router::Router).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Include request/response headers in the lifecycle debug records
    pub log_headers: bool,
    /// Include request/response bodies in the lifecycle debug records
    pub log_bodies: bool,
    /// Log a warning when handling takes at least this long (0 disables)
    pub slow_request_threshold_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            log_headers: true,
            log_bodies: false,
            slow_request_threshold_ms: 1000,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or a field has the wrong type.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Threshold as a `Duration`, `None` when slow-request logging is off.
    pub fn slow_request_threshold(&self) -> Option<Duration> {
        (self.slow_request_threshold_ms > 0)
            .then(|| Duration::from_millis(self.slow_request_threshold_ms))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_headers: lookup("LAYERED_ROUTER_LOG_HEADERS")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.log_headers),
            log_bodies: lookup("LAYERED_ROUTER_LOG_BODIES")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.log_bodies),
            slow_request_threshold_ms: lookup("LAYERED_ROUTER_SLOW_REQUEST_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.slow_request_threshold_ms),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
