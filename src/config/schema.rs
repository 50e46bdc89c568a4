//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::observability::metrics::DEFAULT_BUCKETS;

/// Root configuration for the behavior-injection service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Identity and behavior settings.
    pub service: ServiceSection,

    /// Listener configuration (bind host, port).
    pub listener: ListenerConfig,

    /// Server read/write deadlines.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Identity and behavior settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Version label reported in responses and the version gauge.
    pub version: String,

    /// Behavior mode as configured (normal, slow, error-prone, chaotic).
    pub behavior: String,

    /// Hostname override. Resolved from the OS when unset.
    pub hostname: Option<String>,

    /// Seed for reproducible behavior draws. Fresh OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            behavior: "normal".to_string(),
            hostname: None,
            seed: None,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP literal to bind (e.g., "0.0.0.0", "::"). Hostnames are rejected.
    pub host: String,

    /// Port as configured. Kept as text so a bad `PORT` value surfaces
    /// as a validation error instead of a silent default.
    pub port: String,
}

impl ListenerConfig {
    /// Resolve the socket address to bind. IPv6 hosts may be bare or bracketed.
    pub fn bind_address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let host = self.host.trim();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.port.trim()).parse()
        } else {
            format!("{}:{}", host, self.port.trim()).parse()
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: "8080".to_string(),
        }
    }
}

/// Server deadlines in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for reading a request body.
    pub read_secs: u64,

    /// Deadline for producing a response.
    pub write_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 5,
            write_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Upper bounds for the request duration histogram, in seconds.
    pub histogram_buckets: Vec<f64>,

    /// Interval between exporter upkeep runs.
    pub upkeep_interval_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            histogram_buckets: DEFAULT_BUCKETS.to_vec(),
            upkeep_interval_secs: 5,
        }
    }
}
