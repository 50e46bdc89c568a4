//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define request metrics (count, latency) and the version info gauge
//! - Expose Prometheus-compatible text on demand
//! - Record the true outcome of every request, injected failures included
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, endpoint, status
//! - `http_request_duration_seconds` (histogram): latency by method, endpoint
//! - `app_version_info` (gauge): 1, labeled by version, behavior, hostname
//!
//! # Design Decisions
//! - The recorder is owned by the server, not installed globally, so each
//!   server instance (and each test) has its own registry
//! - Per-series atomic storage; unrelated requests never share a lock
//! - Histogram buckets default to the Prometheus client defaults

use std::fmt;
use std::time::Duration;

use axum::http::StatusCode;
use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use thiserror::Error;

use crate::identity::ServiceIdentity;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const VERSION_INFO: &str = "app_version_info";

/// Prometheus client default buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics exporter setup failed: {0}")]
    Build(#[from] BuildError),
}

/// Request metrics backed by a private Prometheus registry.
pub struct RequestMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl RequestMetrics {
    /// Create the registry, describe every series and set the version gauge.
    pub fn new(buckets: &[f64], identity: &ServiceIdentity) -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), buckets)?
            .build_recorder();
        let handle = recorder.handle();

        recorder.describe_counter(
            KeyName::from_const_str(REQUESTS_TOTAL),
            None,
            SharedString::const_str("Total number of HTTP requests"),
        );
        recorder.describe_histogram(
            KeyName::from_const_str(REQUEST_DURATION),
            None,
            SharedString::const_str("HTTP request duration in seconds"),
        );
        recorder.describe_gauge(
            KeyName::from_const_str(VERSION_INFO),
            None,
            SharedString::const_str("Application version information"),
        );

        let info = Key::from_parts(
            VERSION_INFO,
            vec![
                Label::new("version", identity.version().to_owned()),
                Label::new("behavior", identity.behavior().to_owned()),
                Label::new("hostname", identity.hostname().to_owned()),
            ],
        );
        recorder.register_gauge(&info, &metadata()).set(1.0);

        Ok(Self { recorder, handle })
    }

    /// Count one completed request and observe its duration.
    pub fn record_request(
        &self,
        method: &str,
        endpoint: &str,
        status: StatusCode,
        elapsed: Duration,
    ) {
        let counter = Key::from_parts(
            REQUESTS_TOTAL,
            vec![
                Label::new("method", method.to_owned()),
                Label::new("endpoint", endpoint.to_owned()),
                Label::new("status", status.as_u16().to_string()),
            ],
        );
        self.recorder
            .register_counter(&counter, &metadata())
            .increment(1);

        let histogram = Key::from_parts(
            REQUEST_DURATION,
            vec![
                Label::new("method", method.to_owned()),
                Label::new("endpoint", endpoint.to_owned()),
            ],
        );
        self.recorder
            .register_histogram(&histogram, &metadata())
            .record(elapsed.as_secs_f64());
    }

    /// Render every series in the Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Drain pending histogram samples into their buckets.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

impl fmt::Debug for RequestMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestMetrics").finish_non_exhaustive()
    }
}

fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}
