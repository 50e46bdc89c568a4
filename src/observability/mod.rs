//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → metrics.rs (counter + duration histogram, true status)
//!     → logging.rs subscriber (structured events, request spans)
//!
//! Consumers:
//!     → Deployment controller (Prometheus scrape of /metrics)
//!     → Log aggregation (stdout)
//! ```
//!
//! # Design Decisions
//! - Metrics are recorded after the outcome is final, never before
//! - Request ID flows through the request span and response header
//! - Metrics are cheap (atomic per-series updates)

pub mod logging;
pub mod metrics;

pub use metrics::{MetricsError, RequestMetrics};
