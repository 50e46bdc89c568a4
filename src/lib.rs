//! Behavior-injection target for progressive-delivery experiments.
//!
//! Every request draws an outcome (status, delay) from the configured
//! behavior mode and every outcome lands in a Prometheus metrics stream
//! that a rollout controller scrapes to promote or abort a release.
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server ──▶ behavior::engine ──▶ sleep(delay)
//!                                                               │
//!     Client Response                                           ▼
//!     ◀─────────────── http::response ◀─────────────────── build body
//!                             │
//!                             ▼
//!                 observability::metrics  ◀──── GET /metrics (scrape)
//! ```

// Core subsystems
pub mod behavior;
pub mod config;
pub mod http;
pub mod identity;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use behavior::{BehaviorDecision, BehaviorEngine, BehaviorMode};
pub use config::ServiceConfig;
pub use http::HttpServer;
pub use identity::ServiceIdentity;
pub use lifecycle::Shutdown;
