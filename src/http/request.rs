//! Request classification.
//!
//! # Responsibilities
//! - Map each route to the endpoint label used in metrics
//! - Read the correlation ID set by the request-id layer
//!
//! # Design Decisions
//! - Unregistered paths are served by the root handler and labeled `/`
//! - Request ID added as early as possible for tracing

use axum::http::HeaderMap;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The fixed set of behavior-governed routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Root,
    Health,
    Data,
    Process,
}

impl Endpoint {
    /// Route path, also used as the `endpoint` metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Root => "/",
            Endpoint::Health => "/health",
            Endpoint::Data => "/api/data",
            Endpoint::Process => "/api/process",
        }
    }
}

/// The correlation ID attached to this request, if any.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}
