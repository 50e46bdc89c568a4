//! Response payloads.
//!
//! # Responsibilities
//! - Build the JSON envelope and the per-route payloads
//! - Attach the service identity to every body
//! - Turn a behavior decision into the final HTTP response
//!
//! # Design Decisions
//! - Bodies are serialized eagerly so the recorded duration covers encoding
//! - Injected failures still answer with JSON, never an empty body

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::behavior::engine::BehaviorDecision;
use crate::behavior::entropy::RandomSource;
use crate::behavior::messages::pick_message;
use crate::http::request::{Endpoint, X_REQUEST_ID};
use crate::identity::ServiceIdentity;

/// Upper bound (exclusive) of the `items` count on the data route.
pub const MAX_ITEMS: u32 = 100;

/// Body of the root route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub version: String,
    pub behavior: String,
    pub hostname: String,
    pub timestamp: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Body of the data route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPayload {
    pub items: u32,
    pub processed: bool,
    pub version: String,
    pub hostname: String,
    pub timestamp: String,
}

/// Body of the process route. `duration` is in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessPayload {
    pub status: String,
    pub duration: u64,
    pub version: String,
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthyPayload {
    pub status: String,
    pub version: String,
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnhealthyPayload {
    pub status: String,
    pub reason: String,
}

/// Body sent with an injected error on a content route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    pub status: u16,
    pub version: String,
    pub hostname: String,
}

/// Assembles response bodies for one service identity.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    identity: Arc<ServiceIdentity>,
}

impl ResponseBuilder {
    pub fn new(identity: Arc<ServiceIdentity>) -> Self {
        Self { identity }
    }

    pub fn envelope(&self, request_id: Option<&str>, rng: &mut dyn RandomSource) -> ResponseEnvelope {
        ResponseEnvelope {
            version: self.identity.version().to_owned(),
            behavior: self.identity.behavior().to_owned(),
            hostname: self.identity.hostname().to_owned(),
            timestamp: timestamp(),
            message: pick_message(self.identity.mode(), rng).to_owned(),
            headers: request_id.map(|id| BTreeMap::from([(X_REQUEST_ID.to_owned(), id.to_owned())])),
        }
    }

    pub fn data(&self, rng: &mut dyn RandomSource) -> DataPayload {
        DataPayload {
            items: rng.next_below(MAX_ITEMS),
            processed: true,
            version: self.identity.version().to_owned(),
            hostname: self.identity.hostname().to_owned(),
            timestamp: timestamp(),
        }
    }

    pub fn process(&self, elapsed: Duration) -> ProcessPayload {
        ProcessPayload {
            status: "completed".to_owned(),
            duration: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            version: self.identity.version().to_owned(),
            hostname: self.identity.hostname().to_owned(),
        }
    }

    pub fn healthy(&self) -> HealthyPayload {
        HealthyPayload {
            status: "healthy".to_owned(),
            version: self.identity.version().to_owned(),
            hostname: self.identity.hostname().to_owned(),
        }
    }

    pub fn unhealthy(&self) -> UnhealthyPayload {
        UnhealthyPayload {
            status: "unhealthy".to_owned(),
            reason: "simulated failure".to_owned(),
        }
    }

    pub fn failure(&self, status: StatusCode) -> ErrorPayload {
        ErrorPayload {
            error: status.canonical_reason().unwrap_or("Error").to_owned(),
            status: status.as_u16(),
            version: self.identity.version().to_owned(),
            hostname: self.identity.hostname().to_owned(),
        }
    }

    /// Final response for `endpoint` given the decision already applied.
    /// `elapsed` is the time since the request arrived, delay included.
    pub fn build(
        &self,
        endpoint: Endpoint,
        decision: &BehaviorDecision,
        elapsed: Duration,
        request_id: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> Response {
        let status = decision.status;
        match endpoint {
            Endpoint::Health if decision.is_success() => (status, Json(self.healthy())).into_response(),
            Endpoint::Health => (status, Json(self.unhealthy())).into_response(),
            _ if !decision.is_success() => (status, Json(self.failure(status))).into_response(),
            Endpoint::Root => (status, Json(self.envelope(request_id, rng))).into_response(),
            Endpoint::Data => (status, Json(self.data(rng))).into_response(),
            Endpoint::Process => (status, Json(self.process(elapsed))).into_response(),
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::entropy::ScriptedRandom;
    use axum::http::header::CONTENT_TYPE;

    fn builder() -> ResponseBuilder {
        ResponseBuilder::new(Arc::new(ServiceIdentity::new("2.1", "slow", "pod-3")))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_envelope_fields() {
        let mut rng = ScriptedRandom::new([0.0]);
        let env = builder().envelope(Some("req-1"), &mut rng);
        assert_eq!(env.version, "2.1");
        assert_eq!(env.behavior, "slow");
        assert_eq!(env.hostname, "pod-3");
        assert_eq!(env.message, "Service is experiencing delays");
        assert!(chrono::DateTime::parse_from_rfc3339(&env.timestamp).is_ok());
        assert_eq!(env.headers.unwrap()[X_REQUEST_ID], "req-1");
    }

    #[test]
    fn test_envelope_omits_empty_headers() {
        let env = builder().envelope(None, &mut ScriptedRandom::new([0.0]));
        let value = serde_json::to_value(&env).unwrap();
        assert!(value.get("headers").is_none());
    }

    #[test]
    fn test_data_items_in_range() {
        let b = builder();
        assert_eq!(b.data(&mut ScriptedRandom::new([0.0])).items, 0);
        assert_eq!(b.data(&mut ScriptedRandom::new([0.999])).items, 99);
        assert!(b.data(&mut ScriptedRandom::new([0.5])).processed);
    }

    #[test]
    fn test_process_reports_millis() {
        let p = builder().process(Duration::from_micros(734_900));
        assert_eq!(p.status, "completed");
        assert_eq!(p.duration, 734);
    }

    #[tokio::test]
    async fn test_build_failure_is_json() {
        let decision = BehaviorDecision {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            delay: Duration::ZERO,
        };
        let response = builder().build(
            Endpoint::Data,
            &decision,
            Duration::ZERO,
            None,
            &mut ScriptedRandom::new([]),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["status"], 500);
    }

    #[tokio::test]
    async fn test_build_unhealthy() {
        let decision = BehaviorDecision {
            status: StatusCode::SERVICE_UNAVAILABLE,
            delay: Duration::ZERO,
        };
        let response = builder().build(
            Endpoint::Health,
            &decision,
            Duration::ZERO,
            None,
            &mut ScriptedRandom::new([]),
        );
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["reason"], "simulated failure");
    }

    #[tokio::test]
    async fn test_build_healthy() {
        let response = builder().build(
            Endpoint::Health,
            &BehaviorDecision::ok(),
            Duration::ZERO,
            None,
            &mut ScriptedRandom::new([]),
        );
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], "2.1");
        assert_eq!(body["hostname"], "pod-3");
    }
}
