//! Route handlers.
//!
//! Every behavior-governed route runs the same pipeline:
//! ```text
//! decide (engine) → sleep injected delay → build body → record metrics
//! ```
//! The pipeline runs on its own task, so a caller that disconnects or
//! times out mid-delay never cuts the delay short or skips the metric
//! update. The scrape route bypasses the engine so it stays available
//! while failures are being injected.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::time::Instant;

use crate::http::request::{request_id, Endpoint};
use crate::http::server::AppState;

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn root(State(state): State<AppState>, method: Method, headers: HeaderMap) -> Response {
    serve(state, method, &headers, Endpoint::Root).await
}

pub async fn health(State(state): State<AppState>, method: Method, headers: HeaderMap) -> Response {
    serve(state, method, &headers, Endpoint::Health).await
}

pub async fn data(State(state): State<AppState>, method: Method, headers: HeaderMap) -> Response {
    serve(state, method, &headers, Endpoint::Data).await
}

pub async fn process(State(state): State<AppState>, method: Method, headers: HeaderMap) -> Response {
    serve(state, method, &headers, Endpoint::Process).await
}

/// Current metrics in Prometheus text format.
pub async fn scrape(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.run_upkeep();
    ([(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], state.metrics.render())
}

async fn serve(state: AppState, method: Method, headers: &HeaderMap, endpoint: Endpoint) -> Response {
    let started = Instant::now();
    let request_id = request_id(headers).map(str::to_owned);

    let pipeline = tokio::spawn(async move {
        run_pipeline(&state, &method, endpoint, started, request_id.as_deref()).await
    });

    match pipeline.await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, endpoint = endpoint.label(), "Request pipeline failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Decide, delay, build and record one request.
async fn run_pipeline(
    state: &AppState,
    method: &Method,
    endpoint: Endpoint,
    started: Instant,
    request_id: Option<&str>,
) -> Response {
    let mut rng = state.entropy.source();

    let decision = match endpoint {
        Endpoint::Health => state.engine.decide_health(&mut *rng),
        _ => state.engine.decide(&mut *rng),
    };

    if decision.is_delayed() {
        tracing::debug!(
            request_id = request_id.unwrap_or("unknown"),
            endpoint = endpoint.label(),
            delay_ms = decision.delay.as_millis() as u64,
            "Injecting delay"
        );
        tokio::time::sleep(decision.delay).await;
    }

    if !decision.is_success() {
        tracing::debug!(
            request_id = request_id.unwrap_or("unknown"),
            endpoint = endpoint.label(),
            status = decision.status.as_u16(),
            "Injecting failure"
        );
    }

    let response = state
        .responses
        .build(endpoint, &decision, started.elapsed(), request_id, &mut *rng);

    state.metrics.record_request(
        method.as_str(),
        endpoint.label(),
        response.status(),
        started.elapsed(),
    );

    response
}
