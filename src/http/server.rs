//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, deadlines, request ID)
//! - Own the metrics registry and its upkeep task
//! - Bind server to listener and serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

use crate::behavior::{provider_for, BehaviorEngine, EntropyProvider};
use crate::config::{ListenerConfig, ServiceConfig};
use crate::http::handlers;
use crate::http::response::ResponseBuilder;
use crate::identity::ServiceIdentity;
use crate::observability::{MetricsError, RequestMetrics};

/// Error type for server setup and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: BehaviorEngine,
    pub responses: ResponseBuilder,
    pub metrics: Arc<RequestMetrics>,
    pub entropy: Arc<dyn EntropyProvider>,
}

/// HTTP server for the behavior-injection service.
pub struct HttpServer {
    router: Router,
    metrics: Arc<RequestMetrics>,
    upkeep_interval: Duration,
}

impl HttpServer {
    /// Create a server whose random source follows the configured seed.
    pub fn new(config: &ServiceConfig, identity: ServiceIdentity) -> Result<Self, ServerError> {
        Self::with_entropy(config, identity, provider_for(config.service.seed))
    }

    /// Create a server drawing behavior from `entropy`.
    pub fn with_entropy(
        config: &ServiceConfig,
        identity: ServiceIdentity,
        entropy: Arc<dyn EntropyProvider>,
    ) -> Result<Self, ServerError> {
        let identity = Arc::new(identity);
        let metrics = Arc::new(RequestMetrics::new(
            &config.observability.histogram_buckets,
            &identity,
        )?);

        let state = AppState {
            engine: BehaviorEngine::new(identity.mode()),
            responses: ResponseBuilder::new(identity),
            metrics: metrics.clone(),
            entropy,
        };

        let router = Self::build_router(config, state);
        Ok(Self {
            router,
            metrics,
            upkeep_interval: Duration::from_secs(config.observability.upkeep_interval_secs),
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(handlers::root))
            .route("/health", any(handlers::health))
            .route("/api/data", any(handlers::data))
            .route("/api/process", any(handlers::process))
            .route("/metrics", any(handlers::scrape))
            .fallback(handlers::root)
            .with_state(state)
            .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(
                config.timeouts.read_secs,
            )))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.write_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Router with state and middleware applied, for in-process serving.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn metrics(&self) -> Arc<RequestMetrics> {
        self.metrics.clone()
    }

    /// Bind the configured listener address.
    pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ServerError> {
        let addr = config.bind_address()?;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::Serve)?;
        tracing::info!(address = %addr, "HTTP server starting");

        let _upkeep = UpkeepGuard(tokio::spawn(run_upkeep(
            self.metrics.clone(),
            self.upkeep_interval,
            shutdown.resubscribe(),
        )));

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Aborts the upkeep task when `run` returns, on success or error.
struct UpkeepGuard(JoinHandle<()>);

impl Drop for UpkeepGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Periodically fold pending histogram samples into buckets.
async fn run_upkeep(
    metrics: Arc<RequestMetrics>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => metrics.run_upkeep(),
            _ = shutdown.recv() => {
                tracing::debug!("Metrics upkeep stopping");
                break;
            }
        }
    }
}
