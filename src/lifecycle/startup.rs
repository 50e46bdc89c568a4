//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the service identity from validated configuration
//! - Initialize metrics and the router
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal (exit code 1)
//! - Listener binds last, after every subsystem is ready

use crate::config::ServiceConfig;
use crate::http::{HttpServer, ServerError};
use crate::identity::ServiceIdentity;
use crate::lifecycle::Shutdown;

/// Run the service with `config` until SIGINT/SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), ServerError> {
    let identity = ServiceIdentity::from_config(&config);

    if !identity.behavior_recognized() {
        tracing::warn!(
            behavior = identity.behavior(),
            "Unrecognized behavior, serving as normal"
        );
    }

    tracing::info!(
        version = identity.version(),
        behavior = identity.behavior(),
        mode = %identity.mode(),
        hostname = identity.hostname(),
        port = %config.listener.port,
        seeded = config.service.seed.is_some(),
        "Starting server"
    );

    let server = HttpServer::new(&config, identity)?;
    let listener = HttpServer::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let signals = shutdown.trigger_on_signal();
    let result = server.run(listener, shutdown.subscribe()).await;
    signals.abort();

    result
}
