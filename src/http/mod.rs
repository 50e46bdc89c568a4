//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, deadlines, tracing)
//!     → request.rs (endpoint label, correlation ID)
//!     → handlers.rs (behavior decision, injected delay)
//!     → response.rs (JSON envelope / payload)
//!     → metrics recorded with the final status
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{Endpoint, X_REQUEST_ID};
pub use response::ResponseBuilder;
pub use server::{AppState, HttpServer, ServerError};
