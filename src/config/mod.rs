//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → optional TOML file (loader.rs)
//!     → environment: VERSION, BEHAVIOR, PORT, ...
//!     → command-line overrides
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → ServiceIdentity built once, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a new behavior needs a new process
//! - All fields have defaults to allow an empty environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, Overrides};
pub use schema::{ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig, TimeoutConfig};
pub use validation::ValidationError;
