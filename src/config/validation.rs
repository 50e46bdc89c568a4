//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port in 1..=65535, timeouts > 0)
//! - Validate histogram bucket layout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - An unrecognized behavior is NOT an error; it runs as normal

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid port {0:?}: expected an integer in 1..=65535")]
    InvalidPort(String),

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("histogram buckets must not be empty")]
    EmptyBuckets,

    #[error("histogram buckets must be finite and strictly increasing")]
    UnorderedBuckets,

    #[error("upkeep interval must be greater than zero")]
    ZeroUpkeepInterval,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !matches!(config.listener.port.trim().parse::<u16>(), Ok(port) if port != 0) {
        errors.push(ValidationError::InvalidPort(config.listener.port.clone()));
    } else if config.listener.bind_address().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.host.clone()));
    }

    if config.timeouts.read_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("read_secs"));
    }
    if config.timeouts.write_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("write_secs"));
    }

    let buckets = &config.observability.histogram_buckets;
    if buckets.is_empty() {
        errors.push(ValidationError::EmptyBuckets);
    } else if buckets.iter().any(|b| !b.is_finite())
        || buckets.windows(2).any(|pair| pair[0] >= pair[1])
    {
        errors.push(ValidationError::UnorderedBuckets);
    }

    if config.observability.upkeep_interval_secs == 0 {
        errors.push(ValidationError::ZeroUpkeepInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
