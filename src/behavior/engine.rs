//! Per-request behavior decisions.
//!
//! # Policy
//! ```text
//! normal       200, no delay
//! slow         200 after 200ms + U[0, 800)ms
//! error-prone  500 if U < 0.5, else 200; no delay
//! chaotic      delay 500ms + U[0, 1000)ms if U1 < 0.3
//!              then 500 if U2 < 0.4, else 200
//! ```
//!
//! Health probes follow a narrower rule: 503 with probability 0.3 in
//! error-prone mode, 200 otherwise.
//!
//! # Draw order
//! Draws are consumed in the order listed above (delay decision, delay
//! length when delayed, then status). Scripted sources rely on it.

use std::time::Duration;

use axum::http::StatusCode;

use crate::behavior::entropy::RandomSource;
use crate::behavior::mode::BehaviorMode;

pub const SLOW_DELAY_MIN_MS: u64 = 200;
pub const SLOW_DELAY_SPAN_MS: u32 = 800;

pub const ERROR_PRONE_FAILURE_RATE: f64 = 0.5;

pub const CHAOTIC_DELAY_RATE: f64 = 0.3;
pub const CHAOTIC_DELAY_MIN_MS: u64 = 500;
pub const CHAOTIC_DELAY_SPAN_MS: u32 = 1000;
pub const CHAOTIC_FAILURE_RATE: f64 = 0.4;

pub const HEALTH_FAILURE_RATE: f64 = 0.3;

/// Outcome chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorDecision {
    pub status: StatusCode,
    pub delay: Duration,
}

impl BehaviorDecision {
    pub const fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            delay: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_delayed(&self) -> bool {
        !self.delay.is_zero()
    }
}

/// Applies the configured mode's probability model.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorEngine {
    mode: BehaviorMode,
}

impl BehaviorEngine {
    pub fn new(mode: BehaviorMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> BehaviorMode {
        self.mode
    }

    /// Decide status and delay for a content route.
    pub fn decide(&self, rng: &mut dyn RandomSource) -> BehaviorDecision {
        match self.mode {
            BehaviorMode::Normal => BehaviorDecision::ok(),
            BehaviorMode::Slow => {
                let ms = SLOW_DELAY_MIN_MS + u64::from(rng.next_below(SLOW_DELAY_SPAN_MS));
                BehaviorDecision {
                    status: StatusCode::OK,
                    delay: Duration::from_millis(ms),
                }
            }
            BehaviorMode::ErrorProne => BehaviorDecision {
                status: failure_if(rng.next_unit() < ERROR_PRONE_FAILURE_RATE),
                delay: Duration::ZERO,
            },
            BehaviorMode::Chaotic => {
                let delay = if rng.next_unit() < CHAOTIC_DELAY_RATE {
                    let ms =
                        CHAOTIC_DELAY_MIN_MS + u64::from(rng.next_below(CHAOTIC_DELAY_SPAN_MS));
                    Duration::from_millis(ms)
                } else {
                    Duration::ZERO
                };
                // Independent of the delay draw above.
                let status = failure_if(rng.next_unit() < CHAOTIC_FAILURE_RATE);
                BehaviorDecision { status, delay }
            }
        }
    }

    /// Decide the health probe outcome.
    pub fn decide_health(&self, rng: &mut dyn RandomSource) -> BehaviorDecision {
        match self.mode {
            BehaviorMode::ErrorProne if rng.next_unit() < HEALTH_FAILURE_RATE => BehaviorDecision {
                status: StatusCode::SERVICE_UNAVAILABLE,
                delay: Duration::ZERO,
            },
            _ => BehaviorDecision::ok(),
        }
    }
}

fn failure_if(fail: bool) -> StatusCode {
    if fail {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}
