//! Behavior injection subsystem.
//!
//! # Data Flow
//! ```text
//! BEHAVIOR (configured once)
//!     → mode.rs (parse; unrecognized → normal)
//!     → engine.rs (per-request status + delay decision)
//!         ← entropy.rs (one random source per request)
//!     → messages.rs (cosmetic per-mode message)
//! ```
//!
//! # Design Decisions
//! - The mode never changes after startup; a new mode is a new process
//! - The engine is pure apart from the random source it is handed
//! - Chaotic delay and error are two independent draws

pub mod engine;
pub mod entropy;
pub mod messages;
pub mod mode;

pub use engine::{BehaviorDecision, BehaviorEngine};
pub use entropy::{
    provider_for, EntropyProvider, OsEntropy, RandomSource, ScriptedEntropy, ScriptedRandom,
    SeededEntropy, StdRandom,
};
pub use mode::BehaviorMode;
