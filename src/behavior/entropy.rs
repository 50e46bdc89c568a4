//! Random sources for behavior draws.
//!
//! # Responsibilities
//! - Abstract the uniform draws the behavior policy needs
//! - Hand each request its own source (no shared RNG lock)
//! - Allow seeded and scripted sources for reproducible tests
//!
//! # Design Decisions
//! - A provider builds one source per request; sources are never shared
//! - Seeded providers derive a distinct seed per request from a counter

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draws used by the behavior policy and response builder.
pub trait RandomSource: Send {
    /// A uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// A uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn next_below(&mut self, bound: u32) -> u32;
}

/// Builds a fresh [`RandomSource`] for each request.
pub trait EntropyProvider: Send + Sync + fmt::Debug {
    fn source(&self) -> Box<dyn RandomSource>;
}

/// [`RandomSource`] backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            0
        } else {
            self.0.gen_range(0..bound)
        }
    }
}

/// Fresh OS entropy for every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropyProvider for OsEntropy {
    fn source(&self) -> Box<dyn RandomSource> {
        Box::new(StdRandom::from_entropy())
    }
}

/// Deterministic per-request sources derived from one seed.
///
/// The n-th source handed out is the same across runs, so a replayed
/// sequence of requests sees the same sequence of outcomes.
#[derive(Debug)]
pub struct SeededEntropy {
    seed: u64,
    issued: AtomicU64,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            issued: AtomicU64::new(0),
        }
    }
}

impl EntropyProvider for SeededEntropy {
    fn source(&self) -> Box<dyn RandomSource> {
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        // Golden-ratio stride; request n always maps to the same seed.
        let seed = self.seed ^ n.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Box::new(StdRandom::seeded(seed))
    }
}

/// Pick the provider for an optional configured seed.
pub fn provider_for(seed: Option<u64>) -> Arc<dyn EntropyProvider> {
    match seed {
        Some(seed) => Arc::new(SeededEntropy::new(seed)),
        None => Arc::new(OsEntropy),
    }
}

/// Replays a fixed list of draws, then repeats the fallback value.
///
/// Integer draws reuse the unit list: a unit `u` maps to `floor(u * bound)`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new<I: IntoIterator<Item = f64>>(draws: I) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        let unit = self.next_unit().clamp(0.0, 1.0);
        ((unit * f64::from(bound)) as u32).min(bound.saturating_sub(1))
    }
}

/// Every request gets a clone of the same script.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy(ScriptedRandom);

impl ScriptedEntropy {
    pub fn new(script: ScriptedRandom) -> Self {
        Self(script)
    }
}

impl EntropyProvider for ScriptedEntropy {
    fn source(&self) -> Box<dyn RandomSource> {
        Box::new(self.0.clone())
    }
}
