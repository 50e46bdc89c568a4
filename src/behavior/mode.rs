//! Behavior modes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Policy governing how a request's outcome is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BehaviorMode {
    /// Always 200, no delay.
    #[default]
    Normal,
    /// Always 200 after a delay in [200ms, 1000ms).
    Slow,
    /// 500 half of the time.
    ErrorProne,
    /// Independent delay and error draws.
    Chaotic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized behavior {0:?}")]
pub struct UnknownBehavior(pub String);

impl BehaviorMode {
    pub const ALL: [BehaviorMode; 4] = [
        BehaviorMode::Normal,
        BehaviorMode::Slow,
        BehaviorMode::ErrorProne,
        BehaviorMode::Chaotic,
    ];

    /// Parse a configured value, falling back to `Normal` for anything
    /// unrecognized.
    pub fn from_config(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorMode::Normal => "normal",
            BehaviorMode::Slow => "slow",
            BehaviorMode::ErrorProne => "error-prone",
            BehaviorMode::Chaotic => "chaotic",
        }
    }
}

impl FromStr for BehaviorMode {
    type Err = UnknownBehavior;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(BehaviorMode::Normal),
            "slow" => Ok(BehaviorMode::Slow),
            "error-prone" => Ok(BehaviorMode::ErrorProne),
            "chaotic" => Ok(BehaviorMode::Chaotic),
            other => Err(UnknownBehavior(other.to_string())),
        }
    }
}

impl fmt::Display for BehaviorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
