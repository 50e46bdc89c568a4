//! Status messages shown in the response envelope.

use crate::behavior::entropy::RandomSource;
use crate::behavior::mode::BehaviorMode;

const NORMAL: &[&str] = &[
    "Service operating normally",
    "All systems functional",
    "Request processed successfully",
];

const SLOW: &[&str] = &[
    "Service is experiencing delays",
    "Processing taking longer than usual",
    "High latency detected",
];

const ERROR_PRONE: &[&str] = &["Service unstable", "Errors may occur", "Degraded performance"];

const CHAOTIC: &[&str] = &[
    "Unpredictable behavior",
    "System under stress",
    "Erratic performance",
];

/// The fixed message set owned by `mode`.
pub fn messages_for(mode: BehaviorMode) -> &'static [&'static str] {
    match mode {
        BehaviorMode::Normal => NORMAL,
        BehaviorMode::Slow => SLOW,
        BehaviorMode::ErrorProne => ERROR_PRONE,
        BehaviorMode::Chaotic => CHAOTIC,
    }
}

/// Pick one message uniformly from the mode's set.
pub fn pick_message(mode: BehaviorMode, rng: &mut dyn RandomSource) -> &'static str {
    let set = messages_for(mode);
    set[rng.next_below(set.len() as u32) as usize]
}
