//! Bounded timing probe for patterns with backtracking shapes.
//!
//! One `is_match` call against a short adversarial input, under its own step
//! limit. The probe never fails outward: a pattern that does not compile
//! simply yields no measurement.

use crate::config::ProbeConfig;
use crate::core::flags::Flags;
use crate::engine::{EngineError, Regex};
use log::debug;
use std::time::{Duration, Instant};

const FILLER: char = 'a';
const FILLER_LEN: usize = 28;
const TERMINATOR: char = '!';

/// `aaaa…a!`: long enough to expose exponential blow-up, short enough to stay
/// cheap for well-behaved patterns.
pub fn adversarial_input() -> String {
    let mut input: String = std::iter::repeat_n(FILLER, FILLER_LEN).collect();
    input.push(TERMINATOR);
    input
}

/// Times a single match attempt. Hitting the step limit still counts as a
/// measurement: the call returned within its bound.
pub fn measure(source: &str, flags: Flags, config: &ProbeConfig) -> Option<Duration> {
    let regex = match Regex::new(source, flags.without_global()) {
        Ok(regex) => regex.with_step_limit(config.step_limit),
        Err(e) => {
            debug!("probe skipped, pattern did not compile: {}", e);
            return None;
        }
    };

    let input = adversarial_input();
    let started = Instant::now();
    let outcome = regex.is_match(&input);
    let elapsed = started.elapsed();

    match outcome {
        Ok(_) | Err(EngineError::StepLimitExceeded) => {
            debug!("probe finished in {:?} ({:?})", elapsed, outcome);
            Some(elapsed)
        }
        Err(e) => {
            debug!("probe failed: {}", e);
            None
        }
    }
}

/// Note attached to the backtracking warning when the probe was slow.
pub fn slow_probe_note(source: &str, flags: Flags, config: &ProbeConfig) -> Option<String> {
    if !config.enabled {
        return None;
    }
    let elapsed = measure(source, flags, config)?;
    let millis = elapsed.as_secs_f64() * 1000.0;
    if millis > config.threshold_ms as f64 {
        Some(format!(
            "A bounded probe on a {}-character near-miss input took about {} ms",
            FILLER_LEN + 1,
            millis.round() as u64
        ))
    } else {
        None
    }
}
