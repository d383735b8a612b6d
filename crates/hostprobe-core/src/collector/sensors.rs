//! CPU temperature extraction from `sensors` (lm-sensors) output.
//!
//! Different boards expose the CPU temperature under different labels. The
//! labels live in an ordered table; the first one present in the output wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::collector::error::CollectError;
use crate::collector::traits::CommandRunner;

/// Command that prints sensor readings.
pub const SENSORS_COMMAND: &str = "sensors";

/// Sensor labels in order of preference.
///
/// `CPU` is reported by asus-ec boards, `Tctl` and `Tccd1` by AMD k10temp.
pub const TEMPERATURE_LABELS: &[&str] = &["CPU", "Tctl", "Tccd1"];

static TEMPERATURE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TEMPERATURE_LABELS
        .iter()
        .map(|label| (*label, temperature_pattern(label)))
        .collect()
});

/// Builds `<label>: +<int>.<frac>°C` with the integer part captured.
fn temperature_pattern(label: &str) -> Regex {
    let pattern = format!(r"{}:\s*\+(\d+)\.\d+°C", regex::escape(label));
    // Labels are escaped, so the pattern is always valid.
    Regex::new(&pattern).expect("escaped temperature pattern is valid")
}

/// Finds the CPU temperature in `sensors` output.
///
/// Returns whole degrees Celsius (fraction truncated) from the first label in
/// [`TEMPERATURE_LABELS`] that matches, or `NotFound` when none do.
pub fn parse_temperature(output: &str) -> Result<i32, CollectError> {
    for (label, pattern) in TEMPERATURE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(output) else {
            continue;
        };
        if let Ok(temp) = caps[1].parse::<i32>() {
            tracing::trace!(label, temp, "cpu temperature matched");
            return Ok(temp);
        }
    }

    Err(CollectError::NotFound(
        "no CPU temperature found in sensors output".to_string(),
    ))
}

/// Runs the sensors command and extracts the CPU temperature.
pub fn read_temperature<C: CommandRunner>(commands: &C) -> Result<i32, CollectError> {
    let output = commands
        .run(SENSORS_COMMAND, &[])
        .map_err(|e| CollectError::command(SENSORS_COMMAND, e))?;
    parse_temperature(&output)
}
