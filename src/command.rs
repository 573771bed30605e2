//! Command-based control for sequencers.
//!
//! User input (mount/unmount, dashboard edits, configuration picks) is
//! expressed as [`SignalCommand`] values and dispatched with each
//! sequencer's `handle_command`. Dashboard text fields go through
//! [`parse_duration_millis`] and `Lamp::from_str` first.

use crate::error::ConfigError;
use crate::lamp::Lamp;
use crate::table::validate_duration;
use crate::time::TimeDuration;

/// Actions for controlling sequencers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalCommand<'a, D: TimeDuration> {
    /// Mount: arm timers and drive the head(s).
    Start,
    /// Unmount: cancel every timer.
    Stop,
    /// Advance now instead of waiting for the timer.
    Advance,
    /// Override one light of a coordinated group.
    SetLightColor { index: usize, lamp: Lamp },
    /// Change how long a lamp stays lit in the shared table.
    SetDuration { lamp: Lamp, duration: D },
    /// Switch to a named catalog configuration.
    SelectConfiguration(&'a str),
}

impl<'a, D: TimeDuration> SignalCommand<'a, D> {
    /// Builds a light override from dashboard text.
    pub fn set_light_color_from_text(index: usize, lamp: &str) -> Result<Self, ConfigError> {
        Ok(SignalCommand::SetLightColor {
            index,
            lamp: lamp.parse()?,
        })
    }

    /// Builds a duration edit from dashboard text.
    ///
    /// Empty, non-numeric, zero and negative input is rejected rather than
    /// turned into a timer that fires at once or never.
    pub fn set_duration_from_text(lamp: &str, millis: &str) -> Result<Self, ConfigError> {
        let lamp = lamp.parse()?;
        let duration = validate_duration(D::from_millis(parse_duration_millis(millis)?))?;
        Ok(SignalCommand::SetDuration { lamp, duration })
    }
}

/// Parses a dashboard duration field as whole milliseconds.
///
/// # Errors
/// `InvalidDuration` for empty, non-numeric, fractional, zero or negative text.
pub fn parse_duration_millis(text: &str) -> Result<u64, ConfigError> {
    let millis: i64 = text.trim().parse().map_err(|_| ConfigError::InvalidDuration)?;
    if millis <= 0 {
        return Err(ConfigError::InvalidDuration);
    }
    Ok(millis as u64)
}
