//! Error types shared by the configuration stores and the sequencers.

use crate::lamp::Lamp;

/// Configuration validation and lookup errors.
///
/// Raised when a transition table or catalog is built, when a dashboard edit
/// is rejected, or when an unknown configuration is selected. All of them
/// leave the previous state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Transition table has no entries.
    EmptyTable,

    /// The same lamp was given two transition entries.
    DuplicateLamp(Lamp),

    /// A transition points at a lamp that has no entry of its own.
    DanglingTransition { from: Lamp, to: Lamp },

    /// Lamp is not part of the table or layout being addressed.
    UnknownLamp(Lamp),

    /// Duration is zero, negative or not a number.
    InvalidDuration,

    /// Fixed capacity exceeded.
    CapacityExceeded,

    /// Configuration has no steps.
    EmptySequence,

    /// Configuration has no lamps.
    EmptyLayout,

    /// A step lights a lamp missing from the configuration's layout.
    LampNotInLayout(Lamp),

    /// Catalog has no configurations.
    EmptyCatalog,

    /// Two catalog entries share a name.
    DuplicateConfiguration,

    /// Configuration name is empty.
    EmptyName,

    /// No catalog entry with the requested name.
    UnknownConfiguration,

    /// Text does not name a lamp.
    UnknownLampName,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::EmptyTable => write!(f, "transition table must have at least one entry"),
            ConfigError::DuplicateLamp(lamp) => {
                write!(f, "lamp {} has more than one transition entry", lamp)
            }
            ConfigError::DanglingTransition { from, to } => {
                write!(f, "transition {} -> {} points outside the table", from, to)
            }
            ConfigError::UnknownLamp(lamp) => write!(f, "lamp {} is not configured", lamp),
            ConfigError::InvalidDuration => {
                write!(f, "duration must be a positive number of milliseconds")
            }
            ConfigError::CapacityExceeded => write!(f, "configuration capacity exceeded"),
            ConfigError::EmptySequence => {
                write!(f, "configuration must have at least one step")
            }
            ConfigError::EmptyLayout => write!(f, "configuration must have at least one lamp"),
            ConfigError::LampNotInLayout(lamp) => {
                write!(f, "step lights {} which is not in the layout", lamp)
            }
            ConfigError::EmptyCatalog => {
                write!(f, "catalog must have at least one configuration")
            }
            ConfigError::DuplicateConfiguration => {
                write!(f, "configuration name already in catalog")
            }
            ConfigError::EmptyName => write!(f, "configuration name must not be empty"),
            ConfigError::UnknownConfiguration => write!(f, "no configuration with that name"),
            ConfigError::UnknownLampName => write!(f, "unrecognized lamp name"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Lifecycle states shared by every sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// Not mounted. No timer is armed and the head is not driven.
    Stopped,
    /// Timers armed; `service()` advances the lights.
    Running,
}

/// Errors that can occur during sequencer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// Operation called from an invalid state.
    InvalidState {
        expected: SequencerState,
        actual: SequencerState,
    },

    /// Light index outside the coordinated group.
    InvalidLight { index: usize, count: usize },

    /// Command not understood by this kind of sequencer.
    UnsupportedCommand,

    /// A configuration edit or selection was rejected.
    Config(ConfigError),
}

impl core::fmt::Display for SequencerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequencerError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {:?}, but sequencer is {:?}",
                    expected, actual
                )
            }
            SequencerError::InvalidLight { index, count } => {
                write!(f, "light {} out of range (group has {})", index, count)
            }
            SequencerError::UnsupportedCommand => {
                write!(f, "command not supported by this sequencer")
            }
            SequencerError::Config(err) => write!(f, "configuration error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequencerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SequencerError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SequencerError {
    fn from(err: ConfigError) -> Self {
        SequencerError::Config(err)
    }
}
