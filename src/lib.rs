#![cfg_attr(not(feature = "std"), no_std)]

//! Timer-driven traffic signal sequencing for embedded and hosted targets.
//!
//! Three sequencers share one model: the host supplies a clock through
//! [`TimeSource`] and an output through [`SignalHead`], and calls
//! `service()` whenever the returned [`ServiceTiming`] delay has passed.
//! Nothing here sleeps or spawns; every pending timer lives in an explicit
//! [`TimerSlot`] that is cancelled before it is re-armed.
//!
//! # Core Concepts
//!
//! - **`TransitionTable`**: lamp → (duration, next lamp, style), validated to be total
//! - **`SignalSequencer`**: one head cycling through a transition table
//! - **`CoordinatedSequencer`**: a group of heads advanced in staggered batches,
//!   with dashboard overrides and live duration edits
//! - **`Catalog`** / **`Configuration`**: named layouts with looping step sequences
//! - **`PatternSequencer`**: plays one catalog configuration, switchable by name
//! - **`SignalCommand`**: user input as values, dispatched with `handle_command`
//! - **`Frame`**: lens colours rendered from a layout and the set of lit lamps
//!
//! Colours are `Srgb<f32>` (0.0-1.0 range). Unlit lenses are drawn faded
//! toward the housing colour rather than black.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

#[macro_use]
mod fmt;

pub mod catalog;
pub mod command;
pub mod coordinated;
pub mod display;
pub mod error;
pub mod lamp;
pub mod sequencer;
pub mod style;
pub mod switcher;
pub mod table;
pub mod time;
pub mod timer;

pub use catalog::{Catalog, CatalogBuilder, Configuration, ConfigurationBuilder, Step};
pub use command::{SignalCommand, parse_duration_millis};
pub use coordinated::{CoordinatedSequencer, DEFAULT_STAGGER_MS};
pub use display::{Frame, Lens, SignalHead};
pub use error::{ConfigError, SequencerError, SequencerState};
pub use lamp::{Lamp, LampSet};
pub use sequencer::{ServiceTiming, SignalSequencer};
pub use style::LampStyle;
pub use switcher::PatternSequencer;
pub use table::{MIN_DURATION_MS, Transition, TransitionTable, TransitionTableBuilder};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use timer::TimerSlot;

#[cfg(feature = "std")]
pub use time::{StdClock, StdDuration, StdInstant};

/// Table capacity that fits every lamp.
pub const FULL_TABLE: usize = Lamp::ALL.len();

/// Single-light sequencer whose table can hold every lamp.
pub type SignalSequencer4<'t, I, H, T> = SignalSequencer<'t, I, H, T, FULL_TABLE>;

/// Coordinated group of `L` lights whose table can hold every lamp.
pub type CoordinatedSequencer4<'t, I, H, T, const L: usize> =
    CoordinatedSequencer<'t, I, H, T, L, FULL_TABLE>;

/// Pattern sequencer sized for the built-in catalog.
pub type BuiltinPatternSequencer<'t, I, H, T> = PatternSequencer<
    't,
    I,
    H,
    T,
    { catalog::BUILTIN_CONFIGURATIONS },
    { catalog::BUILTIN_STEPS },
>;

/// Catalog sized for the built-in configurations.
pub type BuiltinCatalog<D> =
    Catalog<D, { catalog::BUILTIN_CONFIGURATIONS }, { catalog::BUILTIN_STEPS }>;

#[cfg(test)]
mod test_support;
