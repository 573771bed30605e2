//! Time abstraction traits for platform-agnostic timing.
//!
//! Sequencers never sleep. They read the current instant from a
//! [`TimeSource`] and report how long the caller may wait before the next
//! `service()` call.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq + PartialOrd {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
///
/// Instants must be ordered so deadlines can be compared against `now`.
pub trait TimeInstant: Copy + PartialOrd {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;
}

#[cfg(feature = "std")]
pub use self::std_clock::{StdClock, StdDuration, StdInstant};

#[cfg(feature = "std")]
mod std_clock {
    use super::{TimeDuration, TimeInstant, TimeSource};

    /// Newtype over `std::time::Duration`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub struct StdDuration(pub std::time::Duration);

    impl TimeDuration for StdDuration {
        const ZERO: Self = StdDuration(std::time::Duration::ZERO);

        fn as_millis(&self) -> u64 {
            u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
        }

        fn from_millis(millis: u64) -> Self {
            StdDuration(std::time::Duration::from_millis(millis))
        }

        fn saturating_sub(self, other: Self) -> Self {
            StdDuration(self.0.saturating_sub(other.0))
        }
    }

    /// Newtype over `std::time::Instant`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub struct StdInstant(pub std::time::Instant);

    impl TimeInstant for StdInstant {
        type Duration = StdDuration;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            StdDuration(self.0.saturating_duration_since(earlier.0))
        }

        fn checked_add(self, duration: Self::Duration) -> Option<Self> {
            self.0.checked_add(duration.0).map(StdInstant)
        }
    }

    /// Monotonic wall clock for hosted targets.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct StdClock;

    impl StdClock {
        pub fn new() -> Self {
            Self
        }
    }

    impl TimeSource<StdInstant> for StdClock {
        fn now(&self) -> StdInstant {
            StdInstant(std::time::Instant::now())
        }
    }
}
