//! Shared test infrastructure for signal-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use signal_sequencer::{Frame, LampSet, SignalHead, TimeDuration, TimeInstant, TimeSource};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Signal Head
// ============================================================================

/// Mock head that records the lit lamps of every frame it is shown
pub struct MockHead {
    last: Frame,
    history: heapless::Vec<LampSet, 64>,
}

impl MockHead {
    pub fn new() -> Self {
        Self {
            last: Frame::dark(),
            history: heapless::Vec::new(),
        }
    }

    pub fn last_frame(&self) -> &Frame {
        &self.last
    }

    /// Lit lamps of each frame shown, oldest first
    pub fn history(&self) -> &[LampSet] {
        &self.history
    }

    pub fn show_count(&self) -> usize {
        self.history.len()
    }
}

impl SignalHead for MockHead {
    fn show(&mut self, frame: &Frame) {
        self.last = frame.clone();
        let _ = self.history.push(frame.lit());
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub fn ms(millis: u64) -> TestDuration {
    TestDuration(millis)
}
