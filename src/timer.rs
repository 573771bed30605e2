//! Single-timer slots.
//!
//! A [`TimerSlot`] holds at most one pending deadline for one timeline.
//! Arming replaces whatever was pending, so two advances can never be queued
//! against the same step.

use crate::time::{TimeDuration, TimeInstant};

/// One pending deadline, or none.
#[derive(Debug, Clone, Copy)]
pub struct TimerSlot<I: TimeInstant> {
    deadline: Option<I>,
}

impl<I: TimeInstant> TimerSlot<I> {
    /// Creates a disarmed slot.
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arms the slot to fire `delay` after `now`, cancelling any pending
    /// deadline first.
    ///
    /// On clock overflow the slot fires at `now`.
    pub fn arm(&mut self, now: I, delay: I::Duration) {
        self.deadline = Some(now.checked_add(delay).unwrap_or(now));
    }

    /// Cancels the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<I> {
        self.deadline
    }

    /// True if the slot is armed and its deadline has passed.
    pub fn is_due(&self, now: I) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Fires the slot if due. A fired slot is disarmed, so each arming
    /// fires at most once.
    pub fn poll(&mut self, now: I) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Time left until the deadline, zero if overdue, `None` if disarmed.
    pub fn remaining(&self, now: I) -> Option<I::Duration> {
        self.deadline.map(|deadline| {
            if now >= deadline {
                I::Duration::ZERO
            } else {
                deadline.duration_since(now)
            }
        })
    }
}

impl<I: TimeInstant> Default for TimerSlot<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Earliest of two optional delays.
pub(crate) fn earliest<D: TimeDuration>(a: Option<D>, b: Option<D>) -> Option<D> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b < a { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}
