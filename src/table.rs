//! Cyclic transition tables.
//!
//! A [`TransitionTable`] maps each configured lamp to how long it stays lit,
//! which lamp follows it, and how it is drawn. Tables are validated when
//! built: every `next` must name another entry, so advancing is total and
//! the walk from any lamp ends in a cycle.

use crate::error::ConfigError;
use crate::lamp::Lamp;
use crate::style::LampStyle;
use crate::time::TimeDuration;
use heapless::Vec;

/// Shortest duration accepted anywhere a lamp or step is timed.
pub const MIN_DURATION_MS: u64 = 1;

/// Checks that a duration is at least [`MIN_DURATION_MS`].
pub fn validate_duration<D: TimeDuration>(duration: D) -> Result<D, ConfigError> {
    if duration.as_millis() < MIN_DURATION_MS {
        return Err(ConfigError::InvalidDuration);
    }
    Ok(duration)
}

/// One row of a transition table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<D: TimeDuration> {
    /// Lamp this row describes.
    pub lamp: Lamp,

    /// How long the lamp stays lit.
    pub duration: D,

    /// Lamp lit after this one.
    pub next: Lamp,

    /// How the lamp is drawn.
    pub style: LampStyle,
}

/// A validated cyclic transition table.
///
/// # Type Parameters
/// * `D` - The duration type
/// * `N` - Maximum number of entries
#[derive(Debug, Clone)]
pub struct TransitionTable<D: TimeDuration, const N: usize> {
    entries: Vec<Transition<D>, N>,
}

impl<D: TimeDuration, const N: usize> TransitionTable<D, N> {
    /// Creates a new table builder.
    pub fn builder() -> TransitionTableBuilder<D, N> {
        TransitionTableBuilder::new()
    }

    /// The stock three-aspect cycle: red 5 s, green 3 s, yellow 1 s.
    ///
    /// # Errors
    /// `CapacityExceeded` if `N < 3`.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::builder()
            .entry(Lamp::Red, D::from_millis(5000), Lamp::Green)?
            .entry(Lamp::Green, D::from_millis(3000), Lamp::Yellow)?
            .entry(Lamp::Yellow, D::from_millis(1000), Lamp::Red)?
            .build()
    }

    pub fn get(&self, lamp: Lamp) -> Option<&Transition<D>> {
        self.entries.iter().find(|entry| entry.lamp == lamp)
    }

    pub fn contains(&self, lamp: Lamp) -> bool {
        self.get(lamp).is_some()
    }

    /// Lamp that follows `lamp`, `None` if `lamp` is not configured.
    pub fn next(&self, lamp: Lamp) -> Option<Lamp> {
        self.get(lamp).map(|entry| entry.next)
    }

    pub fn duration(&self, lamp: Lamp) -> Option<D> {
        self.get(lamp).map(|entry| entry.duration)
    }

    pub fn style(&self, lamp: Lamp) -> Option<&LampStyle> {
        self.get(lamp).map(|entry| &entry.style)
    }

    /// Replaces a lamp's duration. Links and styles never change.
    ///
    /// # Errors
    /// * `UnknownLamp` - lamp has no entry
    /// * `InvalidDuration` - duration below [`MIN_DURATION_MS`]
    pub fn set_duration(&mut self, lamp: Lamp, duration: D) -> Result<(), ConfigError> {
        let duration = validate_duration(duration)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.lamp == lamp)
            .ok_or(ConfigError::UnknownLamp(lamp))?;
        entry.duration = duration;
        Ok(())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Transition<D>] {
        &self.entries
    }

    /// Lamps and their styles in insertion order, for rendering.
    pub fn layout(&self) -> impl Iterator<Item = (Lamp, &LampStyle)> {
        self.entries.iter().map(|entry| (entry.lamp, &entry.style))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of advances needed to come back to `start`.
    ///
    /// Returns `None` if `start` is not configured or only leads into a
    /// cycle without being part of it.
    pub fn period(&self, start: Lamp) -> Option<usize> {
        let mut lamp = self.next(start)?;
        for steps in 1..=self.entries.len() {
            if lamp == start {
                return Some(steps);
            }
            lamp = self.next(lamp)?;
        }
        None
    }

    /// Sum of the durations around the cycle containing `start`.
    pub fn cycle_duration(&self, start: Lamp) -> Option<D> {
        let period = self.period(start)?;
        let mut lamp = start;
        let mut total = 0u64;
        for _ in 0..period {
            total = total.saturating_add(self.duration(lamp)?.as_millis());
            lamp = self.next(lamp)?;
        }
        Some(D::from_millis(total))
    }
}

/// Builder for constructing validated transition tables.
#[derive(Debug)]
pub struct TransitionTableBuilder<D: TimeDuration, const N: usize> {
    entries: Vec<Transition<D>, N>,
}

impl<D: TimeDuration, const N: usize> TransitionTableBuilder<D, N> {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an entry drawn with the lamp's stock style.
    ///
    /// # Errors
    /// `CapacityExceeded` if the table already holds `N` entries.
    pub fn entry(self, lamp: Lamp, duration: D, next: Lamp) -> Result<Self, ConfigError> {
        self.entry_styled(lamp, duration, next, LampStyle::default_for(lamp))
    }

    /// Adds an entry with an explicit style.
    ///
    /// # Errors
    /// `CapacityExceeded` if the table already holds `N` entries.
    pub fn entry_styled(
        mut self,
        lamp: Lamp,
        duration: D,
        next: Lamp,
        style: LampStyle,
    ) -> Result<Self, ConfigError> {
        self.entries
            .push(Transition {
                lamp,
                duration,
                next,
                style,
            })
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds and validates the table.
    ///
    /// # Errors
    /// * `EmptyTable` - No entries were added
    /// * `DuplicateLamp` - A lamp has two entries
    /// * `DanglingTransition` - A `next` names a lamp without an entry
    /// * `InvalidDuration` - A duration is below [`MIN_DURATION_MS`]
    pub fn build(self) -> Result<TransitionTable<D, N>, ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyTable);
        }

        for (idx, entry) in self.entries.iter().enumerate() {
            if self.entries[..idx].iter().any(|prev| prev.lamp == entry.lamp) {
                return Err(ConfigError::DuplicateLamp(entry.lamp));
            }

            if !self.entries.iter().any(|other| other.lamp == entry.next) {
                return Err(ConfigError::DanglingTransition {
                    from: entry.lamp,
                    to: entry.next,
                });
            }

            validate_duration(entry.duration)?;
        }

        Ok(TransitionTable {
            entries: self.entries,
        })
    }
}

impl<D: TimeDuration, const N: usize> Default for TransitionTableBuilder<D, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDuration;

    type Table = TransitionTable<TestDuration, 4>;

    #[test]
    fn standard_table_cycles_red_green_yellow() {
        let table = Table::standard().unwrap();

        assert_eq!(table.next(Lamp::Red), Some(Lamp::Green));
        assert_eq!(table.next(Lamp::Green), Some(Lamp::Yellow));
        assert_eq!(table.next(Lamp::Yellow), Some(Lamp::Red));
        assert_eq!(table.duration(Lamp::Red), Some(TestDuration(5000)));
        assert_eq!(table.period(Lamp::Red), Some(3));
        assert_eq!(table.cycle_duration(Lamp::Red), Some(TestDuration(9000)));
    }

    #[test]
    fn standard_table_needs_room_for_three_entries() {
        let result = TransitionTable::<TestDuration, 2>::standard();
        assert_eq!(result.err(), Some(ConfigError::CapacityExceeded));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(Table::builder().build().err(), Some(ConfigError::EmptyTable));
    }

    #[test]
    fn dangling_next_is_rejected() {
        let result = Table::builder()
            .entry(Lamp::Red, TestDuration(100), Lamp::Green)
            .unwrap()
            .build();

        assert_eq!(
            result.err(),
            Some(ConfigError::DanglingTransition {
                from: Lamp::Red,
                to: Lamp::Green
            })
        );
    }

    #[test]
    fn duplicate_lamp_is_rejected() {
        let result = Table::builder()
            .entry(Lamp::Red, TestDuration(100), Lamp::Red)
            .unwrap()
            .entry(Lamp::Red, TestDuration(200), Lamp::Red)
            .unwrap()
            .build();

        assert_eq!(result.err(), Some(ConfigError::DuplicateLamp(Lamp::Red)));
    }

    #[test]
    fn zero_duration_is_rejected_at_build() {
        let result = Table::builder()
            .entry(Lamp::Red, TestDuration(0), Lamp::Red)
            .unwrap()
            .build();

        assert_eq!(result.err(), Some(ConfigError::InvalidDuration));
    }

    #[test]
    fn set_duration_validates_and_keeps_links() {
        let mut table = Table::standard().unwrap();

        table.set_duration(Lamp::Green, TestDuration(750)).unwrap();
        assert_eq!(table.duration(Lamp::Green), Some(TestDuration(750)));
        assert_eq!(table.next(Lamp::Green), Some(Lamp::Yellow));

        assert_eq!(
            table.set_duration(Lamp::Green, TestDuration(0)),
            Err(ConfigError::InvalidDuration)
        );
        assert_eq!(table.duration(Lamp::Green), Some(TestDuration(750)));

        assert_eq!(
            table.set_duration(Lamp::TurnArrow, TestDuration(10)),
            Err(ConfigError::UnknownLamp(Lamp::TurnArrow))
        );
    }

    #[test]
    fn period_is_none_for_lamp_leading_into_cycle() {
        // yellow -> red <-> green: yellow is never revisited
        let table = Table::builder()
            .entry(Lamp::Yellow, TestDuration(10), Lamp::Red)
            .unwrap()
            .entry(Lamp::Red, TestDuration(10), Lamp::Green)
            .unwrap()
            .entry(Lamp::Green, TestDuration(10), Lamp::Red)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(table.period(Lamp::Yellow), None);
        assert_eq!(table.period(Lamp::Red), Some(2));
        assert_eq!(table.period(Lamp::TurnArrow), None);
    }

    #[test]
    fn capacity_exceeded_on_too_many_entries() {
        let result = TransitionTable::<TestDuration, 1>::builder()
            .entry(Lamp::Red, TestDuration(10), Lamp::Red)
            .unwrap()
            .entry(Lamp::Green, TestDuration(10), Lamp::Red);

        assert!(matches!(result, Err(ConfigError::CapacityExceeded)));
    }
}
