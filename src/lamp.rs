//! Signal lamps and sets of simultaneously lit lamps.

use crate::error::ConfigError;

/// One lamp of a signal head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lamp {
    Red,
    Yellow,
    Green,
    /// Dedicated protected-turn arrow.
    TurnArrow,
}

impl Lamp {
    /// Every lamp, in housing order (top to bottom).
    pub const ALL: [Lamp; 4] = [Lamp::Red, Lamp::Yellow, Lamp::Green, Lamp::TurnArrow];

    /// Lowercase name used by dashboards and configuration text.
    pub const fn name(self) -> &'static str {
        match self {
            Lamp::Red => "red",
            Lamp::Yellow => "yellow",
            Lamp::Green => "green",
            Lamp::TurnArrow => "turn-arrow",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl core::fmt::Display for Lamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Lamp {
    type Err = ConfigError;

    /// Parses a lamp name, ignoring ASCII case and surrounding whitespace.
    /// `arrow` and `turn_arrow` are accepted for the turn arrow.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let matches = |name: &str| s.eq_ignore_ascii_case(name);

        if matches("red") {
            Ok(Lamp::Red)
        } else if matches("yellow") {
            Ok(Lamp::Yellow)
        } else if matches("green") {
            Ok(Lamp::Green)
        } else if matches("turn-arrow") || matches("turn_arrow") || matches("arrow") {
            Ok(Lamp::TurnArrow)
        } else {
            Err(ConfigError::UnknownLampName)
        }
    }
}

/// A set of lamps lit at the same time.
///
/// The empty set is a valid step ("all dark"), used by flashing patterns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LampSet(u8);

impl LampSet {
    /// No lamp lit.
    pub const EMPTY: LampSet = LampSet(0);

    /// Builds a set from a slice of lamps. Duplicates are ignored.
    pub const fn of(lamps: &[Lamp]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < lamps.len() {
            bits |= lamps[i].bit();
            i += 1;
        }
        LampSet(bits)
    }

    /// Set containing a single lamp.
    pub const fn single(lamp: Lamp) -> Self {
        LampSet(lamp.bit())
    }

    pub const fn contains(self, lamp: Lamp) -> bool {
        self.0 & lamp.bit() != 0
    }

    /// Returns the set with `lamp` added.
    #[must_use]
    pub const fn with(self, lamp: Lamp) -> Self {
        LampSet(self.0 | lamp.bit())
    }

    pub fn insert(&mut self, lamp: Lamp) {
        self.0 |= lamp.bit();
    }

    pub fn remove(&mut self, lamp: Lamp) {
        self.0 &= !lamp.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if every lamp of `other` is also in `self`.
    pub const fn is_superset(self, other: LampSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_subset(self, other: LampSet) -> bool {
        other.is_superset(self)
    }

    /// Iterates the lamps of the set in housing order.
    pub fn iter(self) -> impl Iterator<Item = Lamp> {
        Lamp::ALL.into_iter().filter(move |lamp| self.contains(*lamp))
    }
}

impl From<Lamp> for LampSet {
    fn from(lamp: Lamp) -> Self {
        LampSet::single(lamp)
    }
}

impl FromIterator<Lamp> for LampSet {
    fn from_iter<T: IntoIterator<Item = Lamp>>(iter: T) -> Self {
        let mut set = LampSet::EMPTY;
        for lamp in iter {
            set.insert(lamp);
        }
        set
    }
}

impl core::fmt::Debug for LampSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
