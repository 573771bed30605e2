//! Named configuration catalog.
//!
//! A [`Configuration`] is a lamp layout plus a looping list of steps, each
//! step lighting a set of lamps for a duration. A [`Catalog`] holds several
//! configurations under unique names so a user can switch between them at
//! runtime.

use crate::display::MAX_LENSES;
use crate::error::ConfigError;
use crate::lamp::{Lamp, LampSet};
use crate::style::LampStyle;
use crate::table::validate_duration;
use crate::time::TimeDuration;
use heapless::{String, Vec};

/// Longest configuration name accepted, in bytes.
pub const MAX_NAME_LEN: usize = 24;

/// Names of the built-in configurations.
pub const STANDARD: &str = "Standard";
pub const EMERGENCY: &str = "Emergency";
pub const PARTY_TIME: &str = "PartyTime";
pub const PROTECTED_TURN: &str = "ProtectedTurn";

/// Number of built-in configurations.
pub const BUILTIN_CONFIGURATIONS: usize = 4;

/// Most steps used by any built-in configuration.
pub const BUILTIN_STEPS: usize = 4;

/// One step of a configuration: lamps lit together and for how long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<D: TimeDuration> {
    pub active: LampSet,
    pub duration: D,
}

/// A named lamp layout with its looping step sequence.
///
/// # Type Parameters
/// * `D` - The duration type
/// * `S` - Maximum number of steps
#[derive(Debug, Clone)]
pub struct Configuration<D: TimeDuration, const S: usize> {
    name: String<MAX_NAME_LEN>,
    layout: Vec<(Lamp, LampStyle), MAX_LENSES>,
    steps: Vec<Step<D>, S>,
}

impl<D: TimeDuration, const S: usize> Configuration<D, S> {
    /// Creates a new configuration builder.
    pub fn builder(name: &str) -> ConfigurationBuilder<D, S> {
        ConfigurationBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lamps and their styles in housing order.
    pub fn layout(&self) -> impl Iterator<Item = (Lamp, &LampStyle)> {
        self.layout.iter().map(|(lamp, style)| (*lamp, style))
    }

    /// Every lamp of the layout.
    pub fn lamps(&self) -> LampSet {
        self.layout.iter().map(|(lamp, _)| *lamp).collect()
    }

    pub fn steps(&self) -> &[Step<D>] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step<D>> {
        self.steps.get(index)
    }

    /// Number of steps in the sequence, never zero.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Step that follows `index`, wrapping to 0 after the last step.
    pub fn next_step(&self, index: usize) -> usize {
        (index + 1) % self.steps.len()
    }

    /// Total duration of one pass through the sequence.
    pub fn cycle_duration(&self) -> D {
        let total = self
            .steps
            .iter()
            .fold(0u64, |acc, step| acc.saturating_add(step.duration.as_millis()));
        D::from_millis(total)
    }
}

/// Builder for constructing validated configurations.
#[derive(Debug)]
pub struct ConfigurationBuilder<D: TimeDuration, const S: usize> {
    name: Option<String<MAX_NAME_LEN>>,
    layout: Vec<(Lamp, LampStyle), MAX_LENSES>,
    steps: Vec<Step<D>, S>,
}

impl<D: TimeDuration, const S: usize> ConfigurationBuilder<D, S> {
    /// Creates a builder. A name longer than [`MAX_NAME_LEN`] is reported
    /// by `build`.
    pub fn new(name: &str) -> Self {
        let mut owned = String::new();
        let name = owned.push_str(name).ok().map(|_| owned);

        Self {
            name,
            layout: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Adds a lamp to the layout with its stock style.
    pub fn lamp(self, lamp: Lamp) -> Result<Self, ConfigError> {
        self.lamp_styled(lamp, LampStyle::default_for(lamp))
    }

    /// Adds a lamp to the layout with an explicit style.
    ///
    /// # Errors
    /// `DuplicateLamp` if the lamp is already in the layout.
    pub fn lamp_styled(mut self, lamp: Lamp, style: LampStyle) -> Result<Self, ConfigError> {
        if self.layout.iter().any(|(existing, _)| *existing == lamp) {
            return Err(ConfigError::DuplicateLamp(lamp));
        }
        self.layout
            .push((lamp, style))
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends a step lighting `active` for `duration`.
    ///
    /// # Errors
    /// `CapacityExceeded` if the configuration already holds `S` steps.
    pub fn step(mut self, active: LampSet, duration: D) -> Result<Self, ConfigError> {
        self.steps
            .push(Step { active, duration })
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `CapacityExceeded` - name longer than [`MAX_NAME_LEN`]
    /// * `EmptyName` - name is empty
    /// * `EmptyLayout` - no lamps were added
    /// * `EmptySequence` - no steps were added
    /// * `LampNotInLayout` - a step lights a lamp outside the layout
    /// * `InvalidDuration` - a step duration is below the minimum
    pub fn build(self) -> Result<Configuration<D, S>, ConfigError> {
        let name = self.name.ok_or(ConfigError::CapacityExceeded)?;
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.layout.is_empty() {
            return Err(ConfigError::EmptyLayout);
        }
        if self.steps.is_empty() {
            return Err(ConfigError::EmptySequence);
        }

        let available: LampSet = self.layout.iter().map(|(lamp, _)| *lamp).collect();
        for step in &self.steps {
            if let Some(stray) = step.active.iter().find(|lamp| !available.contains(*lamp)) {
                return Err(ConfigError::LampNotInLayout(stray));
            }
            validate_duration(step.duration)?;
        }

        Ok(Configuration {
            name,
            layout: self.layout,
            steps: self.steps,
        })
    }
}

/// Named collection of configurations.
///
/// # Type Parameters
/// * `D` - The duration type
/// * `C` - Maximum number of configurations
/// * `S` - Maximum number of steps per configuration
#[derive(Debug, Clone)]
pub struct Catalog<D: TimeDuration, const C: usize, const S: usize> {
    configurations: Vec<Configuration<D, S>, C>,
}

impl<D: TimeDuration, const C: usize, const S: usize> Catalog<D, C, S> {
    /// Creates a new catalog builder.
    pub fn builder() -> CatalogBuilder<D, C, S> {
        CatalogBuilder::new()
    }

    /// The built-in catalog: `Standard`, `Emergency`, `PartyTime` and
    /// `ProtectedTurn`, in that order.
    ///
    /// # Errors
    /// `CapacityExceeded` if `C` or `S` is smaller than
    /// [`BUILTIN_CONFIGURATIONS`] / [`BUILTIN_STEPS`].
    pub fn builtin() -> Result<Self, ConfigError> {
        let ms = D::from_millis;
        let three_aspect = |name: &str| {
            Configuration::<D, S>::builder(name)
                .lamp(Lamp::Red)?
                .lamp(Lamp::Yellow)?
                .lamp(Lamp::Green)
        };

        let standard = three_aspect(STANDARD)?
            .step(LampSet::single(Lamp::Red), ms(5000))?
            .step(LampSet::single(Lamp::Green), ms(3000))?
            .step(LampSet::single(Lamp::Yellow), ms(1000))?
            .build()?;

        let emergency = three_aspect(EMERGENCY)?
            .step(LampSet::single(Lamp::Red), ms(500))?
            .step(LampSet::EMPTY, ms(500))?
            .build()?;

        let party_time = three_aspect(PARTY_TIME)?
            .step(LampSet::EMPTY, ms(300))?
            .step(LampSet::of(&[Lamp::Red]), ms(300))?
            .step(LampSet::of(&[Lamp::Red, Lamp::Yellow]), ms(300))?
            .step(LampSet::of(&[Lamp::Red, Lamp::Yellow, Lamp::Green]), ms(300))?
            .build()?;

        let protected_turn = three_aspect(PROTECTED_TURN)?
            .lamp(Lamp::TurnArrow)?
            .step(LampSet::of(&[Lamp::Red, Lamp::TurnArrow]), ms(3000))?
            .step(LampSet::single(Lamp::Green), ms(4000))?
            .step(LampSet::single(Lamp::Yellow), ms(1000))?
            .step(LampSet::single(Lamp::Red), ms(2000))?
            .build()?;

        Self::builder()
            .configuration(standard)?
            .configuration(emergency)?
            .configuration(party_time)?
            .configuration(protected_turn)?
            .build()
    }

    /// Looks up a configuration by exact name.
    pub fn get(&self, name: &str) -> Result<&Configuration<D, S>, ConfigError> {
        self.configurations
            .iter()
            .find(|config| config.name() == name)
            .ok_or(ConfigError::UnknownConfiguration)
    }

    /// Index of the configuration named `name`.
    pub fn position(&self, name: &str) -> Result<usize, ConfigError> {
        self.configurations
            .iter()
            .position(|config| config.name() == name)
            .ok_or(ConfigError::UnknownConfiguration)
    }

    pub fn by_index(&self, index: usize) -> Option<&Configuration<D, S>> {
        self.configurations.get(index)
    }

    /// First configuration, the default selection.
    pub fn first(&self) -> &Configuration<D, S> {
        // `CatalogBuilder::build` rejects empty catalogs.
        &self.configurations[0]
    }

    /// Configuration names in catalog order, for a selection menu.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configurations.iter().map(|config| config.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Configuration<D, S>> {
        self.configurations.iter()
    }

    /// Number of configurations, never zero.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

/// Builder for constructing validated catalogs.
#[derive(Debug)]
pub struct CatalogBuilder<D: TimeDuration, const C: usize, const S: usize> {
    configurations: Vec<Configuration<D, S>, C>,
}

impl<D: TimeDuration, const C: usize, const S: usize> CatalogBuilder<D, C, S> {
    pub fn new() -> Self {
        Self {
            configurations: Vec::new(),
        }
    }

    /// Adds a configuration.
    ///
    /// # Errors
    /// * `DuplicateConfiguration` - name already used
    /// * `CapacityExceeded` - catalog already holds `C` configurations
    pub fn configuration(mut self, config: Configuration<D, S>) -> Result<Self, ConfigError> {
        if self
            .configurations
            .iter()
            .any(|existing| existing.name() == config.name())
        {
            return Err(ConfigError::DuplicateConfiguration);
        }
        self.configurations
            .push(config)
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds the catalog.
    ///
    /// # Errors
    /// `EmptyCatalog` if no configuration was added.
    pub fn build(self) -> Result<Catalog<D, C, S>, ConfigError> {
        if self.configurations.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Catalog {
            configurations: self.configurations,
        })
    }
}

impl<D: TimeDuration, const C: usize, const S: usize> Default for CatalogBuilder<D, C, S> {
    fn default() -> Self {
        Self::new()
    }
}
