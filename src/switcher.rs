//! Configuration-switchable sequencer.
//!
//! [`PatternSequencer`] loops through the steps of one catalog
//! configuration at a time. Selecting a configuration restarts it from
//! step 0; there is no blending across the switch.

use crate::catalog::{Catalog, Configuration};
use crate::command::SignalCommand;
use crate::display::{Frame, SignalHead};
use crate::error::{SequencerError, SequencerState};
use crate::lamp::{Lamp, LampSet};
use crate::sequencer::ServiceTiming;
use crate::time::{TimeInstant, TimeSource};
use crate::timer::TimerSlot;

/// Plays catalog configurations on one signal head.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `H` - Signal head implementation type
/// * `T` - Time source implementation type
/// * `C` - Maximum number of catalog configurations
/// * `S` - Maximum number of steps per configuration
pub struct PatternSequencer<
    't,
    I: TimeInstant,
    H: SignalHead,
    T: TimeSource<I>,
    const C: usize,
    const S: usize,
> {
    head: H,
    time_source: &'t T,
    catalog: Catalog<I::Duration, C, S>,
    state: SequencerState,
    selected: usize,
    step: usize,
    active: LampSet,
    timer: TimerSlot<I>,
    frame: Frame,
}

impl<'t, I, H, T, const C: usize, const S: usize> PatternSequencer<'t, I, H, T, C, S>
where
    I: TimeInstant,
    H: SignalHead,
    T: TimeSource<I>,
{
    /// Creates a stopped sequencer on the catalog's first configuration.
    ///
    /// The head is blanked immediately.
    pub fn new(mut head: H, time_source: &'t T, catalog: Catalog<I::Duration, C, S>) -> Self {
        let frame = Frame::dark();
        head.show(&frame);

        let mut sequencer = Self {
            head,
            time_source,
            catalog,
            state: SequencerState::Stopped,
            selected: 0,
            step: 0,
            active: LampSet::EMPTY,
            timer: TimerSlot::new(),
            frame,
        };
        sequencer.sync_active();
        sequencer
    }

    /// Dispatches a command.
    ///
    /// `SetLightColor` and `SetDuration` return `UnsupportedCommand`.
    pub fn handle_command(
        &mut self,
        command: SignalCommand<'_, I::Duration>,
    ) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        match command {
            SignalCommand::Start => self.start(),
            SignalCommand::Stop => {
                self.stop()?;
                Ok(ServiceTiming::Idle)
            }
            SignalCommand::Advance => {
                self.advance_step();
                Ok(self.timing())
            }
            SignalCommand::SelectConfiguration(name) => {
                self.select_configuration(name)?;
                Ok(self.timing())
            }
            SignalCommand::SetLightColor { .. } | SignalCommand::SetDuration { .. } => {
                Err(SequencerError::UnsupportedCommand)
            }
        }
    }

    /// Mounts the sequencer: shows the current step and arms its timer.
    ///
    /// Must be called from `Stopped` state.
    pub fn start(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        self.require(SequencerState::Stopped)?;

        self.state = SequencerState::Running;
        self.arm(self.time_source.now());
        self.refresh();
        debug!("pattern {} started", self.configuration().name());
        Ok(self.timing())
    }

    /// Unmounts the sequencer: cancels the timer and blanks the head.
    ///
    /// Must be called from `Running` state.
    pub fn stop(&mut self) -> Result<(), SequencerError> {
        self.require(SequencerState::Running)?;

        self.timer.cancel();
        self.state = SequencerState::Stopped;
        self.show(Frame::dark());
        debug!("pattern stopped");
        Ok(())
    }

    /// Switches to the configuration named `name` and restarts it at step 0.
    ///
    /// Selecting the configuration already playing also restarts it.
    ///
    /// # Errors
    /// `Config(UnknownConfiguration)` if the catalog has no such entry; the
    /// current selection keeps playing.
    pub fn select_configuration(&mut self, name: &str) -> Result<(), SequencerError> {
        let selected = match self.catalog.position(name) {
            Ok(selected) => selected,
            Err(err) => {
                warn!("unknown configuration {}", name);
                return Err(err.into());
            }
        };

        self.selected = selected;
        self.step = 0;
        self.sync_active();
        debug!("configuration {} selected", name);

        if self.state == SequencerState::Running {
            self.arm(self.time_source.now());
            self.refresh();
        }
        Ok(())
    }

    /// Moves to the next step, wrapping after the last one, and returns its
    /// index.
    pub fn advance_step(&mut self) -> usize {
        self.step = self.configuration().next_step(self.step);
        self.sync_active();
        trace!("step {} lights {:?}", self.step, self.active);

        if self.state == SequencerState::Running {
            self.arm(self.time_source.now());
            self.refresh();
        }
        self.step
    }

    /// Fires the step timer if it is due.
    ///
    /// Must be called from `Running` state.
    pub fn service(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        self.require(SequencerState::Running)?;

        if self.timer.poll(self.time_source.now()) {
            self.advance_step();
        }
        Ok(self.timing())
    }

    /// Returns the current state of the sequencer.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SequencerState::Running
    }

    /// Configuration currently selected.
    pub fn configuration(&self) -> &Configuration<I::Duration, S> {
        // `selected` only ever holds an index returned by the catalog.
        self.catalog
            .by_index(self.selected)
            .unwrap_or_else(|| self.catalog.first())
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Lamps the current step lights.
    pub fn active_lamps(&self) -> LampSet {
        self.active
    }

    /// True if `lamp` is lit by the current step.
    pub fn is_lit(&self, lamp: Lamp) -> bool {
        self.active.contains(lamp)
    }

    pub fn catalog(&self) -> &Catalog<I::Duration, C, S> {
        &self.catalog
    }

    /// Last frame handed to the head.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn head(&self) -> &H {
        &self.head
    }

    /// Time until the next step, `None` while stopped.
    pub fn time_until_change(&self) -> Option<I::Duration> {
        self.timer.remaining(self.time_source.now())
    }

    fn sync_active(&mut self) {
        self.active = self
            .configuration()
            .step(self.step)
            .map(|step| step.active)
            .unwrap_or(LampSet::EMPTY);
    }

    fn arm(&mut self, now: I) {
        if let Some(step) = self.configuration().step(self.step) {
            let duration = step.duration;
            self.timer.arm(now, duration);
        }
    }

    fn timing(&self) -> ServiceTiming<I::Duration> {
        self.time_until_change().into()
    }

    fn refresh(&mut self) {
        let frame = Frame::render(self.configuration().layout(), self.active);
        self.show(frame);
    }

    fn show(&mut self, frame: Frame) {
        if frame != self.frame {
            self.head.show(&frame);
            self.frame = frame;
        }
    }

    fn require(&self, expected: SequencerState) -> Result<(), SequencerError> {
        if self.state != expected {
            return Err(SequencerError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}
