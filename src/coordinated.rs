//! Coordinated multi-light sequencer.
//!
//! A group of `L` signal heads shares one transition table. Each cycle
//! starts a *batch*: light `i` advances `i × stagger` after the batch
//! begins, producing a rolling wave along the group.
//!
//! # Scheduling
//!
//! There are `L + 1` timer slots: one per light for its staggered advance,
//! and one cycle slot that starts the next batch. The two phases never
//! overlap:
//!
//! 1. **Waiting**: only the cycle slot is armed, for light 0's current
//!    duration. When it fires a batch begins.
//! 2. **Batch in flight**: only stagger slots are armed. Once the last one
//!    has fired the batch has settled and the cycle slot is armed again.
//!
//! Staggered advances never touch the cycle slot, so a batch cannot
//! re-trigger itself. A staggered advance reads its light's lamp when it
//! fires, so dashboard overrides made in the meantime are honoured.
//!
//! Any accepted override or duration edit made while waiting restarts the
//! cycle slot from the moment of the edit.

use crate::command::SignalCommand;
use crate::display::{Frame, SignalHead};
use crate::error::{ConfigError, SequencerError, SequencerState};
use crate::lamp::{Lamp, LampSet};
use crate::sequencer::ServiceTiming;
use crate::table::TransitionTable;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::timer::{TimerSlot, earliest};

/// Default delay between neighbouring lights of a batch.
pub const DEFAULT_STAGGER_MS: u64 = 1000;

/// Drives `L` signal heads from one shared transition table.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `H` - Signal head implementation type (same for every light)
/// * `T` - Time source implementation type
/// * `L` - Number of lights in the group
/// * `N` - Maximum number of transition table entries
pub struct CoordinatedSequencer<
    't,
    I: TimeInstant,
    H: SignalHead,
    T: TimeSource<I>,
    const L: usize,
    const N: usize,
> {
    heads: [H; L],
    time_source: &'t T,
    table: TransitionTable<I::Duration, N>,
    state: SequencerState,
    lamps: [Lamp; L],
    stagger: I::Duration,
    staggered: [TimerSlot<I>; L],
    cycle: TimerSlot<I>,
    batch_in_flight: bool,
    frames: [Frame; L],
}

impl<'t, I, H, T, const L: usize, const N: usize> CoordinatedSequencer<'t, I, H, T, L, N>
where
    I: TimeInstant,
    H: SignalHead,
    T: TimeSource<I>,
{
    /// Creates a stopped group with every light on `initial`.
    ///
    /// Every head is blanked immediately.
    ///
    /// # Errors
    /// * `EmptyLayout` - the group has no lights (`L == 0`)
    /// * `UnknownLamp` - `initial` has no entry in `table`
    pub fn new(
        mut heads: [H; L],
        time_source: &'t T,
        table: TransitionTable<I::Duration, N>,
        initial: Lamp,
    ) -> Result<Self, ConfigError> {
        if L == 0 {
            return Err(ConfigError::EmptyLayout);
        }
        if !table.contains(initial) {
            return Err(ConfigError::UnknownLamp(initial));
        }

        let frames: [Frame; L] = core::array::from_fn(|_| Frame::dark());
        for (head, frame) in heads.iter_mut().zip(frames.iter()) {
            head.show(frame);
        }

        Ok(Self {
            heads,
            time_source,
            table,
            state: SequencerState::Stopped,
            lamps: [initial; L],
            stagger: I::Duration::from_millis(DEFAULT_STAGGER_MS),
            staggered: core::array::from_fn(|_| TimerSlot::new()),
            cycle: TimerSlot::new(),
            batch_in_flight: false,
            frames,
        })
    }

    /// Replaces the delay between neighbouring lights of a batch.
    pub fn with_stagger(mut self, stagger: I::Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Dispatches a command.
    ///
    /// `SelectConfiguration` returns `UnsupportedCommand`.
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
            SignalCommand::Advance => self.advance_all(),
            SignalCommand::SetLightColor { index, lamp } => {
                self.set_light_color(index, lamp)?;
                Ok(self.timing())
            }
            SignalCommand::SetDuration { lamp, duration } => {
                self.set_duration(lamp, duration)?;
                Ok(self.timing())
            }
            SignalCommand::SelectConfiguration(_) => Err(SequencerError::UnsupportedCommand),
        }
    }

    /// Mounts the group: shows every light and arms the cycle timer.
    ///
    /// Must be called from `Stopped` state.
    pub fn start(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        self.require(SequencerState::Stopped)?;

        self.state = SequencerState::Running;
        self.arm_cycle(self.time_source.now());
        self.refresh();
        debug!("group of {} lights started", L);
        Ok(self.timing())
    }

    /// Unmounts the group: cancels all `L + 1` timers and blanks every head.
    ///
    /// Must be called from `Running` state. A batch cut short is dropped;
    /// lights keep whatever lamp they reached.
    pub fn stop(&mut self) -> Result<(), SequencerError> {
        self.require(SequencerState::Running)?;

        self.cycle.cancel();
        for slot in self.staggered.iter_mut() {
            slot.cancel();
        }
        self.batch_in_flight = false;
        self.state = SequencerState::Stopped;

        for idx in 0..L {
            self.show(idx, Frame::dark());
        }
        debug!("group stopped");
        Ok(())
    }

    /// Begins a staggered batch now.
    ///
    /// Light `i` advances `i × stagger` from now; light 0 advances
    /// immediately. Advances still pending from an earlier batch are applied
    /// first, so each batch moves every light exactly once.
    ///
    /// While stopped there is no timer to stagger against: every light
    /// advances at once and the heads stay dark.
    pub fn advance_all(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        if self.state == SequencerState::Stopped {
            for idx in 0..L {
                self.step_light(idx);
            }
            return Ok(ServiceTiming::Idle);
        }

        let now = self.time_source.now();
        self.begin_batch(now);
        self.refresh();
        Ok(self.timing())
    }

    /// Fires every due timer: staggered advances, then batch settling, or
    /// the cycle timer.
    ///
    /// Each slot fires at most once per call.
    ///
    /// Must be called from `Running` state.
    pub fn service(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        self.require(SequencerState::Running)?;

        let now = self.time_source.now();
        if self.cycle.poll(now) {
            self.begin_batch(now);
        } else {
            self.fire_due(now);
        }
        self.refresh();
        Ok(self.timing())
    }

    /// Overrides one light, bypassing the transition table.
    ///
    /// The change is visible immediately. Between batches the cycle timer
    /// restarts for light 0's duration.
    ///
    /// # Errors
    /// * `InvalidLight` - `index` is outside the group
    /// * `Config(UnknownLamp)` - `lamp` has no entry in the table
    pub fn set_light_color(&mut self, index: usize, lamp: Lamp) -> Result<(), SequencerError> {
        if index >= L {
            return Err(SequencerError::InvalidLight { index, count: L });
        }
        if !self.table.contains(lamp) {
            warn!("rejected override of light {} to {:?}", index, lamp);
            return Err(ConfigError::UnknownLamp(lamp).into());
        }

        self.lamps[index] = lamp;
        trace!("light {} overridden to {:?}", index, lamp);

        if self.state == SequencerState::Running {
            if !self.batch_in_flight {
                self.arm_cycle(self.time_source.now());
            }
            self.refresh();
        }
        Ok(())
    }

    /// Changes how long `lamp` stays lit for every light.
    ///
    /// Between batches the cycle timer restarts for light 0's duration,
    /// which picks up the edit if light 0 shows `lamp`.
    ///
    /// # Errors
    /// * `Config(InvalidDuration)` - duration below the minimum
    /// * `Config(UnknownLamp)` - `lamp` has no entry in the table
    pub fn set_duration(&mut self, lamp: Lamp, duration: I::Duration) -> Result<(), SequencerError> {
        if let Err(err) = self.table.set_duration(lamp, duration) {
            warn!("rejected duration {} ms for {:?}", duration.as_millis(), lamp);
            return Err(err.into());
        }

        if self.state == SequencerState::Running && !self.batch_in_flight {
            self.arm_cycle(self.time_source.now());
        }
        Ok(())
    }

    /// Returns the current state of the sequencer.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SequencerState::Running
    }

    /// Current lamp of every light.
    pub fn lamps(&self) -> &[Lamp; L] {
        &self.lamps
    }

    pub fn lamp(&self, index: usize) -> Option<Lamp> {
        self.lamps.get(index).copied()
    }

    /// Number of staggered advances still waiting to fire.
    pub fn pending_advances(&self) -> usize {
        self.staggered.iter().filter(|slot| slot.is_armed()).count()
    }

    pub fn batch_in_flight(&self) -> bool {
        self.batch_in_flight
    }

    /// Time until the next batch begins, `None` while a batch is in flight
    /// or the group is stopped.
    pub fn time_until_cycle(&self) -> Option<I::Duration> {
        self.cycle.remaining(self.time_source.now())
    }

    pub fn stagger(&self) -> I::Duration {
        self.stagger
    }

    pub fn table(&self) -> &TransitionTable<I::Duration, N> {
        &self.table
    }

    pub fn heads(&self) -> &[H; L] {
        &self.heads
    }

    pub fn frames(&self) -> &[Frame; L] {
        &self.frames
    }

    fn begin_batch(&mut self, now: I) {
        // Apply leftovers of an unfinished batch before rescheduling.
        for idx in 0..L {
            if self.staggered[idx].is_armed() {
                self.staggered[idx].cancel();
                self.step_light(idx);
            }
        }

        self.cycle.cancel();
        let stagger_ms = self.stagger.as_millis();
        for (idx, slot) in self.staggered.iter_mut().enumerate() {
            let offset = I::Duration::from_millis(stagger_ms.saturating_mul(idx as u64));
            slot.arm(now, offset);
        }
        self.batch_in_flight = true;
        debug!("batch started");

        self.fire_due(now);
    }

    fn fire_due(&mut self, now: I) {
        for idx in 0..L {
            if self.staggered[idx].poll(now) {
                self.step_light(idx);
            }
        }

        if self.batch_in_flight && self.pending_advances() == 0 {
            self.batch_in_flight = false;
            self.arm_cycle(now);
            debug!("batch settled, light 0 at {:?}", self.lamps[0]);
        }
    }

    fn step_light(&mut self, idx: usize) {
        if let Some(next) = self.table.next(self.lamps[idx]) {
            self.lamps[idx] = next;
            trace!("light {} advanced to {:?}", idx, next);
        }
    }

    fn arm_cycle(&mut self, now: I) {
        if let Some(duration) = self.table.duration(self.lamps[0]) {
            self.cycle.arm(now, duration);
        }
    }

    fn timing(&self) -> ServiceTiming<I::Duration> {
        let now = self.time_source.now();
        self.staggered
            .iter()
            .fold(self.cycle.remaining(now), |acc, slot| {
                earliest(acc, slot.remaining(now))
            })
            .into()
    }

    fn refresh(&mut self) {
        for idx in 0..L {
            let frame = Frame::render(self.table.layout(), LampSet::single(self.lamps[idx]));
            self.show(idx, frame);
        }
    }

    fn show(&mut self, idx: usize, frame: Frame) {
        if frame != self.frames[idx] {
            self.heads[idx].show(&frame);
            self.frames[idx] = frame;
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
