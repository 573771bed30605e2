//! Single-light signal sequencer.
//!
//! Provides [`SignalSequencer`], which drives one signal head through a
//! [`TransitionTable`], and [`ServiceTiming`], the wake-up hint every
//! sequencer in this crate returns.

use crate::command::SignalCommand;
use crate::display::{Frame, SignalHead};
use crate::error::{ConfigError, SequencerError, SequencerState};
use crate::lamp::{Lamp, LampSet};
use crate::table::TransitionTable;
use crate::time::{TimeInstant, TimeSource};
use crate::timer::TimerSlot;

/// Timing information returned by service operations.
///
/// Indicates when the sequencer needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// A timer is armed. Service again after this delay.
    ///
    /// A zero delay means a timer is already due.
    Delay(D),

    /// Nothing is armed. No servicing needed until the sequencer is started.
    Idle,
}

impl<D: Copy> ServiceTiming<D> {
    /// The delay, if any timer is armed.
    pub fn delay(&self) -> Option<D> {
        match self {
            ServiceTiming::Delay(delay) => Some(*delay),
            ServiceTiming::Idle => None,
        }
    }
}

impl<D> From<Option<D>> for ServiceTiming<D> {
    fn from(delay: Option<D>) -> Self {
        match delay {
            Some(delay) => ServiceTiming::Delay(delay),
            None => ServiceTiming::Idle,
        }
    }
}

/// Drives a single signal head around a transition table.
///
/// While running, exactly one timer is armed: it fires after the current
/// lamp's duration and advances to `next`. Every change of lamp re-arms
/// the timer, cancelling the previous one.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `H` - Signal head implementation type
/// * `T` - Time source implementation type
/// * `N` - Maximum number of transition table entries
pub struct SignalSequencer<'t, I: TimeInstant, H: SignalHead, T: TimeSource<I>, const N: usize> {
    head: H,
    time_source: &'t T,
    table: TransitionTable<I::Duration, N>,
    state: SequencerState,
    current: Lamp,
    timer: TimerSlot<I>,
    frame: Frame,
}

impl<'t, I: TimeInstant, H: SignalHead, T: TimeSource<I>, const N: usize>
    SignalSequencer<'t, I, H, T, N>
{
    /// Creates a stopped sequencer showing `initial` once started.
    ///
    /// The head is blanked immediately.
    ///
    /// # Errors
    /// `UnknownLamp` if `initial` has no entry in `table`.
    pub fn new(
        mut head: H,
        time_source: &'t T,
        table: TransitionTable<I::Duration, N>,
        initial: Lamp,
    ) -> Result<Self, ConfigError> {
        if !table.contains(initial) {
            return Err(ConfigError::UnknownLamp(initial));
        }

        let frame = Frame::dark();
        head.show(&frame);

        Ok(Self {
            head,
            time_source,
            table,
            state: SequencerState::Stopped,
            current: initial,
            timer: TimerSlot::new(),
            frame,
        })
    }

    /// Dispatches a command.
    ///
    /// Supports `Start`, `Stop` and `Advance`. Other commands return
    /// `UnsupportedCommand`.
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
                self.advance();
                Ok(self.timing())
            }
            _ => Err(SequencerError::UnsupportedCommand),
        }
    }

    /// Mounts the sequencer: shows the current lamp and arms its timer.
    ///
    /// Must be called from `Stopped` state.
    pub fn start(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        self.require(SequencerState::Stopped)?;

        self.state = SequencerState::Running;
        self.arm(self.time_source.now());
        self.refresh();
        debug!("signal started at {:?}", self.current);
        Ok(self.timing())
    }

    /// Unmounts the sequencer: cancels the timer and blanks the head.
    ///
    /// Must be called from `Running` state. The current lamp is kept for
    /// the next `start`.
    pub fn stop(&mut self) -> Result<(), SequencerError> {
        self.require(SequencerState::Running)?;

        self.timer.cancel();
        self.state = SequencerState::Stopped;
        self.show(Frame::dark());
        debug!("signal stopped at {:?}", self.current);
        Ok(())
    }

    /// Moves to the next lamp of the table and returns it.
    ///
    /// When running, the timer is re-armed for the new lamp's duration.
    pub fn advance(&mut self) -> Lamp {
        // `new` and the table builder guarantee every lamp reached has an entry.
        if let Some(next) = self.table.next(self.current) {
            self.current = next;
        }

        if self.state == SequencerState::Running {
            self.arm(self.time_source.now());
            self.refresh();
        }

        trace!("signal advanced to {:?}", self.current);
        self.current
    }

    /// Fires the timer if it is due.
    ///
    /// Each call advances at most once, however late it is made.
    ///
    /// Must be called from `Running` state.
    pub fn service(&mut self) -> Result<ServiceTiming<I::Duration>, SequencerError> {
        self.require(SequencerState::Running)?;

        if self.timer.poll(self.time_source.now()) {
            self.advance();
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

    /// Lamp currently selected, whether or not the head is driven.
    pub fn current_lamp(&self) -> Lamp {
        self.current
    }

    /// Lamps lit on the head, empty while stopped.
    pub fn lit(&self) -> LampSet {
        self.frame.lit()
    }

    /// Last frame handed to the head.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn table(&self) -> &TransitionTable<I::Duration, N> {
        &self.table
    }

    pub fn head(&self) -> &H {
        &self.head
    }

    /// Time until the next automatic advance, `None` while stopped.
    pub fn time_until_change(&self) -> Option<I::Duration> {
        self.timer.remaining(self.time_source.now())
    }

    fn timing(&self) -> ServiceTiming<I::Duration> {
        self.time_until_change().into()
    }

    fn arm(&mut self, now: I) {
        if let Some(duration) = self.table.duration(self.current) {
            self.timer.arm(now, duration);
        }
    }

    fn refresh(&mut self) {
        let frame = Frame::render(self.table.layout(), LampSet::single(self.current));
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
