//! Integration tests for PatternSequencer and the built-in catalog

mod common;
use common::*;

use signal_sequencer::catalog::{EMERGENCY, PARTY_TIME, PROTECTED_TURN, STANDARD};
use signal_sequencer::{
    BuiltinCatalog, BuiltinPatternSequencer, ConfigError, Lamp, LampSet, SequencerError,
    SequencerState, ServiceTiming, SignalCommand,
};

type Pattern<'t> = BuiltinPatternSequencer<'t, TestInstant, MockHead, MockTimeSource>;

fn pattern(timer: &MockTimeSource) -> Pattern<'_> {
    let catalog = BuiltinCatalog::<TestDuration>::builtin().unwrap();
    Pattern::new(MockHead::new(), timer, catalog)
}

#[test]
fn starts_on_first_configuration() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);

    assert_eq!(pattern.configuration().name(), STANDARD);
    assert_eq!(pattern.start(), Ok(ServiceTiming::Delay(ms(5000))));
    assert_eq!(pattern.active_lamps(), LampSet::single(Lamp::Red));
}

#[test]
fn emergency_blinks_with_period_two() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.select_configuration(EMERGENCY).unwrap();
    pattern.start().unwrap();

    let mut seen = heapless::Vec::<LampSet, 8>::new();
    for _ in 0..4 {
        seen.push(pattern.active_lamps()).unwrap();
        timer.advance(500);
        pattern.service().unwrap();
    }

    let red = LampSet::single(Lamp::Red);
    assert_eq!(&seen[..], &[red, LampSet::EMPTY, red, LampSet::EMPTY]);
    assert_eq!(pattern.current_step(), 0);
}

#[test]
fn blink_off_step_keeps_lenses_dimmed() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.select_configuration(EMERGENCY).unwrap();
    pattern.start().unwrap();

    timer.advance(500);
    pattern.service().unwrap();
    assert_eq!(pattern.frame().lenses().len(), 3);
    assert_eq!(pattern.frame().is_lit(Lamp::Red), Some(false));
}

#[test]
fn party_time_fills_up_then_resets() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.select_configuration(PARTY_TIME).unwrap();
    pattern.start().unwrap();
    assert_eq!(pattern.active_lamps(), LampSet::EMPTY);

    let mut previous = pattern.active_lamps();
    for _ in 0..3 {
        timer.advance(300);
        pattern.service().unwrap();
        let current = pattern.active_lamps();
        assert!(current.is_superset(previous));
        assert_eq!(current.len(), previous.len() + 1);
        previous = current;
    }
    assert_eq!(previous, LampSet::of(&[Lamp::Red, Lamp::Yellow, Lamp::Green]));

    timer.advance(300);
    pattern.service().unwrap();
    assert_eq!(pattern.current_step(), 0);
    assert_eq!(pattern.active_lamps(), LampSet::EMPTY);
}

#[test]
fn reselecting_current_configuration_restarts_it() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.select_configuration(PARTY_TIME).unwrap();
    pattern.start().unwrap();

    timer.advance(600);
    pattern.service().unwrap();
    pattern.service().unwrap();
    timer.advance(100);
    pattern.select_configuration(PARTY_TIME).unwrap();

    assert_eq!(pattern.current_step(), 0);
    assert_eq!(pattern.time_until_change(), Some(ms(300)));
}

#[test]
fn reselecting_from_first_step_restarts_its_timer() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.start().unwrap();

    timer.advance(4000);
    pattern.service().unwrap();
    assert_eq!(pattern.current_step(), 0);
    pattern.select_configuration(STANDARD).unwrap();

    assert_eq!(pattern.current_step(), 0);
    assert_eq!(pattern.active_lamps(), LampSet::single(Lamp::Red));
    assert_eq!(pattern.time_until_change(), Some(ms(5000)));
}

#[test]
fn unknown_configuration_keeps_current_one() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.start().unwrap();
    timer.advance(5000);
    pattern.service().unwrap();
    let shows = pattern.head().show_count();

    assert_eq!(
        pattern.select_configuration("Disco"),
        Err(SequencerError::Config(ConfigError::UnknownConfiguration))
    );
    assert_eq!(pattern.configuration().name(), STANDARD);
    assert_eq!(pattern.current_step(), 1);
    assert_eq!(pattern.time_until_change(), Some(ms(3000)));
    assert_eq!(pattern.head().show_count(), shows);
}

#[test]
fn turn_arrow_only_in_protected_turn() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.start().unwrap();
    assert_eq!(pattern.frame().is_lit(Lamp::TurnArrow), None);

    pattern.select_configuration(PROTECTED_TURN).unwrap();
    assert_eq!(pattern.frame().lenses().len(), 4);
    assert_eq!(pattern.frame().is_lit(Lamp::TurnArrow), Some(true));
    assert!(pattern.is_lit(Lamp::Red));

    timer.advance(3000);
    pattern.service().unwrap();
    assert_eq!(pattern.frame().is_lit(Lamp::TurnArrow), Some(false));
    assert_eq!(pattern.frame().is_lit(Lamp::Green), Some(true));

    pattern.select_configuration(STANDARD).unwrap();
    assert_eq!(pattern.frame().is_lit(Lamp::TurnArrow), None);
}

#[test]
fn each_step_waits_its_own_duration() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.select_configuration(PROTECTED_TURN).unwrap();
    pattern.start().unwrap();

    for expected in [4000, 1000, 2000, 3000] {
        let delay = pattern.time_until_change().unwrap();
        timer.advance(delay.0);
        assert_eq!(pattern.service(), Ok(ServiceTiming::Delay(ms(expected))));
    }
}

#[test]
fn stop_cancels_step_timer() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);
    pattern.start().unwrap();
    pattern.stop().unwrap();
    let shows = pattern.head().show_count();

    timer.advance(60_000);
    assert_eq!(
        pattern.service(),
        Err(SequencerError::InvalidState {
            expected: SequencerState::Running,
            actual: SequencerState::Stopped,
        })
    );
    assert_eq!(pattern.time_until_change(), None);
    assert_eq!(pattern.current_step(), 0);
    assert_eq!(pattern.head().show_count(), shows);
    assert_eq!(pattern.head().last_frame().lenses().len(), 0);
}

#[test]
fn commands_dispatch() {
    let timer = MockTimeSource::new();
    let mut pattern = pattern(&timer);

    pattern.handle_command(SignalCommand::Start).unwrap();
    assert_eq!(
        pattern.handle_command(SignalCommand::SelectConfiguration(EMERGENCY)),
        Ok(ServiceTiming::Delay(ms(500)))
    );
    pattern.handle_command(SignalCommand::Advance).unwrap();
    assert_eq!(pattern.active_lamps(), LampSet::EMPTY);

    assert_eq!(
        pattern.handle_command(SignalCommand::SetLightColor {
            index: 0,
            lamp: Lamp::Green,
        }),
        Err(SequencerError::UnsupportedCommand)
    );
    assert_eq!(
        pattern.handle_command(SignalCommand::Stop),
        Ok(ServiceTiming::Idle)
    );
}
