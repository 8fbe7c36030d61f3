mod common;

use streakstore::mvi::{Reducer, Transition};
use streakstore::streak::{StreakEffect, StreakIntent, StreakPhase, StreakReducer, StreakState};

fn run(state: StreakState, intents: &[StreakIntent]) -> (StreakState, Vec<StreakEffect>) {
    intents.iter().fold((state, Vec::new()), |(state, mut effects), intent| {
        let Transition { state, effect } = StreakReducer::reduce(state, *intent);
        effects.extend(effect);
        (state, effects)
    })
}

fn changes(amount: i64, count: usize) -> Vec<StreakIntent> {
    vec![StreakIntent::Change(amount); count]
}

#[test]
fn first_event_starts_a_streak() {
    let (state, effects) = run(StreakState::new(10), &[StreakIntent::Change(1)]);
    assert_eq!(state.phase(), StreakPhase::Active);
    assert_eq!(state.momentum(), 1);
    assert_eq!(state.buffer(), 1);
    assert!(effects.is_empty());
}

#[test]
fn multiplier_doubles_every_period() {
    // Events arriving at momentum 0..=9 weigh 1, 10..=19 weigh 2, 20..=24 weigh 4.
    let (state, _) = run(StreakState::new(10), &changes(1, 25));
    assert_eq!(state.momentum(), 25);
    assert_eq!(state.buffer(), 10 + 10 * 2 + 5 * 4);
}

/// Test that the event arriving at momentum 9 still weighs 1.
#[test]
fn eleventh_event_is_the_first_doubled() {
    let (nine, _) = run(StreakState::new(10), &changes(1, 9));
    assert_eq!(nine.buffer(), 9);
    let (ten, _) = run(nine, &changes(1, 1));
    assert_eq!(ten.momentum(), 10);
    assert_eq!(ten.buffer(), 10);
    let (eleven, _) = run(ten, &changes(1, 1));
    assert_eq!(eleven.buffer(), 12);
    let (twelve, _) = run(eleven, &changes(1, 1));
    assert_eq!(twelve.buffer(), 14);
}

#[test]
fn mixed_directions_net_out_but_keep_momentum() {
    let intents = [
        StreakIntent::Change(1),
        StreakIntent::Change(-1),
        StreakIntent::Change(1),
        StreakIntent::Change(-1),
    ];
    let (state, _) = run(StreakState::new(10), &intents);
    assert_eq!(state.momentum(), 4);
    assert_eq!(state.buffer(), 0);
}

#[test]
fn debounce_moves_to_decaying_without_touching_momentum() {
    let mut intents = changes(1, 3);
    intents.push(StreakIntent::DebounceElapsed);
    let (state, effects) = run(StreakState::new(10), &intents);
    assert_eq!(state.phase(), StreakPhase::Decaying);
    assert_eq!(state.momentum(), 3);
    assert_eq!(state.buffer(), 3);
    assert!(effects.is_empty());
}

#[test]
fn flush_happens_once_when_momentum_reaches_zero() {
    let mut intents = changes(1, 3);
    intents.push(StreakIntent::DebounceElapsed);
    intents.extend([StreakIntent::DecayTick; 2]);
    let (state, effects) = run(StreakState::new(10), &intents);
    assert_eq!(state.momentum(), 1);
    assert!(effects.is_empty());

    let (state, effects) = run(state, &[StreakIntent::DecayTick; 5]);
    assert_eq!(effects, vec![StreakEffect::Flush(3)]);
    assert_eq!(state.phase(), StreakPhase::Idle);
    assert_eq!(state.momentum(), 0);
    assert_eq!(state.buffer(), 0);
}

#[test]
fn zero_buffer_is_still_flushed() {
    let intents = [
        StreakIntent::Change(1),
        StreakIntent::Change(-1),
        StreakIntent::DebounceElapsed,
        StreakIntent::DecayTick,
        StreakIntent::DecayTick,
    ];
    let (_, effects) = run(StreakState::new(10), &intents);
    assert_eq!(effects, vec![StreakEffect::Flush(0)]);
}

#[test]
fn event_during_decay_resumes_the_open_streak() {
    let mut intents = changes(1, 4);
    intents.push(StreakIntent::DebounceElapsed);
    intents.extend([StreakIntent::DecayTick; 2]);
    intents.push(StreakIntent::Change(1));
    let (state, effects) = run(StreakState::new(10), &intents);

    assert_eq!(state.phase(), StreakPhase::Active);
    assert_eq!(state.momentum(), 3);
    assert_eq!(state.buffer(), 5);
    assert!(effects.is_empty());
}

#[test]
fn decayed_momentum_lowers_the_weight_of_resumed_events() {
    let mut intents = changes(1, 12);
    intents.push(StreakIntent::DebounceElapsed);
    intents.extend([StreakIntent::DecayTick; 5]);
    let (decayed, _) = run(StreakState::new(10), &intents);
    assert_eq!(decayed.momentum(), 7);
    let before = decayed.buffer();

    let (resumed, _) = run(decayed, &[StreakIntent::Change(1)]);
    assert_eq!(resumed.momentum(), 8);
    assert_eq!(resumed.buffer() - before, 1);
}

#[test]
fn stale_timer_intents_are_ignored() {
    let idle = StreakState::new(10);
    let (state, effects) = run(idle.clone(), &[StreakIntent::DecayTick, StreakIntent::DebounceElapsed]);
    assert_eq!(state, idle);
    assert!(effects.is_empty());

    let (active, _) = run(idle, &[StreakIntent::Change(1)]);
    let (state, effects) = run(active.clone(), &[StreakIntent::DecayTick]);
    assert_eq!(state, active);
    assert!(effects.is_empty());
}

#[test]
fn buffer_resets_for_the_next_streak() {
    let mut intents = changes(1, 2);
    intents.push(StreakIntent::DebounceElapsed);
    intents.extend([StreakIntent::DecayTick; 2]);
    intents.extend(changes(1, 3));
    let (state, effects) = run(StreakState::new(10), &intents);

    assert_eq!(effects, vec![StreakEffect::Flush(2)]);
    assert_eq!(state.momentum(), 3);
    assert_eq!(state.buffer(), 3);
}
