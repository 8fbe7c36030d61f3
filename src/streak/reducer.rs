use crate::mvi::{Reducer, Transition};
use crate::streak::intent::StreakIntent;
use crate::streak::state::{StreakPhase, StreakState};

/// Commit request emitted when a streak has fully decayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakEffect {
    /// Dispatch the final buffered delta.
    Flush(i64),
}

pub struct StreakReducer;

impl Reducer for StreakReducer {
    type State = StreakState;
    type Intent = StreakIntent;
    type Effect = StreakEffect;

    fn reduce(state: Self::State, intent: Self::Intent) -> Transition<Self::State, Self::Effect> {
        match intent {
            // Events win in every phase. A decaying streak resumes from its
            // current momentum and keeps its open buffer.
            StreakIntent::Change(amount) => {
                let weighted = amount.saturating_mul(state.multiplier(state.momentum()));
                let momentum = state.momentum().saturating_add(1);
                let buffer = state.buffer().saturating_add(weighted);
                Transition::to(state.with(StreakPhase::Active, momentum, buffer))
            }
            StreakIntent::DebounceElapsed => match state.phase() {
                StreakPhase::Active => {
                    let (momentum, buffer) = (state.momentum(), state.buffer());
                    Transition::to(state.with(StreakPhase::Decaying, momentum, buffer))
                }
                _ => Transition::to(state),
            },
            StreakIntent::DecayTick => match state.phase() {
                StreakPhase::Decaying => {
                    let momentum = state.momentum().saturating_sub(1);
                    if momentum == 0 {
                        let flushed = state.buffer();
                        Transition::with_effect(
                            state.with(StreakPhase::Idle, 0, 0),
                            StreakEffect::Flush(flushed),
                        )
                    } else {
                        let buffer = state.buffer();
                        Transition::to(state.with(StreakPhase::Decaying, momentum, buffer))
                    }
                }
                // Ticks outside a cooldown are stale timers.
                _ => Transition::to(state),
            },
        }
    }
}
