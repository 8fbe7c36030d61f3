//! Reducer trait for intent-driven state machines.

use super::intent::Intent;
use super::state::MachineState;

/// Result of one reduction step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, E> {
    pub state: S,
    pub effect: Option<E>,
}

impl<S, E> Transition<S, E> {
    /// Move to `state` with nothing for the driver to do.
    pub fn to(state: S) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    /// Move to `state` and ask the driver to perform `effect`.
    pub fn with_effect(state: S, effect: E) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Intent) -> (State, Effect?)
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: MachineState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Side effect requested from the driver.
    type Effect;

    /// Process an intent and return the new state.
    ///
    /// This should be a pure function with no side effects.
    fn reduce(
        state: Self::State,
        intent: Self::Intent,
    ) -> Transition<Self::State, Self::Effect>;
}
