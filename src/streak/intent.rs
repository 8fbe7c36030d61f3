use crate::mvi::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakIntent {
    /// A user event adding `amount` (usually +1 or -1).
    Change(i64),
    /// No event arrived for the whole debounce window.
    DebounceElapsed,
    /// One decay interval passed while cooling down.
    DecayTick,
}

impl Intent for StreakIntent {}
