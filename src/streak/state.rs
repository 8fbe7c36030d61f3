use crate::mvi::MachineState;

/// Multiplier period used when none is configured.
pub const DEFAULT_MULTIPLIER_PERIOD: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreakPhase {
    /// No streak in progress.
    #[default]
    Idle,
    /// Events are arriving within the debounce window.
    Active,
    /// Quiet for a full window; momentum drops every decay tick.
    Decaying,
}

/// Momentum and buffered delta of the current streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakState {
    phase: StreakPhase,
    momentum: u32,
    buffer: i64,
    multiplier_period: u32,
}

impl StreakState {
    /// An idle streak. A zero period is treated as 1.
    pub fn new(multiplier_period: u32) -> Self {
        Self {
            phase: StreakPhase::Idle,
            momentum: 0,
            buffer: 0,
            multiplier_period: multiplier_period.max(1),
        }
    }

    pub fn phase(&self) -> StreakPhase {
        self.phase
    }

    pub fn momentum(&self) -> u32 {
        self.momentum
    }

    pub fn buffer(&self) -> i64 {
        self.buffer
    }

    pub fn multiplier_period(&self) -> u32 {
        self.multiplier_period
    }

    /// Weight of an event arriving while momentum is `momentum`.
    pub fn multiplier(&self, momentum: u32) -> i64 {
        multiplier(momentum, self.multiplier_period)
    }

    pub(crate) fn with(self, phase: StreakPhase, momentum: u32, buffer: i64) -> Self {
        Self {
            phase,
            momentum,
            buffer,
            ..self
        }
    }
}

impl Default for StreakState {
    fn default() -> Self {
        Self::new(DEFAULT_MULTIPLIER_PERIOD)
    }
}

impl MachineState for StreakState {}

/// `2^floor(momentum / period)`, saturating at `2^62`.
pub fn multiplier(momentum: u32, period: u32) -> i64 {
    let exponent = (momentum / period.max(1)).min(62);
    1i64 << exponent
}
