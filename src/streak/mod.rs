//! Streak engine: turns bursts of increments and decrements into a
//! momentum signal and one buffered commit per burst.
//!
//! ```text
//!            event                  D without events
//!   IDLE ──────────→ ACTIVE ────────────────────────→ DECAYING
//!    ↑                 ↑  event                          │ every T:
//!    │                 └─────────────────────────────────┤ momentum - 1
//!    └──────────── momentum == 0: flush buffer ──────────┘
//! ```
//!
//! Each event adds `change * 2^floor(momentum / K)` to the buffer, where
//! `momentum` is the value the event arrives at, before it is counted.

pub mod display;
mod engine;
mod intent;
mod reducer;
mod state;
mod teardown;

pub use engine::{StreakEngine, StreakHandle, StreakView};
pub use intent::StreakIntent;
pub use reducer::{StreakEffect, StreakReducer};
pub use state::{multiplier, StreakPhase, StreakState, DEFAULT_MULTIPLIER_PERIOD};
pub use teardown::Teardown;
