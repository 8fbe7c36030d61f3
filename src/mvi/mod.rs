//! Intent/reducer primitives for explicit state machines.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State
//!    ↑          │
//!    │          └──→ Effect ──→ driver (timers, dispatch)
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable machine state
//! - **Intent**: User events or timer expiries
//! - **Reducer**: Pure function from (State, Intent) to the next state and
//!   an optional effect for the driver to perform

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::{Reducer, Transition};
pub use state::MachineState;
