//! Base trait for intents fed into a reducer.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (increment, decrement)
/// - Timer expiries (debounce window elapsed, decay tick)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
