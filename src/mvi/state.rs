//! Base trait for machine state.

/// Marker trait for machine state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (everything the driver needs to schedule timers)
/// - Comparable (PartialEq for detecting changes)
pub trait MachineState: Clone + PartialEq + Default + Send + 'static {}
