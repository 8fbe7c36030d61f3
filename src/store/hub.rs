use std::sync::OnceLock;

use super::action::ActionChannel;
use super::snapshot::SnapshotStore;

static GLOBAL: OnceLock<StateHub> = OnceLock::new();

/// The snapshot store together with the action channel that feeds it.
///
/// `StateHub::global()` is the process-wide instance; it is created empty
/// on first use and never reset. Separate hubs are fully independent.
#[derive(Clone, Default)]
pub struct StateHub {
    snapshots: SnapshotStore,
    actions: ActionChannel,
}

impl StateHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> StateHub {
        GLOBAL.get_or_init(StateHub::new).clone()
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn actions(&self) -> &ActionChannel {
        &self.actions
    }
}
