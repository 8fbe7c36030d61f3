//! Path-addressed reactive state store.
//!
//! # Architecture
//!
//! ```text
//! dispatch(Action) ──→ ActionChannel ──→ Store reducer
//!                                            │ lens::write
//!                                            ↓
//! Store::changes() ←── lens::read ←── SnapshotStore::publish
//! ```
//!
//! - **SnapshotStore**: holds the single immutable snapshot
//! - **ActionChannel**: the only way to request a change
//! - **Store**: a handle scoped to one [`Path`] of the snapshot

mod action;
mod changes;
mod hub;
pub mod lens;
mod path;
mod snapshot;
mod subscription;
mod view;

pub use action::{Action, ActionChannel};
pub use changes::Changes;
pub use hub::StateHub;
pub use path::Path;
pub use snapshot::{Snapshot, SnapshotStore};
pub use subscription::Subscription;
pub use view::{Store, StoreValue};

use crate::error::StoreError;

/// Dispatch on the process-wide hub.
pub fn dispatch(action: Action) -> Result<(), StoreError> {
    StateHub::global().actions().dispatch(action)
}
