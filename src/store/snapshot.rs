//! Reactive container for the whole-state snapshot.
//!
//! The snapshot is never mutated in place. Every accepted change installs a
//! new tree, so a reader holding an `Arc` keeps a complete, consistent view.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use serde_json::{Map, Value};

use super::subscription::{Registry, Subscription};

/// Immutable whole-state tree.
pub type Snapshot = Arc<Value>;

type SnapshotListener = dyn Fn(&Snapshot) + Send + Sync;

/// Holds the current snapshot and notifies subscribers on replacement.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<SnapshotInner>,
}

struct SnapshotInner {
    current: Mutex<Snapshot>,
    listeners: Mutex<Registry<SnapshotListener>>,
    /// Held from install until every listener has seen the snapshot.
    /// Reentrant so a listener may publish on the same thread.
    delivery: ReentrantMutex<()>,
}

impl SnapshotStore {
    /// A store holding an empty object.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SnapshotInner {
                current: Mutex::new(Arc::new(Value::Object(Map::new()))),
                listeners: Mutex::new(Registry::new()),
                delivery: ReentrantMutex::new(()),
            }),
        }
    }

    pub fn current(&self) -> Snapshot {
        Arc::clone(&self.inner.current.lock())
    }

    /// Register a listener. It is called right away with the current
    /// snapshot, then with every published one, in registration order.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let listener: Arc<SnapshotListener> = Arc::new(listener);
        let _delivery = self.inner.delivery.lock();
        let id = self.inner.listeners.lock().insert(Arc::clone(&listener));

        let weak: Weak<SnapshotInner> = Arc::downgrade(&self.inner);
        let subscription = Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.lock().remove(id);
            }
        });

        listener(&self.current());
        subscription
    }

    /// Install `snapshot` and notify every subscriber before returning.
    ///
    /// Publishes from different threads are delivered one at a time, in
    /// install order.
    pub fn publish(&self, snapshot: Value) {
        let _delivery = self.inner.delivery.lock();
        let snapshot = Arc::new(snapshot);
        *self.inner.current.lock() = Arc::clone(&snapshot);
        self.notify(&snapshot);
    }

    /// Replace the snapshot with `f(current)`.
    ///
    /// Read and install happen under one lock, so no concurrent publish is
    /// lost between them.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&Value) -> Value,
    {
        let _delivery = self.inner.delivery.lock();
        let snapshot = {
            let mut current = self.inner.current.lock();
            let next = Arc::new(f(&current));
            *current = Arc::clone(&next);
            next
        };
        self.notify(&snapshot);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    fn notify(&self, snapshot: &Snapshot) {
        let listeners = self.inner.listeners.lock().listeners();
        for listener in listeners {
            // A listener may publish reentrantly. The remaining listeners
            // already got the newer snapshot, so stop delivering this one.
            if !Arc::ptr_eq(snapshot, &self.inner.current.lock()) {
                tracing::trace!("Snapshot superseded during notification");
                break;
            }
            listener(snapshot);
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
