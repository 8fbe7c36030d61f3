use std::sync::Arc;

use parking_lot::Mutex;

type Cancel = Box<dyn FnOnce() + Send>;

/// Handle to a registered listener.
///
/// `unsubscribe` is idempotent. Dropping the handle also deregisters, so
/// keep it alive for as long as notifications are wanted.
pub struct Subscription {
    cancel: Mutex<Option<Cancel>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// Stop further notifications.
    pub fn unsubscribe(&self) {
        // Take first so the lock is not held while the registry is touched.
        let cancel = self.cancel.lock().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.lock().is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Ordered listener list with stable ids for removal.
pub(crate) struct Registry<L: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Arc<L>)>,
}

impl<L: ?Sized> Registry<L> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, listener: Arc<L>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Clones of the listeners in registration order, for calling outside
    /// the lock.
    pub(crate) fn listeners(&self) -> Vec<Arc<L>> {
        self.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
