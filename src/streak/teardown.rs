use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// One-shot cancellation signal shared between a handle and its task.
#[derive(Clone, Default)]
pub struct Teardown {
    signaled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns `true` only for the first call.
    pub fn signal(&self) -> bool {
        if self.signaled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.notify.notify_waiters();
        true
    }

    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::SeqCst)
    }

    /// Resolve once the signal has been raised.
    pub async fn wait(&self) {
        // Register with Notify before reading the flag, otherwise a signal
        // landing between the check and the await would be missed.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_signaled() {
            return;
        }
        notified.await;
    }
}
