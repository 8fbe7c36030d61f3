use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc::UnboundedReceiver;

use super::subscription::Subscription;

/// Async sequence of distinct values at one store path.
///
/// Yields the value current at creation first. Dropping it unsubscribes.
pub struct Changes<T> {
    rx: UnboundedReceiver<T>,
    subscription: Subscription,
}

impl<T> Changes<T> {
    pub(crate) fn new(rx: UnboundedReceiver<T>, subscription: Subscription) -> Self {
        Self { rx, subscription }
    }

    /// Next distinct value. `None` once closed.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Next value if one is already queued.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Stop listening. Values already queued can still be received.
    pub fn close(&mut self) {
        self.subscription.unsubscribe();
        self.rx.close();
    }
}

impl<T> Stream for Changes<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
