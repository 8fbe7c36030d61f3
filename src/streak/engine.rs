//! Timer-driven runtime for the streak state machine.
//!
//! The engine owns the debounce and decay timers, feeds their expiries and
//! the user events into [`StreakReducer`], performs the flush effect and
//! publishes the combined view.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::config::StreakConfig;
use crate::error::StoreError;
use crate::mvi::{Reducer, Transition};
use crate::store::{Changes, Store};
use crate::streak::intent::StreakIntent;
use crate::streak::reducer::{StreakEffect, StreakReducer};
use crate::streak::state::{StreakPhase, StreakState};
use crate::streak::teardown::Teardown;

/// Stored value, current momentum and pending buffer, as one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakView {
    pub value: i64,
    pub momentum: u32,
    pub buffer: i64,
}

impl StreakView {
    /// Stored value plus the not yet flushed buffer.
    pub fn total(&self) -> i64 {
        self.value.saturating_add(self.buffer)
    }
}

type FlushFn = Box<dyn Fn(i64) -> Result<(), StoreError> + Send>;

pub struct StreakEngine {
    state: StreakState,
    debounce: Duration,
    decay_interval: Duration,
    /// When the debounce window closes or the next decay tick is due.
    deadline: Option<Instant>,
    store: Store<i64>,
    changes: Changes<i64>,
    events: mpsc::UnboundedReceiver<i64>,
    view: watch::Sender<StreakView>,
    flush: FlushFn,
    teardown: Teardown,
}

impl StreakEngine {
    /// Start an engine over `store` on the current tokio runtime.
    ///
    /// `flush` is called once per completed streak with the final buffer.
    /// Configuration is read once here.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F>(config: &StreakConfig, store: Store<i64>, flush: F) -> StreakHandle
    where
        F: Fn(i64) -> Result<(), StoreError> + Send + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(StreakView {
            value: store.value(),
            ..StreakView::default()
        });
        let teardown = Teardown::new();

        let engine = StreakEngine {
            state: StreakState::new(config.multiplier_period),
            debounce: config.debounce(),
            decay_interval: config.decay_interval(),
            deadline: None,
            changes: store.changes(),
            store,
            events: events_rx,
            view: view_tx,
            flush: Box::new(flush),
            teardown: teardown.clone(),
        };
        let task = tokio::spawn(engine.run());

        StreakHandle {
            events: events_tx,
            view: view_rx,
            teardown,
            task,
        }
    }

    async fn run(mut self) {
        tracing::debug!(path = %self.store.path(), "Streak engine started");

        loop {
            let deadline = self.deadline;
            tokio::select! {
                biased;
                _ = self.teardown.wait() => break,
                event = self.events.recv() => match event {
                    Some(amount) => self.on_change(amount),
                    None => break,
                },
                value = self.changes.recv() => match value {
                    Some(value) => self.publish_view(|view| view.value = value),
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_timer();
                }
            }
        }

        // Teardown never flushes; whatever is buffered is dropped here.
        tracing::debug!(
            path = %self.store.path(),
            momentum = self.state.momentum(),
            discarded = self.state.buffer(),
            "Streak engine stopped"
        );
    }

    fn on_change(&mut self, amount: i64) {
        self.step(StreakIntent::Change(amount));
        self.deadline = Some(Instant::now() + self.debounce);
    }

    fn on_timer(&mut self) {
        let Some(due) = self.deadline else {
            return;
        };
        let intent = match self.state.phase() {
            StreakPhase::Active => StreakIntent::DebounceElapsed,
            StreakPhase::Decaying => StreakIntent::DecayTick,
            StreakPhase::Idle => {
                self.deadline = None;
                return;
            }
        };
        self.step(intent);

        // Ticks are spaced from the previous due time, not from wake-up.
        self.deadline = match self.state.phase() {
            StreakPhase::Decaying => Some(due + self.decay_interval),
            _ => None,
        };
    }

    fn step(&mut self, intent: StreakIntent) {
        let previous = self.state.phase();
        let Transition { state, effect } = StreakReducer::reduce(self.state.clone(), intent);
        if state.phase() != previous {
            tracing::debug!(
                from = ?previous,
                to = ?state.phase(),
                momentum = state.momentum(),
                buffer = state.buffer(),
                "Streak phase changed"
            );
        }
        self.state = state;

        let mut value = None;
        if let Some(StreakEffect::Flush(amount)) = effect {
            self.flush(amount);
            value = Some(self.store.value());
        }

        let (momentum, buffer) = (self.state.momentum(), self.state.buffer());
        self.publish_view(|view| {
            view.momentum = momentum;
            view.buffer = buffer;
            if let Some(value) = value {
                view.value = value;
            }
        });
    }

    fn flush(&self, amount: i64) {
        if self.teardown.is_signaled() {
            tracing::debug!(amount, "Engine torn down, flush dropped");
            return;
        }
        match (self.flush)(amount) {
            Ok(()) => tracing::debug!(path = %self.store.path(), amount, "Streak flushed"),
            Err(err) => tracing::error!(
                path = %self.store.path(),
                amount,
                error = %err,
                "Streak flush rejected"
            ),
        }
    }

    /// Apply `update` to the view; receivers are woken only on a real change.
    /// Several updates before a receiver looks are seen as one.
    fn publish_view(&self, update: impl FnOnce(&mut StreakView)) {
        self.view.send_if_modified(|view| {
            let before = *view;
            update(view);
            *view != before
        });
    }
}

/// Control surface of a running engine.
///
/// Dropping the handle tears the engine down, like [`StreakHandle::dispose`].
pub struct StreakHandle {
    events: mpsc::UnboundedSender<i64>,
    view: watch::Receiver<StreakView>,
    teardown: Teardown,
    task: JoinHandle<()>,
}

impl StreakHandle {
    pub fn increment(&self) {
        self.change(1);
    }

    pub fn decrement(&self) {
        self.change(-1);
    }

    /// Feed an arbitrary delta. Ignored after disposal.
    pub fn change(&self, amount: i64) {
        if self.teardown.is_signaled() {
            return;
        }
        let _ = self.events.send(amount);
    }

    /// Subscribe to the combined view.
    pub fn view(&self) -> watch::Receiver<StreakView> {
        self.view.clone()
    }

    /// The latest combined view.
    pub fn current(&self) -> StreakView {
        *self.view.borrow()
    }

    /// Stop the engine without flushing. Idempotent.
    pub fn dispose(&self) {
        if self.teardown.signal() {
            tracing::debug!("Streak engine disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.teardown.is_signaled()
    }

    /// Whether the engine task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for StreakHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
