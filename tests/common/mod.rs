//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use streakstore::config::StreakConfig;
use streakstore::store::{Action, StateHub, Store, Subscription};

pub const FLUSH: &str = "FLUSH";

/// Collects every action of type `kind` dispatched on `hub`.
pub struct ActionLog {
    actions: Arc<Mutex<Vec<Action>>>,
    _subscription: Subscription,
}

impl ActionLog {
    pub fn attach(hub: &StateHub, kind: &str) -> Self {
        let actions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&actions);
        let kind = kind.to_string();
        let subscription = hub.actions().subscribe(move |action| {
            if action.kind == kind {
                sink.lock().push(action.clone());
            }
        });
        Self {
            actions,
            _subscription: subscription,
        }
    }

    pub fn len(&self) -> usize {
        self.actions.lock().len()
    }

    pub fn payloads(&self) -> Vec<i64> {
        self.actions
            .lock()
            .iter()
            .map(|a| a.payload_as::<i64>().expect("numeric payload"))
            .collect()
    }
}

/// Counter store whose `FLUSH` reducer adds the payload.
pub fn counter_store(hub: &StateHub) -> Store<i64> {
    Store::with_hub(hub, ["counter"], 0i64)
        .expect("valid path")
        .add_reducer(FLUSH, |value, action| {
            value + action.payload_as::<i64>().unwrap_or(0)
        })
}

/// Default timings: D = 300ms, T = 150ms, K = 10.
pub fn streak_config() -> StreakConfig {
    StreakConfig::default()
}

/// Let spawned tasks run without moving the paused clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    settle().await;
}
