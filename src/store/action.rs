//! Action records and the channel that broadcasts them.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::subscription::{Registry, Subscription};
use crate::error::StoreError;

/// A request to change state: a `type` tag plus an optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(kind: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload.into()),
        }
    }

    /// Payload decoded as `P`; `None` when missing or of another shape.
    pub fn payload_as<P: DeserializeOwned>(&self) -> Option<P> {
        self.payload
            .as_ref()
            .and_then(|payload| P::deserialize(payload).ok())
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.kind.is_empty() {
            return Err(StoreError::InvalidAction {
                reason: "`type` is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Accepts a raw record: an object with a string `type` and an optional
/// `payload`. Other fields are ignored.
impl TryFrom<Value> for Action {
    type Error = StoreError;

    fn try_from(record: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = record else {
            return Err(StoreError::InvalidAction {
                reason: "record is not an object".to_string(),
            });
        };
        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(_) => {
                return Err(StoreError::InvalidAction {
                    reason: "`type` is not a string".to_string(),
                })
            }
            None => {
                return Err(StoreError::InvalidAction {
                    reason: "`type` is missing".to_string(),
                })
            }
        };
        let action = Action {
            kind,
            payload: fields.remove("payload"),
        };
        action.validate()?;
        Ok(action)
    }
}

type ActionHandler = dyn Fn(&Action) + Send + Sync;

/// Synchronous broadcast of actions.
///
/// Handlers registered with [`ActionChannel::on`] are keyed by action type
/// and run first, in registration order; raw listeners from
/// [`ActionChannel::subscribe`] run after them.
#[derive(Clone)]
pub struct ActionChannel {
    inner: Arc<Mutex<HandlerTable>>,
}

struct HandlerTable {
    by_type: HashMap<String, Registry<ActionHandler>>,
    raw: Registry<ActionHandler>,
}

impl ActionChannel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HandlerTable {
                by_type: HashMap::new(),
                raw: Registry::new(),
            })),
        }
    }

    /// Validate and broadcast. An invalid action reaches no handler.
    pub fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        action.validate()?;

        let handlers = {
            let table = self.inner.lock();
            let mut handlers = table
                .by_type
                .get(&action.kind)
                .map(Registry::listeners)
                .unwrap_or_default();
            handlers.extend(table.raw.listeners());
            handlers
        };

        tracing::debug!(
            action = %action.kind,
            handlers = handlers.len(),
            "Dispatching action"
        );

        for handler in handlers {
            handler(&action);
        }
        Ok(())
    }

    /// Dispatch a raw JSON record after checking its shape.
    pub fn dispatch_record(&self, record: Value) -> Result<(), StoreError> {
        self.dispatch(Action::try_from(record)?)
    }

    /// Listen to every action.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Action) + Send + Sync + 'static,
    {
        let id = self.inner.lock().raw.insert(Arc::new(listener));
        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().raw.remove(id);
            }
        })
    }

    /// Listen to actions of one type.
    pub fn on<F>(&self, kind: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Action) + Send + Sync + 'static,
    {
        let kind = kind.into();
        let id = self
            .inner
            .lock()
            .by_type
            .entry(kind.clone())
            .or_insert_with(Registry::new)
            .insert(Arc::new(handler));

        let weak: Weak<Mutex<HandlerTable>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut table = inner.lock();
                if let Some(registry) = table.by_type.get_mut(&kind) {
                    registry.remove(id);
                    if registry.is_empty() {
                        table.by_type.remove(&kind);
                    }
                }
            }
        })
    }

    /// Wrap an action creator so that calling it dispatches the action.
    pub fn dispatcher<A, F>(&self, creator: F) -> impl Fn(A) -> Result<(), StoreError> + Send + Sync
    where
        F: Fn(A) -> Action + Send + Sync,
    {
        let channel = self.clone();
        move |args| channel.dispatch(creator(args))
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: &str) -> usize {
        self.inner
            .lock()
            .by_type
            .get(kind)
            .map(Registry::len)
            .unwrap_or(0)
    }
}

impl Default for ActionChannel {
    fn default() -> Self {
        Self::new()
    }
}
