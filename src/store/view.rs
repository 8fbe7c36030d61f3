//! Path-scoped store handle.
//!
//! A [`Store`] reads and writes one location of the shared snapshot,
//! exposes its distinct values and hosts the reducers that update it.

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use super::action::Action;
use super::changes::Changes;
use super::hub::StateHub;
use super::lens;
use super::path::Path;
use super::subscription::Subscription;
use crate::error::{ReducerError, StoreError};

/// Values that can live at a store path.
///
/// Values cross the snapshot boundary through serde, so callers always get
/// owned copies and never a reference into the shared tree.
pub trait StoreValue: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static {}

impl<T> StoreValue for T where
    T: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static
{
}

struct Binding<T> {
    hub: StateHub,
    path: Path,
    default: T,
}

impl<T: StoreValue> Binding<T> {
    fn value(&self) -> T {
        self.value_in(&self.hub.snapshots().current())
    }

    fn value_in(&self, snapshot: &Value) -> T {
        match lens::lookup(snapshot, &self.path) {
            None => self.default.clone(),
            Some(raw) => T::deserialize(raw).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %self.path,
                    error = %err,
                    "Stored value has an unexpected shape, using default"
                );
                self.default.clone()
            }),
        }
    }

    fn commit(&self, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value).map_err(|err| StoreError::Encode {
            path: self.path.to_string(),
            message: err.to_string(),
        })?;
        self.hub
            .snapshots()
            .update(|current| lens::write(current, &self.path, encoded));
        Ok(())
    }

    fn report(&self, err: &ReducerError) {
        tracing::error!(path = %self.path, error = %err, "Reducer failed, snapshot left unchanged");
    }
}

/// Handle bound to one path of the shared snapshot.
///
/// Clones share the binding and its reducers. Reducers stay registered
/// until the last clone is dropped.
pub struct Store<T: StoreValue> {
    binding: Arc<Binding<T>>,
    reducers: Arc<Mutex<Vec<Subscription>>>,
}

impl<T: StoreValue> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
            reducers: Arc::clone(&self.reducers),
        }
    }
}

impl<T: StoreValue> Store<T> {
    /// Bind to `path` on the process-wide hub.
    pub fn new<I, S>(path: I, default: T) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_hub(&StateHub::global(), path, default)
    }

    /// Bind to `path` on an explicit hub.
    pub fn with_hub<I, S>(hub: &StateHub, path: I, default: T) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::at(hub, Path::new(path)?, default))
    }

    pub fn at(hub: &StateHub, path: Path, default: T) -> Self {
        Self {
            binding: Arc::new(Binding {
                hub: hub.clone(),
                path,
                default,
            }),
            reducers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.binding.path
    }

    pub fn hub(&self) -> &StateHub {
        &self.binding.hub
    }

    /// Current value at the path, or the default when absent.
    pub fn value(&self) -> T {
        self.binding.value()
    }

    /// Write `value` at the path and publish.
    pub fn set_value(&self, value: T) -> Result<(), StoreError> {
        self.binding.commit(&value)
    }

    /// Call `listener` with the current value, then with every value that
    /// differs from the previous one delivered.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let binding = Arc::clone(&self.binding);
        let last: Mutex<Option<T>> = Mutex::new(None);
        self.binding.hub.snapshots().subscribe(move |snapshot| {
            let value = binding.value_in(snapshot);
            {
                let mut last = last.lock();
                if last.as_ref() == Some(&value) {
                    return;
                }
                *last = Some(value.clone());
            }
            listener(value);
        })
    }

    /// A fresh stream of distinct values, starting with the current one.
    pub fn changes(&self) -> Changes<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |value| {
            let _ = tx.send(value);
        });
        Changes::new(rx, subscription)
    }

    /// Register a reducer for actions of type `kind`.
    #[must_use = "the reducer is removed when the last clone of the store is dropped"]
    pub fn add_reducer<F>(self, kind: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(T, &Action) -> T + Send + Sync + 'static,
    {
        self.try_add_reducer(kind, move |value, action| {
            Ok::<T, Infallible>(reducer(value, action))
        })
    }

    /// Register a reducer that may fail. A failure is logged and the
    /// snapshot is not touched.
    #[must_use = "the reducer is removed when the last clone of the store is dropped"]
    pub fn try_add_reducer<F, E>(self, kind: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(T, &Action) -> Result<T, E> + Send + Sync + 'static,
        E: Display,
    {
        let binding = Arc::clone(&self.binding);
        let subscription = self.binding.hub.actions().on(kind, move |action| {
            let result = reducer(binding.value(), action)
                .map_err(|err| ReducerError::failed(&action.kind, err))
                .and_then(|next| {
                    binding
                        .commit(&next)
                        .map_err(|err| ReducerError::failed(&action.kind, err))
                });
            if let Err(err) = result {
                binding.report(&err);
            }
        });
        self.reducers.lock().push(subscription);
        self
    }

    /// Register a reducer whose result resolves later on the tokio runtime.
    ///
    /// The result is written against the snapshot current when it resolves.
    /// Overlapping invocations are not ordered against each other; the last
    /// one to resolve wins.
    #[must_use = "the reducer is removed when the last clone of the store is dropped"]
    pub fn add_async_reducer<F, Fut, E>(self, kind: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(T, Action) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let binding = Arc::clone(&self.binding);
        let subscription = self.binding.hub.actions().on(kind, move |action| {
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                binding.report(&ReducerError::Runtime {
                    action: action.kind.clone(),
                });
                return;
            };
            let pending = reducer(binding.value(), action.clone());
            let binding = Arc::clone(&binding);
            let kind = action.kind.clone();
            runtime.spawn(async move {
                let result = pending
                    .await
                    .map_err(|err| ReducerError::failed(&kind, err))
                    .and_then(|next| {
                        binding
                            .commit(&next)
                            .map_err(|err| ReducerError::failed(&kind, err))
                    });
                if let Err(err) = result {
                    binding.report(&err);
                }
            });
        });
        self.reducers.lock().push(subscription);
        self
    }
}

impl<T: StoreValue + std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.binding.path)
            .field("default", &self.binding.default)
            .field("reducers", &self.reducers.lock().len())
            .finish()
    }
}
