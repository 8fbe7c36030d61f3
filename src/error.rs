//! Error types for the store and reducers.

use thiserror::Error;

/// Validation failures raised synchronously by the store surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The dispatched record has no usable string `type`.
    #[error("Action must be a record with a non-empty string `type` field: {reason}")]
    InvalidAction { reason: String },

    /// A store path could not be built.
    #[error("Store path must be a sequence of non-empty keys: {reason}")]
    InvalidPath { reason: String },

    /// A value could not be converted into snapshot form.
    #[error("Failed to encode value for '{path}': {message}")]
    Encode { path: String, message: String },
}

/// Failure of a single reducer invocation.
///
/// Reported at the reducer's resolution point; the snapshot is left as it
/// was and other reducers keep running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReducerError {
    #[error("Reducer for '{action}' failed: {message}")]
    Failed { action: String, message: String },

    #[error("Reducer for '{action}' is async but no tokio runtime is running")]
    Runtime { action: String },
}

impl ReducerError {
    /// Build a `Failed` error from any displayable cause.
    pub fn failed(action: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ReducerError::Failed {
            action: action.into(),
            message: cause.to_string(),
        }
    }
}
