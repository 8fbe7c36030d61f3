//! Path-addressed reactive state store and a momentum streak engine.
//!
//! - [`store`]: snapshot store, action channel and path-scoped [`store::Store`] handles
//! - [`streak`]: turns bursts of events into momentum and one buffered commit
//! - [`likes`]: the likes counter wired to a streak engine

pub mod config;
pub mod error;
pub mod likes;
pub mod logging;
pub mod mvi;
pub mod store;
pub mod streak;
