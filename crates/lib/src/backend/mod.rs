//! Storage backends for Banter
//!
//! This module provides the [`KeyValueStore`] trait and its implementations.
//!
//! The trait is deliberately small: the history store and the theme selection
//! each own one string slot, and serialize their whole state into it on every
//! change. Backends never interpret the values they hold.

use async_trait::async_trait;

use crate::Result;

mod errors;
mod in_memory;
mod json_file;

pub use errors::BackendError;
pub use in_memory::InMemory;
pub use json_file::JsonFile;

/// A durable string key-value store.
///
/// Implementations must be `Send` and `Sync` so a single store can be shared
/// between the conversation and its deferred reply tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    /// `Ok(None)` if the key has never been written, or an error if the
    /// underlying medium could not be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// The write is complete when this returns `Ok`.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
