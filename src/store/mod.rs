//! Per-workspace key-value state storage.
//!
//! The mode state machine reads every query straight from a [`StateStore`],
//! so whatever is stored here is the single source of truth.

mod file;

pub use file::{workspace_state_path, JsonFileStore};

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while persisting state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the directory holding the state file.
    #[error("Failed to create state directory at {path:?}: {source}")]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read an existing state file.
    #[error("Failed to read state file at {path:?}: {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the state file.
    #[error("Failed to write state file at {path:?}: {source}")]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// State file exists but is not a JSON object.
    #[error("Corrupt state file at {path:?}: {source}")]
    Corrupt {
        /// File with invalid contents.
        path: PathBuf,
        /// JSON error details.
        #[source]
        source: serde_json::Error,
    },
}

/// Workspace-scoped key-value store.
pub trait StateStore {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`.
    ///
    /// Implementations must make the new value visible to [`StateStore::get`]
    /// even when durably persisting it fails.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Typed read helper. Values that fail to deserialize read as absent.
pub fn get_typed<T>(store: &dyn StateStore, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    store
        .get(key)
        .and_then(|value| serde_json::from_value(value).ok())
}

/// In-memory store that forgets everything on drop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
