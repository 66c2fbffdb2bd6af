//! JSON file backed store, one file per workspace.

use super::{StateStore, StoreError};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Store persisted as a single JSON object.
///
/// Every `set` writes the whole object back to disk. Values stay readable
/// in memory even if that write fails.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is not an error - the store starts empty and the file
    /// is created on the first `set`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            debug!(?path, "State file missing, starting empty");
            return Ok(Self {
                path,
                values: Map::new(),
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        let values = if contents.trim().is_empty() {
            Map::new()
        } else {
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        };

        Ok(Self { path, values })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::DirectoryCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(&self.values).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        std::fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// Resolve the state file for a workspace directory.
///
/// Returns `<state_dir>/workspaces/<sha256>.json` where the digest is taken
/// over the workspace path, so each directory gets its own state.
pub fn workspace_state_path(state_dir: &Path, workspace: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(workspace.as_os_str().as_encoded_bytes());
    state_dir
        .join("workspaces")
        .join(format!("{:x}.json", hasher.finalize()))
}
