//! Shared key-value store carrying tokens and IDs between probe runs
//!
//! Each flow run is a separate process invocation, so tokens captured by one
//! run (login) have to reach the next (logout, user CRUD) through a small
//! JSON document on disk: a flat string-to-string map. The store is an
//! explicit object handed to each flow, which keeps the dependency visible
//! and lets tests substitute an in-memory instance.

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flat persisted string-to-string mapping
///
/// Writes are read-merge-write: every `set` reloads the file, merges keys
/// written since this instance was opened, then persists the whole map.
/// Single sequential invocation is the only supported usage; there is no
/// locking and no atomic rename, last writer wins.
#[derive(Debug)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl ConfigStore {
    /// Opens the store at `path`, reading it if present, else starting empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = Self::read_file(&path)?;
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Creates a non-persisted store, for tests and dry runs
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    /// Returns the value for `key`, or `None` if it was never stored
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sets `key` to `value` and persists the full mapping
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        if let Some(path) = self.path.clone() {
            // Merge keys another run may have written since we loaded.
            let on_disk = Self::read_file(&path)?;
            for (k, v) in on_disk {
                self.values.entry(k).or_insert(v);
            }
        }
        let key = key.into();
        debug!("Storing key '{key}'");
        self.values.insert(key, value.into());
        self.persist()
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self) -> Result<()> {
        if let Some(ref path) = self.path {
            let json = serde_json::to_string_pretty(&self.values)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }
}
