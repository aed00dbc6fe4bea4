//! In-memory configuration store
//!
//! Used as a test double throughout the crate and for building
//! fixtures programmatically. Subdirectories and entries are returned
//! in insertion order, which makes traversal-order assertions exact.
//! Failures can be injected per path to exercise error handling.

use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};
use crate::store::{join_path, split_key, ConfEntry, ConfValue, ConfigStore};

/// In-memory store backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Parent path -> child directory names, in insertion order
    children: BTreeMap<String, Vec<String>>,

    /// Directory path -> entries, in insertion order
    entries: BTreeMap<String, Vec<ConfEntry>>,

    /// Paths for which list_subdirs should fail, with the message
    fail_subdirs: BTreeMap<String, String>,

    /// Paths for which list_entries should fail, with the message
    fail_entries: BTreeMap<String, String>,

    /// Keys removed since the last sync
    pending_removals: usize,

    /// Number of sync calls observed
    sync_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory, creating any missing ancestors
    pub fn add_dir(&mut self, path: &str) {
        assert!(path.starts_with('/'), "store paths are absolute");
        if path == "/" {
            return;
        }

        let mut parent = String::from("/");
        for name in path.trim_start_matches('/').split('/') {
            let full = join_path(&parent, name);
            let siblings = self.children.entry(parent.clone()).or_default();
            if !siblings.iter().any(|s| s == name) {
                siblings.push(name.to_string());
            }
            parent = full;
        }
    }

    /// Add an entry under `dir`, creating the directory if needed
    pub fn add_entry(&mut self, dir: &str, name: &str, value: ConfValue, schema: Option<&str>) {
        self.add_dir(dir);
        let key = join_path(dir, name);
        self.entries
            .entry(dir.to_string())
            .or_default()
            .push(ConfEntry::new(key, value, schema.map(String::from)));
    }

    /// Make list_subdirs fail at `path` with `message`
    pub fn fail_subdirs_at(&mut self, path: &str, message: &str) {
        self.fail_subdirs.insert(path.to_string(), message.to_string());
    }

    /// Make list_entries fail at `path` with `message`
    pub fn fail_entries_at(&mut self, path: &str, message: &str) {
        self.fail_entries.insert(path.to_string(), message.to_string());
    }

    /// Removals staged since the last sync
    pub fn pending_removals(&self) -> usize {
        self.pending_removals
    }

    /// Number of times sync() was called
    pub fn sync_count(&self) -> usize {
        self.sync_count
    }

    /// Total entries currently stored, across all directories
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl ConfigStore for MemoryStore {
    fn list_subdirs(&self, path: &str) -> StoreResult<Vec<String>> {
        if let Some(message) = self.fail_subdirs.get(path) {
            return Err(StoreError::Backend(message.clone()));
        }

        Ok(self
            .children
            .get(path)
            .map(|names| names.iter().map(|n| join_path(path, n)).collect())
            .unwrap_or_default())
    }

    fn list_entries(&self, path: &str) -> StoreResult<Vec<ConfEntry>> {
        if let Some(message) = self.fail_entries.get(path) {
            return Err(StoreError::Backend(message.clone()));
        }

        Ok(self.entries.get(path).cloned().unwrap_or_default())
    }

    fn remove_key(&mut self, key: &str) -> StoreResult<()> {
        let (dir, _) = split_key(key).ok_or_else(|| StoreError::KeyNotFound {
            key: key.to_string(),
        })?;

        let entries = self.entries.get_mut(dir).ok_or_else(|| StoreError::KeyNotFound {
            key: key.to_string(),
        })?;

        let before = entries.len();
        entries.retain(|e| e.key != key);
        if entries.len() == before {
            return Err(StoreError::KeyNotFound {
                key: key.to_string(),
            });
        }

        self.pending_removals += 1;
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        self.pending_removals = 0;
        self.sync_count += 1;
        Ok(())
    }
}
