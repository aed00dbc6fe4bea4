//! File-backed configuration store
//!
//! Maps the configuration namespace onto a real directory tree: each
//! configuration directory is a filesystem directory under the store
//! root, and its entries live in a `.entries.json` file inside it,
//! keyed by entry name. Removals are staged in memory and written out
//! by `sync`, matching the store contract's flush semantics.
//!
//! Subdirectories and entries are returned name-sorted; that is this
//! backend's "store-defined" order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{join_path, split_key, ConfEntry, ConfValue, ConfigStore};

/// Per-directory entries file name
const ENTRIES_FILE: &str = ".entries.json";

/// On-disk record for a single entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    value: ConfValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
}

/// File-backed store rooted at a local directory
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,

    /// Directories with staged changes, awaiting sync
    pending: BTreeMap<String, BTreeMap<String, EntryRecord>>,
}

impl FileStore {
    /// Open an existing store directory
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::NotFound {
                path: root.display().to_string(),
            });
        }
        Ok(Self {
            root,
            pending: BTreeMap::new(),
        })
    }

    /// Map a namespace path onto the backing filesystem
    fn fs_dir(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn entries_file(&self, path: &str) -> PathBuf {
        self.fs_dir(path).join(ENTRIES_FILE)
    }

    /// Load the entry records for one directory, preferring staged
    /// changes over the on-disk state
    fn load_records(&self, path: &str) -> StoreResult<BTreeMap<String, EntryRecord>> {
        if let Some(staged) = self.pending.get(path) {
            return Ok(staged.clone());
        }

        let file = self.entries_file(path);
        let data = match fs::read_to_string(&file) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::ReadFailed {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        serde_json::from_str(&data).map_err(|e| StoreError::Corrupt {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Stage an entry write; takes effect on sync. Mainly useful for
    /// building fixtures and seeding stores.
    pub fn put_entry(
        &mut self,
        dir: &str,
        name: &str,
        value: ConfValue,
        schema: Option<&str>,
    ) -> StoreResult<()> {
        let mut records = self.load_records(dir)?;
        records.insert(
            name.to_string(),
            EntryRecord {
                value,
                schema: schema.map(String::from),
            },
        );
        self.pending.insert(dir.to_string(), records);
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn list_subdirs(&self, path: &str) -> StoreResult<Vec<String>> {
        let dir = self.fs_dir(path);
        let reader = fs::read_dir(&dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: path.to_string(),
                }
            } else {
                StoreError::ReadFailed {
                    path: path.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let mut names = Vec::new();
        for item in reader {
            let item = item.map_err(|e| StoreError::ReadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
            let file_type = item.file_type().map_err(|e| StoreError::ReadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
            if file_type.is_dir() {
                names.push(item.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        Ok(names.iter().map(|n| join_path(path, n)).collect())
    }

    fn list_entries(&self, path: &str) -> StoreResult<Vec<ConfEntry>> {
        let records = self.load_records(path)?;
        Ok(records
            .into_iter()
            .map(|(name, record)| {
                ConfEntry::new(join_path(path, &name), record.value, record.schema)
            })
            .collect())
    }

    fn remove_key(&mut self, key: &str) -> StoreResult<()> {
        let (dir, name) = split_key(key).ok_or_else(|| StoreError::KeyNotFound {
            key: key.to_string(),
        })?;

        let mut records = self.load_records(dir)?;
        if records.remove(name).is_none() {
            return Err(StoreError::KeyNotFound {
                key: key.to_string(),
            });
        }

        debug!("staged removal of {}", key);
        self.pending.insert(dir.to_string(), records);
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        for (dir, records) in std::mem::take(&mut self.pending) {
            let fs_dir = self.fs_dir(&dir);
            fs::create_dir_all(&fs_dir).map_err(|e| StoreError::WriteFailed {
                path: dir.clone(),
                reason: e.to_string(),
            })?;

            let data = serde_json::to_string_pretty(&records).map_err(|e| {
                StoreError::WriteFailed {
                    path: dir.clone(),
                    reason: e.to_string(),
                }
            })?;

            fs::write(self.entries_file(&dir), data).map_err(|e| StoreError::WriteFailed {
                path: dir.clone(),
                reason: e.to_string(),
            })?;
            debug!("synced entries for {}", dir);
        }
        Ok(())
    }
}

/// Seed helper used by tests and fixtures: create the directory and
/// write its entries file in one step.
pub fn seed_dir(
    store_root: &Path,
    dir: &str,
    entries: &[(&str, ConfValue, Option<&str>)],
) -> StoreResult<()> {
    let mut store = FileStore::open(store_root)?;
    let fs_dir = store.fs_dir(dir);
    fs::create_dir_all(&fs_dir).map_err(|e| StoreError::WriteFailed {
        path: dir.to_string(),
        reason: e.to_string(),
    })?;
    for (name, value, schema) in entries {
        store.put_entry(dir, name, value.clone(), *schema)?;
    }
    store.sync()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_root() {
        let err = FileStore::open("/nonexistent/store/path").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_subdirs_sorted() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("apps/zeta")).unwrap();
        fs::create_dir_all(tmp.path().join("apps/alpha")).unwrap();

        let store = FileStore::open(tmp.path()).unwrap();
        assert_eq!(store.list_subdirs("/").unwrap(), vec!["/apps"]);
        assert_eq!(
            store.list_subdirs("/apps").unwrap(),
            vec!["/apps/alpha", "/apps/zeta"]
        );
    }

    #[test]
    fn test_entries_round_trip() {
        let tmp = tempdir().unwrap();
        seed_dir(
            tmp.path(),
            "/apps/foo",
            &[
                ("retries", ConfValue::Int(3), Some("s1")),
                ("greeting", ConfValue::String("hi".into()), None),
            ],
        )
        .unwrap();

        let store = FileStore::open(tmp.path()).unwrap();
        let entries = store.list_entries("/apps/foo").unwrap();
        assert_eq!(entries.len(), 2);
        // Name-sorted order
        assert_eq!(entries[0].key, "/apps/foo/greeting");
        assert!(!entries[0].is_known());
        assert_eq!(entries[1].key, "/apps/foo/retries");
        assert_eq!(entries[1].value, ConfValue::Int(3));
        assert!(entries[1].is_known());
    }

    #[test]
    fn test_missing_entries_file_is_empty() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("empty")).unwrap();

        let store = FileStore::open(tmp.path()).unwrap();
        assert!(store.list_entries("/empty").unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_entries_file() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("bad")).unwrap();
        fs::write(tmp.path().join("bad").join(ENTRIES_FILE), "not json").unwrap();

        let store = FileStore::open(tmp.path()).unwrap();
        let err = store.list_entries("/bad").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_remove_is_staged_until_sync() {
        let tmp = tempdir().unwrap();
        seed_dir(
            tmp.path(),
            "/apps/foo",
            &[("stale", ConfValue::Bool(true), None)],
        )
        .unwrap();

        let mut store = FileStore::open(tmp.path()).unwrap();
        store.remove_key("/apps/foo/stale").unwrap();

        // Staged view already excludes the key...
        assert!(store.list_entries("/apps/foo").unwrap().is_empty());

        // ...but the file still has it until sync
        let fresh = FileStore::open(tmp.path()).unwrap();
        assert_eq!(fresh.list_entries("/apps/foo").unwrap().len(), 1);

        store.sync().unwrap();
        let synced = FileStore::open(tmp.path()).unwrap();
        assert!(synced.list_entries("/apps/foo").unwrap().is_empty());
    }
}
