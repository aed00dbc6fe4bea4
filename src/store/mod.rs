//! Configuration store access
//!
//! The store is a hierarchical key/value database addressed by
//! slash-delimited paths ("/", "/apps/foo", ...). Every backend
//! implements the same small contract:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    ConfigStore                       │
//! │  - list_subdirs: immediate children of one path      │
//! │  - list_entries: key/value entries of one path       │
//! │  - remove_key / sync: staged deletion + flush        │
//! └──────────────────────────────────────────────────────┘
//!            │                             │
//!            ▼                             ▼
//!      MemoryStore                     FileStore
//!   (tests, fixtures)          (one directory per config
//!                               dir, entries as JSON)
//! ```
//!
//! Entry keys are fully qualified: the entry `retries` in directory
//! `/apps/foo` has the key `/apps/foo/retries`.

mod file;
mod memory;
pub mod value;

pub use file::{seed_dir, FileStore};
pub use memory::MemoryStore;
pub use value::{ConfValue, ValueKind};

use crate::error::StoreResult;

/// One key/value entry in the store
#[derive(Debug, Clone, PartialEq)]
pub struct ConfEntry {
    /// Fully qualified key path
    pub key: String,

    /// The typed value
    pub value: ConfValue,

    /// Name of the schema describing this entry, if any
    pub schema: Option<String>,
}

impl ConfEntry {
    pub fn new(key: impl Into<String>, value: ConfValue, schema: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
            schema,
        }
    }

    /// Whether a schema is attached. An empty schema name counts as
    /// unattached.
    pub fn is_known(&self) -> bool {
        self.schema.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Contract every configuration store backend implements
///
/// All operations are synchronous and may fail with a message-carrying
/// [`StoreError`](crate::error::StoreError). The order of returned
/// subdirectories and entries is backend-defined; callers must not
/// assume any particular ordering beyond per-call consistency.
pub trait ConfigStore {
    /// List the immediate subdirectories of `path`, as full paths
    fn list_subdirs(&self, path: &str) -> StoreResult<Vec<String>>;

    /// List the entries directly under `path` (non-recursive)
    fn list_entries(&self, path: &str) -> StoreResult<Vec<ConfEntry>>;

    /// Stage removal of a key; takes effect on [`sync`](Self::sync)
    fn remove_key(&mut self, key: &str) -> StoreResult<()>;

    /// Flush pending removals to the backing medium
    fn sync(&mut self) -> StoreResult<()>;
}

/// Join a directory path and a child name into a full path
pub(crate) fn join_path(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Split a fully qualified key into its directory and entry name
pub(crate) fn split_key(key: &str) -> Option<(&str, &str)> {
    let idx = key.rfind('/')?;
    let name = &key[idx + 1..];
    if name.is_empty() {
        return None;
    }
    let dir = if idx == 0 { "/" } else { &key[..idx] };
    Some((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "apps"), "/apps");
        assert_eq!(join_path("/apps", "foo"), "/apps/foo");
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("/apps/foo/retries"), Some(("/apps/foo", "retries")));
        assert_eq!(split_key("/retries"), Some(("/", "retries")));
        assert_eq!(split_key("/apps/"), None);
        assert_eq!(split_key("retries"), None);
    }

    #[test]
    fn test_entry_known() {
        let known = ConfEntry::new("/a/k", ConfValue::Int(1), Some("s1".into()));
        assert!(known.is_known());

        let unknown = ConfEntry::new("/a/k", ConfValue::Int(1), None);
        assert!(!unknown.is_known());

        let blank = ConfEntry::new("/a/k", ConfValue::Int(1), Some(String::new()));
        assert!(!blank.is_known());
    }
}
