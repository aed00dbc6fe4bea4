//! conf-cleaner - Configuration Store Cleanup Tool
//!
//! Walks a hierarchical configuration database, classifies every entry
//! as schema-backed ("known") or orphaned ("unknown"), and helps the
//! operator export and remove the orphans.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     ConfigStore                          │
//! │        (file-backed tree, or in-memory fixture)          │
//! └───────────────┬─────────────────────────────────────────┘
//!                 │ list_subdirs / list_entries
//!                 ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                   CleanerSession                         │
//! │  update():  depth-first pre-order directory discovery    │
//! │             (one atomic call, aborts wholesale on error) │
//! │  classify_next_dir(): one directory per call, cursor     │
//! │             driven by the caller - the natural           │
//! │             cancellation point                           │
//! │  counters:  dirs / entries seen / unknown entries        │
//! └───────────────┬─────────────────────────────────────────┘
//!                 │ DirReport { total_seen, unknown pairs }
//!                 ▼
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │       Dump export        │   │   Confirmed deletion     │
//! │  (markup tree, backup)   │   │   remove_key + sync      │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use conf_cleaner::cleaner::CleanerSession;
//! use conf_cleaner::store::{ConfValue, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.add_entry("/apps/foo", "stale", ConfValue::Int(3), None);
//! store.add_entry("/apps/foo", "kept", ConfValue::Bool(true), Some("s1"));
//!
//! let mut session = CleanerSession::new(store);
//! session.update().unwrap();
//!
//! let mut orphans = Vec::new();
//! while session.has_next_dir() {
//!     orphans.extend(session.classify_next_dir().unwrap().unknown);
//! }
//! assert_eq!(orphans.len(), 1);
//! assert_eq!(orphans[0].key, "/apps/foo/stale");
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod export;
pub mod progress;
pub mod store;

pub use cleaner::{CleanerSession, DirReport, ScanOptions, UnknownPair};
pub use config::{CleanConfig, CliArgs};
pub use error::{CleanerError, Result, StoreError};
pub use store::{ConfEntry, ConfValue, ConfigStore, FileStore, MemoryStore, ValueKind};
