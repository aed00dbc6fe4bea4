//! Cleaner session over a configuration store
//!
//! Lifecycle: a session starts uninitialized; `update()` performs the
//! full recursive directory discovery and resets all counters and the
//! cursor. After that, `classify_next_dir()` is called once per
//! discovered directory until the cursor is exhausted. Repeating
//! `update()` rediscovers from scratch; nothing is incremental.

use regex::Regex;
use tracing::{debug, info};

use crate::error::{CleanerError, Result};
use crate::store::{ConfEntry, ConfValue, ConfigStore};

/// Options controlling a scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Namespace path discovery starts from; the root itself is never
    /// part of the result
    pub root: String,

    /// Directories matching any pattern are skipped along with their
    /// whole subtree
    pub exclude_patterns: Vec<Regex>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: "/".to_string(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl ScanOptions {
    fn is_excluded(&self, path: &str) -> bool {
        self.exclude_patterns.iter().any(|re| re.is_match(path))
    }
}

/// An orphaned key together with its value, owned by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownPair {
    pub key: String,
    pub value: ConfValue,
}

/// Result of classifying one directory
#[derive(Debug, Clone)]
pub struct DirReport {
    /// The directory that was classified
    pub path: String,

    /// Entries inspected in this directory, known and unknown alike
    pub total_seen: u64,

    /// The unknown entries, in store order
    pub unknown: Vec<UnknownPair>,
}

/// Classify one directory's entries
///
/// Pure function: entries without a schema reference become unknown
/// pairs, entries with one are only counted. The session adds the
/// report to its running totals.
pub fn classify(path: String, entries: Vec<ConfEntry>) -> DirReport {
    let total_seen = entries.len() as u64;
    let unknown = entries
        .into_iter()
        .filter(|entry| !entry.is_known())
        .map(|entry| UnknownPair {
            key: entry.key,
            value: entry.value,
        })
        .collect();

    DirReport {
        path,
        total_seen,
        unknown,
    }
}

/// Session state for one cleanup run
///
/// Owns the store handle exclusively. Not designed for concurrent
/// access; a single logical caller advances the cursor.
pub struct CleanerSession<S> {
    store: S,
    options: ScanOptions,

    /// Pre-order snapshot of all discovered directories
    dirs: Vec<String>,

    /// Index of the next directory to classify
    cursor: usize,

    n_pairs: u64,
    n_unknown_pairs: u64,
    initialized: bool,
}

impl<S: ConfigStore> CleanerSession<S> {
    /// Create a session scanning from the namespace root
    pub fn new(store: S) -> Self {
        Self::with_options(store, ScanOptions::default())
    }

    pub fn with_options(store: S, options: ScanOptions) -> Self {
        Self {
            store,
            options,
            dirs: Vec::new(),
            cursor: 0,
            n_pairs: 0,
            n_unknown_pairs: 0,
            initialized: false,
        }
    }

    /// Discover the full directory tree, resetting all session state
    ///
    /// A store failure anywhere in the traversal aborts the whole
    /// discovery: the error names the failing path and the session is
    /// left uninitialized with no partial directory list.
    pub fn update(&mut self) -> Result<()> {
        self.initialized = false;
        self.dirs.clear();
        self.cursor = 0;
        self.n_pairs = 0;
        self.n_unknown_pairs = 0;

        let mut dirs = Vec::new();
        discover(&self.store, &self.options, &self.options.root, &mut dirs)?;
        info!(
            "discovered {} directories under {}",
            dirs.len(),
            self.options.root
        );

        self.dirs = dirs;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of directories discovered by the last update()
    pub fn dir_count(&self) -> u64 {
        self.dirs.len() as u64
    }

    /// Entries inspected so far, across all classified directories
    pub fn entry_count(&self) -> u64 {
        self.n_pairs
    }

    /// Entries classified unknown so far
    pub fn unknown_entry_count(&self) -> u64 {
        self.n_unknown_pairs
    }

    /// The discovered directories, in traversal order
    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    /// Whether classify_next_dir() has another directory to consume
    pub fn has_next_dir(&self) -> bool {
        self.initialized && self.cursor < self.dirs.len()
    }

    /// The directory the cursor points at
    pub fn current_dir(&self) -> Result<&str> {
        if !self.initialized {
            return Err(CleanerError::NotInitialized);
        }
        self.dirs
            .get(self.cursor)
            .map(String::as_str)
            .ok_or(CleanerError::CursorExhausted)
    }

    /// Classify the next directory and advance the cursor
    ///
    /// The cursor moves before the store query, so a failed query still
    /// consumes its position; callers must not expect to retry the same
    /// directory. Counters accumulated from earlier directories are
    /// kept even when this call fails.
    pub fn classify_next_dir(&mut self) -> Result<DirReport> {
        if !self.initialized {
            return Err(CleanerError::NotInitialized);
        }
        if self.cursor >= self.dirs.len() {
            return Err(CleanerError::CursorExhausted);
        }

        let path = self.dirs[self.cursor].clone();
        self.cursor += 1;

        let entries = self
            .store
            .list_entries(&path)
            .map_err(|source| CleanerError::Classify {
                path: path.clone(),
                source,
            })?;

        let report = classify(path, entries);
        self.n_pairs += report.total_seen;
        self.n_unknown_pairs += report.unknown.len() as u64;
        debug!(
            "classified {}: {} entries, {} unknown",
            report.path,
            report.total_seen,
            report.unknown.len()
        );

        Ok(report)
    }

    /// Remove a key from the store; takes effect on sync()
    pub fn unset_key(&mut self, key: &str) -> Result<()> {
        self.store
            .remove_key(key)
            .map_err(|source| CleanerError::Unset {
                key: key.to_string(),
                source,
            })
    }

    /// Flush pending removals. Deletion is final after this point.
    pub fn sync(&mut self) -> Result<()> {
        self.store.sync().map_err(CleanerError::Sync)
    }
}

/// Depth-first pre-order expansion: record each child, then its whole
/// subtree, before moving to the next sibling. Sibling order is
/// whatever the store returns.
fn discover<S: ConfigStore>(
    store: &S,
    options: &ScanOptions,
    path: &str,
    out: &mut Vec<String>,
) -> Result<()> {
    let subdirs = store
        .list_subdirs(path)
        .map_err(|source| CleanerError::Discovery {
            path: path.to_string(),
            source,
        })?;

    for child in subdirs {
        if options.is_excluded(&child) {
            debug!("excluded {} and its subtree", child);
            continue;
        }
        out.push(child.clone());
        discover(store, options, &child, out)?;
    }
    Ok(())
}
