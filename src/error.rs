//! Error types for conf-cleaner
//!
//! This module defines the error hierarchy covering:
//! - Configuration store errors (listing, removal, sync)
//! - Session precondition violations (cursor misuse)
//! - Configuration and CLI errors
//! - Dump export errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Store failures always carry the offending path plus the
//!   backend's message, so the caller can present them verbatim
//! - No retry logic lives here; retry decisions belong to the caller

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the conf-cleaner application
#[derive(Error, Debug)]
pub enum CleanerError {
    /// Directory discovery failed; the whole traversal is aborted and
    /// no partial directory list is retained
    #[error("failed to get the directories in '{path}': {source}")]
    Discovery { path: String, source: StoreError },

    /// Entry enumeration failed for a single directory; the cursor has
    /// already moved past it
    #[error("failed to get the entries in '{path}': {source}")]
    Classify { path: String, source: StoreError },

    /// Key removal failed
    #[error("failed to unset key '{key}': {source}")]
    Unset { key: String, source: StoreError },

    /// Store sync failed
    #[error("failed to sync the configuration store: {0}")]
    Sync(#[source] StoreError),

    /// Session used before a successful update()
    #[error("session is not initialized; call update() first")]
    NotInitialized,

    /// Classification requested past the end of the directory list
    #[error("no directories left to classify")]
    CursorExhausted,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dump export errors
    #[error("failed to write dump file '{path}': {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Interrupted by signal
    #[error("operation interrupted by signal")]
    Interrupted,
}

/// Errors reported by a configuration store backend
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Path does not exist in the store
    #[error("path not found: '{path}'")]
    NotFound { path: String },

    /// Key does not exist in the store
    #[error("key not found: '{key}'")]
    KeyNotFound { key: String },

    /// Failed to read from the backing medium
    #[error("failed to read '{path}': {reason}")]
    ReadFailed { path: String, reason: String },

    /// Failed to write to the backing medium
    #[error("failed to write '{path}': {reason}")]
    WriteFailed { path: String, reason: String },

    /// Stored entry data could not be decoded
    #[error("corrupt entry data at '{path}': {reason}")]
    Corrupt { path: String, reason: String },

    /// Generic backend failure with a human-readable message
    #[error("{0}")]
    Backend(String),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Store location missing or not a directory
    #[error("invalid store directory '{path}': {reason}")]
    InvalidStoreDir { path: PathBuf, reason: String },

    /// Namespace root must be an absolute slash path
    #[error("invalid root path '{path}': {reason}")]
    InvalidRoot { path: String, reason: String },

    /// Invalid exclude pattern
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },

    /// Output path error
    #[error("invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

/// Result type alias for CleanerError
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Result type alias for StoreError
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_error_carries_path() {
        let err = CleanerError::Discovery {
            path: "/apps/foo".into(),
            source: StoreError::Backend("connection reset".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("/apps/foo"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_config_error_conversion() {
        let cfg_err = ConfigError::InvalidRoot {
            path: "apps".into(),
            reason: "must start with '/'".into(),
        };
        let err: CleanerError = cfg_err.into();
        assert!(matches!(err, CleanerError::Config(_)));
    }
}
