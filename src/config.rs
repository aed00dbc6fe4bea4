//! Configuration types for conf-cleaner
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::cleaner::ScanOptions;
use crate::error::ConfigError;
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// Configuration store cleanup tool
#[derive(Parser, Debug, Clone)]
#[command(
    name = "conf-cleaner",
    version,
    about = "Clean up orphaned entries in a hierarchical configuration store",
    long_about = "Walks every directory of a configuration store, classifies each entry as\n\
                  schema-backed or orphaned, and reports the orphans. With --delete the\n\
                  orphaned entries are removed after confirmation; a backup dump is\n\
                  written first unless --no-backup is given.",
    after_help = "EXAMPLES:\n    \
        conf-cleaner ~/.config/store\n    \
        conf-cleaner /var/lib/conf --root /apps -o orphans.reg\n    \
        conf-cleaner /var/lib/conf --delete -y --exclude '^/system'"
)]
pub struct CliArgs {
    /// Store root directory on disk
    #[arg(value_name = "STORE_DIR")]
    pub store: PathBuf,

    /// Namespace path to scan from
    #[arg(long, default_value = "/", value_name = "PATH")]
    pub root: String,

    /// Write the orphaned entries to this dump file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Delete the orphaned entries after scanning (report-only otherwise)
    #[arg(long)]
    pub delete: bool,

    /// Assume yes for the deletion confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Skip the automatic backup dump before deletion
    #[arg(long)]
    pub no_backup: bool,

    /// Exclude directories matching pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (show per-directory detail)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Store root directory on disk
    pub store_dir: PathBuf,

    /// Namespace path discovery starts from
    pub root: String,

    /// Dump file for the orphaned entries
    pub output_path: Option<PathBuf>,

    /// Actually delete after scanning
    pub delete: bool,

    /// Skip the confirmation prompt
    pub assume_yes: bool,

    /// Write a backup dump before deleting
    pub backup: bool,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl CleanConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if !args.store.is_dir() {
            return Err(ConfigError::InvalidStoreDir {
                path: args.store.clone(),
                reason: "not an existing directory".to_string(),
            });
        }

        let root = normalize_root(&args.root)?;

        // Compile exclude patterns
        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Validate output path
        if let Some(ref output) = args.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ConfigError::InvalidOutputPath {
                        path: output.clone(),
                        reason: format!("parent directory '{}' does not exist", parent.display()),
                    });
                }
            }
        }

        Ok(Self {
            store_dir: args.store,
            root,
            output_path: args.output,
            delete: args.delete,
            assume_yes: args.yes,
            backup: !args.no_backup,
            exclude_patterns,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }

    /// Scan options handed to the cleaner session
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            root: self.root.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
        }
    }
}

/// Validate a namespace root path and strip any trailing slash
fn normalize_root(root: &str) -> Result<String, ConfigError> {
    if !root.starts_with('/') {
        return Err(ConfigError::InvalidRoot {
            path: root.to_string(),
            reason: "must start with '/'".to_string(),
        });
    }
    if root == "/" {
        return Ok(root.to_string());
    }

    let trimmed = root.trim_end_matches('/');
    if trimmed.split('/').skip(1).any(str::is_empty) {
        return Err(ConfigError::InvalidRoot {
            path: root.to_string(),
            reason: "contains an empty path component".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
