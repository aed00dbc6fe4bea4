//! conf-cleaner - Configuration Store Cleanup Tool
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use conf_cleaner::cleaner::{CleanerSession, UnknownPair};
use conf_cleaner::config::{CleanConfig, CliArgs};
use conf_cleaner::export;
use conf_cleaner::progress::{print_cleaned, print_header, print_summary, ProgressReporter};
use conf_cleaner::store::{ConfigStore, FileStore};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = CleanConfig::from_args(args).context("Invalid configuration")?;

    // Open the store
    let store = FileStore::open(&config.store_dir)
        .with_context(|| format!("Failed to open store at '{}'", config.store_dir.display()))?;
    let mut session = CleanerSession::with_options(store, config.scan_options());

    // Print header
    if config.show_progress {
        print_header(
            &config.store_dir.display().to_string(),
            &config.root,
            config.delete,
        );
    }

    // Setup signal handler for graceful shutdown between directories
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || {
            eprintln!("\nInterrupt received, stopping after the current directory...");
            flag.store(true, Ordering::SeqCst);
        })
        .context("Failed to set signal handler")?;
    }

    let start = Instant::now();

    // Phase 1: directory discovery. One atomic call; a store failure
    // anywhere aborts the whole run.
    let spinner = config.show_progress.then(ProgressReporter::spinner);
    if let Some(ref p) = spinner {
        p.set_status("Retrieving the configuration directories...");
    }
    session
        .update()
        .context("Failed during the initialization")?;
    if let Some(ref p) = spinner {
        p.finish_and_clear();
    }
    info!("found {} directories", session.dir_count());

    // Phase 2: classify one directory per iteration; the loop boundary
    // is the cancellation point.
    let bar = config
        .show_progress
        .then(|| ProgressReporter::bar(session.dir_count()));
    let mut pairs: Vec<UnknownPair> = Vec::new();
    let mut was_interrupted = false;

    while session.has_next_dir() {
        if interrupted.load(Ordering::SeqCst) {
            was_interrupted = true;
            break;
        }
        if let Some(ref b) = bar {
            b.tick_dir(session.current_dir().context("Cursor out of sync")?);
        }
        let report = session
            .classify_next_dir()
            .context("Failed during analyzing the configuration keys")?;
        pairs.extend(report.unknown);
    }
    if let Some(ref b) = bar {
        b.finish_and_clear();
    }

    // Print summary
    if config.show_progress {
        print_summary(
            session.dir_count(),
            session.entry_count(),
            session.unknown_entry_count(),
            start.elapsed(),
            was_interrupted,
        );
    }

    list_orphans(&config, &pairs);

    // Export the dump file when requested
    if let Some(ref path) = config.output_path {
        export::write_dump(path, &config.root, &pairs)
            .with_context(|| format!("Failed to save the dump to '{}'", path.display()))?;
        if config.show_progress {
            println!("Saved {} keys to {}", pairs.len(), path.display());
        }
    }

    if was_interrupted {
        info!("Scan was interrupted before completion; nothing deleted");
        return Ok(());
    }

    // Deletion phase
    if config.delete && !pairs.is_empty() {
        clean_up(&config, &mut session, &pairs, &interrupted)?;
    }

    Ok(())
}

/// Print the orphaned keys: pretty in interactive mode, bare key paths
/// in quiet mode so the output stays scriptable
fn list_orphans(config: &CleanConfig, pairs: &[UnknownPair]) {
    if config.show_progress {
        for pair in pairs {
            println!("  {} = {}", pair.key, pair.value);
        }
        if !pairs.is_empty() {
            println!();
        }
    } else {
        for pair in pairs {
            println!("{}", pair.key);
        }
    }
}

/// Remove the orphaned keys and sync the store
fn clean_up<S: ConfigStore>(
    config: &CleanConfig,
    session: &mut CleanerSession<S>,
    pairs: &[UnknownPair],
    interrupted: &AtomicBool,
) -> Result<()> {
    if !config.assume_yes && !confirm_deletion(pairs.len())? {
        println!("Cancelled; nothing was deleted.");
        return Ok(());
    }

    // Keep a copy of what is about to disappear; deletion is final
    // once synced.
    if config.backup && config.output_path.is_none() {
        let path = PathBuf::from(export::default_dump_name());
        export::write_dump(&path, &config.root, pairs)
            .with_context(|| format!("Failed to save the backup to '{}'", path.display()))?;
        println!("Backup saved to {}", path.display());
    }

    let total = pairs.len() as u64;
    let bar = config.show_progress.then(|| ProgressReporter::bar(total));
    let mut cleaned = 0u64;

    for pair in pairs {
        if interrupted.load(Ordering::SeqCst) {
            warn!("interrupted; {} of {} keys removed so far", cleaned, total);
            break;
        }
        if let Some(ref b) = bar {
            b.tick_dir(&pair.key);
        }
        session
            .unset_key(&pair.key)
            .context("Failed during cleaning the configuration keys up")?;
        cleaned += 1;
    }
    if let Some(ref b) = bar {
        b.finish_and_clear();
    }

    session
        .sync()
        .context("Failed to sync the configuration store")?;

    if config.show_progress {
        print_cleaned(cleaned, total);
    }
    Ok(())
}

fn confirm_deletion(count: usize) -> Result<bool> {
    print!("Remove {count} keys from the store? [y/N] ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read confirmation")?;

    let answer = input.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("conf_cleaner=debug,warn")
    } else {
        EnvFilter::new("conf_cleaner=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
