//! Progress reporting for the cleanup run
//!
//! Provides real-time progress display using indicatif progress bars.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for the two phases of a run
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Spinner for the discovery phase (total unknown up front)
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Bar for the classification phase, one tick per directory
    pub fn bar(total: u64) -> Self {
        let bar = ProgressBar::new(total);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress template")
                .progress_chars("=> "),
        );

        Self { bar }
    }

    /// Advance by one directory and show its path
    pub fn tick_dir(&self, dir: &str) {
        self.bar.set_message(dir.to_string());
        self.bar.inc(1);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header at the start of the run
pub fn print_header(store: &str, root: &str, delete: bool) {
    println!();
    println!(
        "{} {}",
        style("conf-cleaner").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Store:").bold(), store);
    println!("  {} {}", style("Root:").bold(), root);
    println!(
        "  {} {}",
        style("Mode:").bold(),
        if delete { "clean up" } else { "report only" }
    );
    println!();
}

/// Print a summary of the scan results
pub fn print_summary(dirs: u64, pairs: u64, unknown: u64, duration: Duration, interrupted: bool) {
    println!();
    if interrupted {
        println!("{}", style("Scan Interrupted").yellow().bold());
    } else {
        println!("{}", style("Scan Complete").green().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(dirs)
    );
    println!("  {} {}", style("Total keys:").bold(), format_number(pairs));
    println!(
        "  {} {}",
        style("Cleanable keys:").bold(),
        format_number(unknown)
    );
    println!(
        "  {} {:.1}s",
        style("Duration:").bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Print the final cleanup result
pub fn print_cleaned(cleaned: u64, total: u64) {
    println!();
    println!(
        "{} {} of {} keys cleaned up",
        style("Done:").green().bold(),
        format_number(cleaned),
        format_number(total)
    );
    println!();
}
