//! Progress reporting for the directory walker
//!
//! Provides live counters fed by the walk actions, a spinner using indicatif
//! and the header/summary printed around a walk.

use crate::config::Strategy;
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters updated concurrently from the walk actions
#[derive(Debug, Default)]
pub struct WalkCounters {
    dirs: AtomicU64,
    files: AtomicU64,
    bytes: AtomicU64,
}

impl WalkCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file(&self, size: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size, Ordering::Relaxed);
    }

    /// Snapshot the counters
    pub fn snapshot(&self, elapsed: Duration) -> WalkStats {
        WalkStats {
            dirs: self.dirs.load(Ordering::Relaxed),
            files: self.files.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Point-in-time walk statistics
#[derive(Debug, Clone, Default)]
pub struct WalkStats {
    pub dirs: u64,
    pub files: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl WalkStats {
    pub fn entries_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.files + self.dirs) as f64 / secs
        } else {
            0.0
        }
    }
}

/// Progress reporter that displays walk status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, stats: &WalkStats) {
        let msg = format!(
            "Dirs: {} | Files: {} | Size: {} | Rate: {:.0}/s",
            format_number(stats.dirs),
            format_number(stats.files),
            format_size(stats.bytes, BINARY),
            stats.entries_per_second(),
        );

        self.bar.set_message(msg);
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

fn strategy_name(strategy: Strategy) -> String {
    match strategy {
        Strategy::Concurrent => "concurrent (task per directory)".to_string(),
        Strategy::Linear => "linear".to_string(),
        Strategy::Pooled { workers } => format!("pooled ({} workers)", workers),
    }
}

/// Print a header at the start of the walk
pub fn print_header(root: &str, strategy: Strategy, depth: Option<usize>) {
    eprintln!();
    eprintln!(
        "{} {}",
        style("dir-walker").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Root:").bold(), root);
    eprintln!("  {} {}", style("Strategy:").bold(), strategy_name(strategy));
    match depth {
        Some(d) => eprintln!("  {} {}", style("Depth:").bold(), d),
        None => eprintln!("  {} unlimited", style("Depth:").bold()),
    }
    eprintln!();
}

/// Print a summary of the walk results
pub fn print_summary(stats: &WalkStats, completed: bool) {
    let title = if completed {
        style("Walk Complete").green().bold()
    } else {
        style("Walk Failed").red().bold()
    };

    eprintln!();
    eprintln!("{}", title);
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Directories:").bold(), format_number(stats.dirs));
    eprintln!("  {} {}", style("Files:").bold(), format_number(stats.files));
    eprintln!(
        "  {} {}",
        style("Total Size:").bold(),
        format_size(stats.bytes, BINARY)
    );
    eprintln!(
        "  {} {:.1}s ({:.0} entries/sec)",
        style("Duration:").bold(),
        stats.elapsed.as_secs_f64(),
        stats.entries_per_second()
    );
    eprintln!();
}
