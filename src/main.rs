//! dir-walker - Recursive Directory Walker
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use dir_walker::config::{CliArgs, Strategy, WalkConfig};
use dir_walker::progress::{print_header, print_summary, ProgressReporter, WalkCounters};
use dir_walker::Walker;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
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
    let config = WalkConfig::from_args(args).context("Invalid configuration")?;

    let walker = Walker::with_ignore(config.ignore.clone());

    // Setup signal handler for graceful shutdown
    let interrupt = walker.interrupt_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        interrupt.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    if config.show_summary {
        print_header(
            &config.root.display().to_string(),
            config.strategy,
            config.depth,
        );
    }

    let counters = Arc::new(WalkCounters::new());
    let start = Instant::now();

    // Spinner thread, stopped once the walk returns
    let done = Arc::new(AtomicBool::new(false));
    let progress_handle = if config.show_progress {
        let counters = Arc::clone(&counters);
        let done = Arc::clone(&done);
        Some(thread::spawn(move || {
            let reporter = ProgressReporter::new();
            while !done.load(Ordering::Relaxed) {
                reporter.update(&counters.snapshot(start.elapsed()));
                thread::sleep(Duration::from_millis(100));
            }
            reporter.update(&counters.snapshot(start.elapsed()));
            reporter.finish("Walk finished");
        }))
    } else {
        None
    };

    let file_action = {
        let counters = Arc::clone(&counters);
        let print = config.print_files;
        move |path: &Path| {
            let size = std::fs::symlink_metadata(path).map(|m| m.len()).unwrap_or(0);
            counters.record_file(size);
            if print {
                print_path(path);
            }
        }
    };

    let dir_action = {
        let counters = Arc::clone(&counters);
        let print = config.print_dirs;
        move |path: &Path| {
            counters.record_dir();
            if print {
                print_path(path);
            }
        }
    };

    let result = match config.strategy {
        Strategy::Concurrent => walker.walk(&config.root, file_action, dir_action, config.depth),
        Strategy::Linear => {
            walker.walk_linear(&config.root, file_action, dir_action, config.depth, 0)
        }
        Strategy::Pooled { workers } => {
            walker.walk_pooled(&config.root, file_action, dir_action, config.depth, workers)
        }
    };

    done.store(true, Ordering::Relaxed);
    if let Some(handle) = progress_handle {
        let _ = handle.join();
    }

    let stats = counters.snapshot(start.elapsed());
    info!(
        dirs = stats.dirs,
        files = stats.files,
        bytes = stats.bytes,
        ok = result.is_ok(),
        "Walk finished"
    );

    if config.show_summary {
        print_summary(&stats, result.is_ok());
    }

    result.with_context(|| format!("Walk of '{}' failed", config.root.display()))
}

fn print_path(path: &Path) {
    // A closed stdout (e.g. piped into `head`) is not a walk error
    let _ = writeln!(std::io::stdout().lock(), "{}", path.display());
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("dir_walker=debug,warn")
    } else {
        EnvFilter::new("dir_walker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
