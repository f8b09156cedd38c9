//! Configuration types for dir-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use crate::ignore::IgnoreMatcher;
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count for the pooled strategy
const MAX_WORKERS: usize = 512;

/// Depth value meaning "no limit" on the command line
const UNLIMITED_DEPTH: i64 = -1;

/// Default ignore file; a missing file is not an error
const DEFAULT_IGNORE_FILE: &str = ".walkignore";

/// Recursive directory walker with ignore-file filtering
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dir-walker",
    version,
    about = "Recursive directory walker with ignore-file filtering",
    long_about = "Walks a directory tree and prints every file and directory found.\n\n\
                  By default one task is spawned per directory. Paths matching a line of the \
                  ignore file are skipped; a blank line ends the ignore file.",
    after_help = "EXAMPLES:\n    \
        dir-walker src\n    \
        dir-walker . -d 2 --dirs-only\n    \
        dir-walker . -i .gitignore --exclude target\n    \
        dir-walker /data --pool -w 8 -p\n    \
        dir-walker . --linear -d 3"
)]
pub struct CliArgs {
    /// Directory to walk
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Maximum depth (-1 for unlimited)
    #[arg(
        short = 'd',
        long,
        default_value_t = UNLIMITED_DEPTH,
        allow_negative_numbers = true,
        value_name = "NUM"
    )]
    pub depth: i64,

    /// Ignore file, one pattern per line
    #[arg(short = 'i', long, default_value = DEFAULT_IGNORE_FILE, value_name = "FILE")]
    pub ignore: PathBuf,

    /// Extra ignore pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Walk on the current thread instead of spawning tasks
    #[arg(long, conflicts_with = "pool")]
    pub linear: bool,

    /// Walk on a fixed pool of worker threads
    #[arg(long)]
    pub pool: bool,

    /// Number of worker threads for --pool
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Show a progress spinner instead of printing paths
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Quiet mode - suppress the summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Only print directories
    #[arg(long, conflicts_with = "files_only")]
    pub dirs_only: bool,

    /// Only print files
    #[arg(long)]
    pub files_only: bool,
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Walk strategy selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One task per directory
    Concurrent,
    /// Calling thread only, starting at level 0
    Linear,
    /// Fixed worker pool
    Pooled { workers: usize },
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Directory to walk
    pub root: PathBuf,

    /// Depth bound (None = unlimited)
    pub depth: Option<usize>,

    /// Compiled ignore file plus extra patterns
    pub ignore: IgnoreMatcher,

    /// Walk strategy
    pub strategy: Strategy,

    /// Show progress spinner
    pub show_progress: bool,

    /// Print the summary at the end
    pub show_summary: bool,

    /// Verbose logging
    pub verbose: bool,

    /// Print file paths
    pub print_files: bool,

    /// Print directory paths
    pub print_dirs: bool,
}

impl WalkConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let depth = parse_depth(args.depth)?;

        let strategy = if args.linear {
            Strategy::Linear
        } else if args.pool {
            if args.workers == 0 || args.workers > MAX_WORKERS {
                return Err(ConfigError::InvalidWorkerCount {
                    count: args.workers,
                    max: MAX_WORKERS,
                });
            }
            Strategy::Pooled {
                workers: args.workers,
            }
        } else {
            Strategy::Concurrent
        };

        let ignore = IgnoreMatcher::from_file_with(
            &args.ignore,
            args.exclude_patterns.iter().map(String::as_str),
        )?;

        Ok(Self {
            root: args.root,
            depth,
            ignore,
            strategy,
            show_progress: args.progress,
            show_summary: !args.quiet,
            verbose: args.verbose,
            print_files: !args.progress && !args.dirs_only,
            print_dirs: !args.progress && !args.files_only,
        })
    }
}

/// Convert the signed command-line depth into a bound
pub fn parse_depth(depth: i64) -> Result<Option<usize>, ConfigError> {
    match depth {
        UNLIMITED_DEPTH => Ok(None),
        d if d >= 0 => usize::try_from(d)
            .map(Some)
            .map_err(|_| ConfigError::InvalidDepth { depth }),
        _ => Err(ConfigError::InvalidDepth { depth }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("dir-walker").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_depth() {
        assert_eq!(parse_depth(-1).unwrap(), None);
        assert_eq!(parse_depth(0).unwrap(), Some(0));
        assert_eq!(parse_depth(7).unwrap(), Some(7));
        assert!(matches!(
            parse_depth(-2),
            Err(ConfigError::InvalidDepth { depth: -2 })
        ));
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.depth, -1);
        assert_eq!(args.ignore, PathBuf::from(".walkignore"));
        assert!(!args.linear);
        assert!(!args.pool);
    }

    #[test]
    fn test_negative_depth_flag() {
        let args = parse(&["src", "-d", "-1"]);
        assert_eq!(args.depth, -1);
        assert_eq!(args.root, PathBuf::from("src"));
    }

    #[test]
    fn test_linear_conflicts_with_pool() {
        let result = CliArgs::try_parse_from(["dir-walker", "--linear", "--pool"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_args_strategy() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none");
        let ignore = missing.to_str().unwrap();

        let config = WalkConfig::from_args(parse(&["-i", ignore])).unwrap();
        assert_eq!(config.strategy, Strategy::Concurrent);
        assert!(config.ignore.is_empty());

        let config = WalkConfig::from_args(parse(&["-i", ignore, "--linear"])).unwrap();
        assert_eq!(config.strategy, Strategy::Linear);

        let config = WalkConfig::from_args(parse(&["-i", ignore, "--pool", "-w", "3"])).unwrap();
        assert_eq!(config.strategy, Strategy::Pooled { workers: 3 });
    }

    #[test]
    fn test_from_args_invalid_workers() {
        let err = WalkConfig::from_args(parse(&["--pool", "-w", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { count: 0, .. }));
    }

    #[test]
    fn test_from_args_invalid_depth() {
        let err = WalkConfig::from_args(parse(&["-d", "-3"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDepth { depth: -3 }));
    }

    #[test]
    fn test_from_args_ignore_and_excludes() {
        let dir = tempdir().unwrap();
        let ignore_path = dir.path().join(".walkignore");
        std::fs::write(&ignore_path, "node_modules\n").unwrap();

        let config = WalkConfig::from_args(parse(&[
            "-i",
            ignore_path.to_str().unwrap(),
            "--exclude",
            "target",
        ]))
        .unwrap();
        assert!(config.ignore.is_match_str("./web/node_modules/x"));
        assert!(config.ignore.is_match_str("./target/debug"));
        assert!(!config.ignore.is_match_str("./src/main.rs"));
    }

    #[test]
    fn test_print_filters() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none");
        let ignore = missing.to_str().unwrap();

        let config = WalkConfig::from_args(parse(&["-i", ignore, "--dirs-only"])).unwrap();
        assert!(config.print_dirs);
        assert!(!config.print_files);

        let config = WalkConfig::from_args(parse(&["-i", ignore, "-p"])).unwrap();
        assert!(!config.print_dirs);
        assert!(!config.print_files);
        assert!(config.show_progress);
    }
}
