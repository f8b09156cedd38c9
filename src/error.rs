//! Error types for dir-walker
//!
//! This module defines the error hierarchy for:
//! - Ignore-file compilation
//! - Directory traversal (all walk strategies)
//! - Configuration and CLI validation
//!
//! Every traversal error is terminal for the walk that produced it: the first
//! one recorded cancels the remaining tasks and is the single error returned
//! to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the dir-walker application
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Ignore-file errors
    #[error("Ignore error: {0}")]
    Ignore(#[from] IgnoreError),

    /// Traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while compiling an ignore file
#[derive(Error, Debug)]
pub enum IgnoreError {
    /// The ignore file exists but could not be read
    #[error("Failed to read ignore file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An ignore line is not valid pattern syntax
    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors that terminate a walk
#[derive(Error, Debug)]
pub enum WalkError {
    /// A walked path is not a directory
    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// Stat of a walked path failed
    #[error("Failed to stat '{path}': {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing a directory failed
    #[error("Failed to read directory '{path}': {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry is neither a regular file nor a directory
    #[error("Unsupported entry kind (not a file or directory): '{path}'")]
    UnsupportedEntryKind { path: PathBuf },

    /// The OS refused to start a traversal thread
    #[error("Failed to spawn walk task for '{path}': {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An action callback panicked inside a traversal task
    #[error("Walk task for '{path}' panicked: {message}")]
    TaskPanicked { path: PathBuf, message: String },

    /// Interrupted through the walker's interrupt flag
    #[error("Walk interrupted")]
    Interrupted,
}

impl WalkError {
    /// The path the error was raised for, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            WalkError::NotADirectory { path }
            | WalkError::Metadata { path, .. }
            | WalkError::ListDirectory { path, .. }
            | WalkError::UnsupportedEntryKind { path }
            | WalkError::Spawn { path, .. }
            | WalkError::TaskPanicked { path, .. } => Some(path),
            WalkError::Interrupted => None,
        }
    }

    /// Check if this error came from the interrupt flag rather than the filesystem
    pub fn is_interrupt(&self) -> bool {
        matches!(self, WalkError::Interrupted)
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Depth must be -1 (unlimited) or non-negative
    #[error("Invalid depth {depth}: must be -1 (unlimited) or >= 0")]
    InvalidDepth { depth: i64 },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid ignore file or exclude pattern
    #[error("Invalid ignore configuration: {0}")]
    Ignore(#[from] IgnoreError),
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for WalkError
pub type WalkResult<T> = std::result::Result<T, WalkError>;
