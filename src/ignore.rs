//! Ignore-file compilation
//!
//! An ignore file holds one exclusion pattern per line. Reading stops at the
//! first empty line, so a blank line in the middle of the file drops every
//! line after it.
//!
//! Each retained line becomes one alternative of a single regular expression:
//! - a line that is exactly `.` or `..` is anchored (`^\.$`, `^\.\.$`)
//! - every `.` is escaped so it matches a literal dot
//! - every other character is passed through as regex syntax
//!
//! All other lines match anywhere inside the full path string.

use crate::error::IgnoreError;
use regex::Regex;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Compiled path-exclusion matcher
///
/// The empty matcher matches nothing. Cloning is cheap enough to hand one
/// copy to every walk; the walkers share it read-only behind an `Arc`.
#[derive(Clone, Default)]
pub struct IgnoreMatcher {
    regex: Option<Regex>,
}

impl IgnoreMatcher {
    /// A matcher that excludes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile the ignore file at `path`
    ///
    /// An empty `path` or a file that does not exist yields the empty
    /// matcher. Any other read failure is an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IgnoreError> {
        Self::from_file_with(path, std::iter::empty::<&str>())
    }

    /// Compile the ignore file at `path` plus `extra` lines appended after
    /// the file's retained lines
    pub fn from_file_with<'a, I>(path: impl AsRef<Path>, extra: I) -> Result<Self, IgnoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let contents = read_ignore_file(path.as_ref())?;
        let mut lines: Vec<&str> = retained_lines(&contents).collect();
        for line in extra {
            if !line.is_empty() {
                lines.push(line);
            }
        }
        Self::compile(lines.into_iter())
    }

    /// Compile in-memory ignore-file contents
    pub fn from_lines(contents: &str) -> Result<Self, IgnoreError> {
        Self::compile(retained_lines(contents))
    }

    fn compile<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Self, IgnoreError> {
        let pattern = lines.map(line_to_pattern).collect::<Vec<_>>().join("|");

        if pattern.is_empty() {
            return Ok(Self::empty());
        }

        let regex = Regex::new(&pattern).map_err(|source| IgnoreError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        debug!(pattern = %pattern, "Compiled ignore matcher");
        Ok(Self { regex: Some(regex) })
    }

    /// Check if `path` is excluded
    pub fn is_match(&self, path: &Path) -> bool {
        match &self.regex {
            Some(re) => re.is_match(&path.to_string_lossy()),
            None => false,
        }
    }

    /// Check if a path string is excluded
    pub fn is_match_str(&self, path: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(path))
    }

    /// True if this matcher excludes nothing
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// The compiled pattern source, if any
    pub fn as_str(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }
}

impl fmt::Debug for IgnoreMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreMatcher")
            .field("pattern", &self.as_str())
            .finish()
    }
}

fn read_ignore_file(path: &Path) -> Result<String, IgnoreError> {
    if path.as_os_str().is_empty() {
        return Ok(String::new());
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Ignore file not found, using empty matcher");
            Ok(String::new())
        }
        Err(source) => Err(IgnoreError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Lines up to (not including) the first empty one
fn retained_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents.split('\n').take_while(|line| !line.is_empty())
}

fn line_to_pattern(line: &str) -> String {
    let escaped = line.replace('.', r"\.");
    if line == "." || line == ".." {
        format!("^{}$", escaped)
    } else {
        escaped
    }
}
