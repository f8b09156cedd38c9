//! Directory walkers
//!
//! [`Walker`] owns the compiled ignore matcher and the interrupt flag and
//! offers three strategies behind the same action-pair contract:
//!
//! | Strategy | Threads | Depth cutoff |
//! |----------|---------|--------------|
//! | [`Walker::walk`] | one per directory, unbounded | `level > depth` |
//! | [`Walker::walk_pooled`] | fixed pool, work stealing | `level > depth` |
//! | [`Walker::walk_linear`] | calling thread | `level == depth` |
//!
//! Reconfiguring the ignore matcher needs `&mut Walker`, so it cannot change
//! while a walk borrows the walker.

mod concurrent;
pub(crate) mod entry;
mod linear;
mod pool;
mod state;
pub mod sync;

pub use entry::EntryKind;
pub use state::Action;
pub use sync::{TaskGuard, WaitGroup};

use crate::error::{IgnoreError, WalkError};
use crate::ignore::IgnoreMatcher;
use linear::LinearWalk;
use state::WalkState;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Caller-owned walk context
#[derive(Debug, Clone, Default)]
pub struct Walker {
    ignore: Arc<IgnoreMatcher>,
    interrupt: Arc<AtomicBool>,
}

impl Walker {
    /// Create a walker that ignores nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a walker with an already compiled matcher
    pub fn with_ignore(ignore: IgnoreMatcher) -> Self {
        Self {
            ignore: Arc::new(ignore),
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Compile the ignore file at `path` and replace the current matcher
    ///
    /// An empty `path` leaves the current matcher untouched. A missing file
    /// installs the empty matcher.
    pub fn configure_ignore(&mut self, path: impl AsRef<Path>) -> Result<(), IgnoreError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(());
        }

        let matcher = IgnoreMatcher::from_file(path)?;
        info!(path = %path.display(), pattern = ?matcher.as_str(), "Configured ignore matcher");
        self.ignore = Arc::new(matcher);
        Ok(())
    }

    /// Replace the current matcher
    pub fn set_ignore(&mut self, ignore: IgnoreMatcher) {
        self.ignore = Arc::new(ignore);
    }

    /// The current matcher
    pub fn ignore(&self) -> &IgnoreMatcher {
        &self.ignore
    }

    /// Get a clone of the interrupt flag (for signal handlers)
    ///
    /// The flag stays raised once set: every later walk on this walker ends
    /// with [`WalkError::Interrupted`] until [`Walker::reset_interrupt`] is
    /// called.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Lower the interrupt flag so the walker can be used again
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::SeqCst);
    }

    /// Walk `root` with one thread per directory
    ///
    /// Blocks until every reachable entry has been handed to its action, or
    /// until the first error cancels the walk. `depth = None` is unlimited;
    /// `Some(d)` never lists a directory deeper than level `d`.
    pub fn walk<F, D>(
        &self,
        root: impl AsRef<Path>,
        file_action: F,
        dir_action: D,
        depth: Option<usize>,
    ) -> Result<(), WalkError>
    where
        F: Fn(&Path) + Send + Sync + 'static,
        D: Fn(&Path) + Send + Sync + 'static,
    {
        let state = self.state(Arc::new(file_action), Arc::new(dir_action), depth);
        concurrent::walk(state, root.as_ref().to_path_buf())
    }

    /// Walk `root` on a fixed pool of `workers` threads
    ///
    /// Same contract and depth rule as [`Walker::walk`].
    pub fn walk_pooled<F, D>(
        &self,
        root: impl AsRef<Path>,
        file_action: F,
        dir_action: D,
        depth: Option<usize>,
        workers: usize,
    ) -> Result<(), WalkError>
    where
        F: Fn(&Path) + Send + Sync + 'static,
        D: Fn(&Path) + Send + Sync + 'static,
    {
        let state = self.state(Arc::new(file_action), Arc::new(dir_action), depth);
        pool::walk_pooled(state, root.as_ref().to_path_buf(), workers)
    }

    /// Walk `root` on the calling thread, starting at `start_level`
    ///
    /// Stops descending when the level equals `depth`; see the module docs of
    /// the linear walker for how this differs from [`Walker::walk`].
    pub fn walk_linear<F, D>(
        &self,
        root: impl AsRef<Path>,
        file_action: F,
        dir_action: D,
        depth: Option<usize>,
        start_level: usize,
    ) -> Result<(), WalkError>
    where
        F: FnMut(&Path),
        D: FnMut(&Path),
    {
        let root = root.as_ref();
        info!(root = %root.display(), depth = ?depth, start_level, "Starting linear walk");
        LinearWalk::new(&self.ignore, &self.interrupt, file_action, dir_action, depth)
            .visit(root, start_level)
    }

    fn state(&self, file_action: Action, dir_action: Action, depth: Option<usize>) -> Arc<WalkState> {
        Arc::new(WalkState::new(
            Arc::clone(&self.ignore),
            Arc::clone(&self.interrupt),
            file_action,
            dir_action,
            depth,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_configure_ignore_empty_path_keeps_matcher() {
        let mut walker = Walker::with_ignore(IgnoreMatcher::from_lines("target").unwrap());
        walker.configure_ignore("").unwrap();
        assert_eq!(walker.ignore().as_str(), Some("target"));

        let mut fresh = Walker::new();
        fresh.configure_ignore("").unwrap();
        assert!(fresh.ignore().is_empty());
    }

    #[test]
    fn test_configure_ignore_replaces() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::write(&first, "alpha\n").unwrap();
        std::fs::write(&second, "beta\n").unwrap();

        let mut walker = Walker::new();
        walker.configure_ignore(&first).unwrap();
        walker.configure_ignore(&second).unwrap();

        assert!(!walker.ignore().is_match_str("./alpha"));
        assert!(walker.ignore().is_match_str("./beta"));
    }

    #[test]
    fn test_configure_ignore_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join(".walkignore");

        let mut walker = Walker::with_ignore(IgnoreMatcher::from_lines("x").unwrap());
        walker.configure_ignore(&missing).unwrap();
        assert!(walker.ignore().is_empty());
        assert!(!missing.exists());
    }

    #[test]
    fn test_interrupt_flag_is_shared() {
        let walker = Walker::new();
        let flag = walker.interrupt_flag();
        flag.store(true, std::sync::atomic::Ordering::SeqCst);

        let dir = tempdir().unwrap();
        let err = walker.walk(dir.path(), |_| {}, |_| {}, None).unwrap_err();
        assert!(err.is_interrupt());
    }

    #[test]
    fn test_reset_interrupt_makes_walker_usable_again() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), b"x").unwrap();

        let walker = Walker::new();
        walker.interrupt_flag().store(true, std::sync::atomic::Ordering::SeqCst);

        let err = walker
            .walk_linear(dir.path(), |_| {}, |_| {}, None, 0)
            .unwrap_err();
        assert!(err.is_interrupt());
        let err = walker
            .walk_pooled(dir.path(), |_| {}, |_| {}, None, 2)
            .unwrap_err();
        assert!(err.is_interrupt());

        walker.reset_interrupt();
        let mut files = 0;
        walker
            .walk_linear(dir.path(), |_| files += 1, |_| {}, None, 0)
            .unwrap();
        assert_eq!(files, 1);
        walker.walk(dir.path(), |_| {}, |_| {}, None).unwrap();
    }
}
