//! Single-threaded walker
//!
//! Same filtering, entry handling and errors as the concurrent walker, run on
//! the calling thread with plain recursion.
//!
//! The depth cutoff differs: a level stops as soon as `level == depth`, before
//! the directory is even checked or listed. With `start_level = 0` a depth of
//! `d` therefore visits what the concurrent walker visits with `d - 1`, and a
//! start level above the bound never reaches the cutoff.

use crate::error::WalkError;
use crate::ignore::IgnoreMatcher;
use crate::walker::entry::{ensure_dir, list_children, EntryKind};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

pub(crate) struct LinearWalk<'a, F, D> {
    ignore: &'a IgnoreMatcher,
    interrupt: &'a AtomicBool,
    file_action: F,
    dir_action: D,
    depth: Option<usize>,
}

impl<'a, F, D> LinearWalk<'a, F, D>
where
    F: FnMut(&Path),
    D: FnMut(&Path),
{
    pub(crate) fn new(
        ignore: &'a IgnoreMatcher,
        interrupt: &'a AtomicBool,
        file_action: F,
        dir_action: D,
        depth: Option<usize>,
    ) -> Self {
        Self {
            ignore,
            interrupt,
            file_action,
            dir_action,
            depth,
        }
    }

    pub(crate) fn visit(&mut self, dir: &Path, level: usize) -> Result<(), WalkError> {
        if self.depth == Some(level) {
            return Ok(());
        }
        if self.interrupt.load(Ordering::SeqCst) {
            return Err(WalkError::Interrupted);
        }

        ensure_dir(dir)?;
        let children = list_children(dir, self.ignore)?;
        debug!(dir = %dir.display(), level, entries = children.len(), "Listed directory");

        for child in children {
            if self.interrupt.load(Ordering::SeqCst) {
                return Err(WalkError::Interrupted);
            }
            match child.kind {
                EntryKind::Directory => {
                    (self.dir_action)(&child.path);
                    self.visit(&child.path, level + 1)?;
                }
                EntryKind::File => (self.file_action)(&child.path),
                EntryKind::Other => {
                    return Err(WalkError::UnsupportedEntryKind { path: child.path });
                }
            }
        }

        Ok(())
    }
}
