//! State shared by every task of one multi-threaded walk

use crate::error::WalkError;
use crate::ignore::IgnoreMatcher;
use crate::walker::entry::{ensure_dir, list_children, EntryKind};
use crate::walker::sync::{TaskGuard, WaitGroup};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Action invoked with the full path of a visited entry
pub type Action = Arc<dyn Fn(&Path) + Send + Sync>;

/// Everything a task needs, shared through an `Arc`
pub(crate) struct WalkState {
    pub(crate) ignore: Arc<IgnoreMatcher>,
    file_action: Action,
    dir_action: Action,
    pub(crate) depth: Option<usize>,
    pub(crate) tasks: WaitGroup,
    cancelled: AtomicBool,
    interrupt: Arc<AtomicBool>,
    first_error: Mutex<Option<WalkError>>,
}

impl WalkState {
    pub(crate) fn new(
        ignore: Arc<IgnoreMatcher>,
        interrupt: Arc<AtomicBool>,
        file_action: Action,
        dir_action: Action,
        depth: Option<usize>,
    ) -> Self {
        Self {
            ignore,
            file_action,
            dir_action,
            depth,
            tasks: WaitGroup::new(),
            cancelled: AtomicBool::new(false),
            interrupt,
            first_error: Mutex::new(None),
        }
    }

    /// Record `err` if it is the first one and cancel the walk
    pub(crate) fn fail(&self, err: WalkError) {
        let mut slot = self.first_error.lock();
        if slot.is_none() {
            warn!(error = %err, "Cancelling walk");
            *slot = Some(err);
        } else {
            debug!(error = %err, "Dropping error raised after cancellation");
        }
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once the walk is cancelled or the interrupt flag is raised
    pub(crate) fn should_stop(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        if self.interrupt.load(Ordering::SeqCst) {
            self.fail(WalkError::Interrupted);
            return true;
        }
        false
    }

    /// Take the walk's outcome once all tasks are done
    pub(crate) fn take_result(&self) -> Result<(), WalkError> {
        match self.first_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Run one task's unit of work for `dir` and release its counter slot
    ///
    /// Errors and panics are recorded instead of returned, since nobody joins
    /// the task.
    pub(crate) fn run_task(&self, dir: &Path, level: usize, descend: impl FnMut(PathBuf)) {
        let _guard = TaskGuard::new(&self.tasks);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.visit_dir(dir, level, descend)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.fail(err),
            Err(payload) => self.fail(WalkError::TaskPanicked {
                path: dir.to_path_buf(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// List `dir`, apply the actions and hand subdirectories to `descend`
    ///
    /// Pruned when `level` exceeds the depth bound, before `dir` is listed.
    fn visit_dir(
        &self,
        dir: &Path,
        level: usize,
        mut descend: impl FnMut(PathBuf),
    ) -> Result<(), WalkError> {
        if let Some(max) = self.depth {
            if level > max {
                return Ok(());
            }
        }
        if self.should_stop() {
            return Ok(());
        }

        ensure_dir(dir)?;
        let children = list_children(dir, &self.ignore)?;
        debug!(dir = %dir.display(), level, entries = children.len(), "Listed directory");

        for child in children {
            if self.should_stop() {
                break;
            }
            match child.kind {
                EntryKind::Directory => {
                    (self.dir_action)(&child.path);
                    descend(child.path);
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

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
