//! Completion counter shared by all tasks of one walk
//!
//! Tasks are registered with [`WaitGroup::add`] before they start and release
//! their slot with [`WaitGroup::done`] when their own unit of work is finished.
//! The caller blocks in [`WaitGroup::wait`] until the count drops to zero.

use parking_lot::{Condvar, Mutex};
use tracing::error;

/// Counter of outstanding traversal tasks
#[derive(Debug, Default)]
pub struct WaitGroup {
    count: Mutex<usize>,
    zero: Condvar,
}

impl WaitGroup {
    /// Create a counter with no outstanding tasks
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `n` more outstanding tasks
    pub fn add(&self, n: usize) {
        let mut count = self.count.lock();
        *count += n;
    }

    /// Mark one outstanding task complete
    ///
    /// Calling this with nothing outstanding is a bookkeeping bug; it is
    /// logged and the count stays at zero.
    pub fn done(&self) {
        let mut count = self.count.lock();
        match count.checked_sub(1) {
            Some(next) => {
                *count = next;
                if next == 0 {
                    self.zero.notify_all();
                }
            }
            None => error!("WaitGroup::done called with no outstanding tasks"),
        }
    }

    /// Block until every registered task has called `done`
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.zero.wait(&mut count);
        }
    }

    /// Number of outstanding tasks
    pub fn pending(&self) -> usize {
        *self.count.lock()
    }
}

/// RAII guard that calls [`WaitGroup::done`] on drop
///
/// Held for the lifetime of one task so its slot is released even if the task
/// unwinds.
pub struct TaskGuard<'a> {
    group: &'a WaitGroup,
}

impl<'a> TaskGuard<'a> {
    /// Take ownership of one slot that was already registered with `add`
    pub fn new(group: &'a WaitGroup) -> Self {
        Self { group }
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.group.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_on_empty_returns() {
        let wg = WaitGroup::new();
        wg.wait();
        assert_eq!(wg.pending(), 0);
    }

    #[test]
    fn test_add_done() {
        let wg = WaitGroup::new();
        wg.add(3);
        assert_eq!(wg.pending(), 3);
        wg.done();
        wg.done();
        assert_eq!(wg.pending(), 1);
        wg.done();
        assert_eq!(wg.pending(), 0);
    }

    #[test]
    fn test_done_never_goes_negative() {
        let wg = WaitGroup::new();
        wg.done();
        assert_eq!(wg.pending(), 0);
        wg.add(1);
        assert_eq!(wg.pending(), 1);
    }

    #[test]
    fn test_wait_blocks_until_all_done() {
        let wg = Arc::new(WaitGroup::new());
        let finished = Arc::new(AtomicUsize::new(0));

        wg.add(16);
        for _ in 0..16 {
            let wg = Arc::clone(&wg);
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(5));
                finished.fetch_add(1, Ordering::SeqCst);
                wg.done();
            });
        }

        wg.wait();
        assert_eq!(finished.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn test_nested_registration() {
        // Tasks register their children before completing themselves
        let wg = Arc::new(WaitGroup::new());
        let finished = Arc::new(AtomicUsize::new(0));

        wg.add(1);
        {
            let wg = Arc::clone(&wg);
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                let _guard = TaskGuard::new(&wg);
                for _ in 0..4 {
                    wg.add(1);
                    let wg = Arc::clone(&wg);
                    let finished = Arc::clone(&finished);
                    thread::spawn(move || {
                        let _guard = TaskGuard::new(&wg);
                        thread::sleep(Duration::from_millis(10));
                        finished.fetch_add(1, Ordering::SeqCst);
                    });
                }
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }

        wg.wait();
        assert_eq!(finished.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_guard_releases_on_panic() {
        let wg = Arc::new(WaitGroup::new());
        wg.add(1);

        let handle = {
            let wg = Arc::clone(&wg);
            thread::spawn(move || {
                let _guard = TaskGuard::new(&wg);
                panic!("task failed");
            })
        };

        assert!(handle.join().is_err());
        wg.wait();
        assert_eq!(wg.pending(), 0);
    }
}
