//! Bounded worker-pool walker
//!
//! Same contract and depth rule as the concurrent walker, but a fixed number
//! of worker threads share the directories instead of one thread per
//! directory.
//!
//! ```text
//! Directory Queue (crossbeam deque - work stealing)
//! │
//! ├── Worker 0: pop dir → list → actions → push subdirs
//! ├── Worker 1: pop dir → list → actions → push subdirs
//! └── Worker N: pop dir → list → actions → push subdirs
//! ```
//!
//! Pending directories are counted in the walk's `WaitGroup`; a worker exits
//! once it finds no work and nothing is pending.

use crate::error::WalkError;
use crate::walker::state::WalkState;
use crossbeam_deque::{Injector, Steal, Stealer, Worker as DequeWorker};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Spins before an idle worker starts sleeping between polls
const MAX_IDLE_SPINS: u32 = 1000;

/// Directory work item
#[derive(Debug, Clone)]
struct DirWork {
    path: PathBuf,
    level: usize,
}

/// Walk `root` with `workers` threads and block until they all exit
pub(crate) fn walk_pooled(
    state: Arc<WalkState>,
    root: PathBuf,
    workers: usize,
) -> Result<(), WalkError> {
    let start = Instant::now();
    let workers = workers.max(1);
    info!(root = %root.display(), depth = ?state.depth, workers, "Starting pooled walk");

    let injector: Arc<Injector<DirWork>> = Arc::new(Injector::new());
    state.tasks.add(1);
    injector.push(DirWork {
        path: root.clone(),
        level: 0,
    });

    let mut locals: Vec<DequeWorker<DirWork>> = Vec::with_capacity(workers);
    let mut stealers: Vec<Stealer<DirWork>> = Vec::with_capacity(workers);
    for _ in 0..workers {
        let w = DequeWorker::new_fifo();
        stealers.push(w.stealer());
        locals.push(w);
    }
    let stealers = Arc::new(stealers);

    let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(workers);
    for (id, local) in locals.into_iter().enumerate() {
        let injector = Arc::clone(&injector);
        let stealers = Arc::clone(&stealers);
        let worker_state = Arc::clone(&state);

        let spawned = thread::Builder::new()
            .name(format!("walk-worker-{}", id))
            .spawn(move || worker_loop(id, local, &injector, &stealers, &worker_state));

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(source) => {
                state.fail(WalkError::Spawn {
                    path: root.clone(),
                    source,
                });
                break;
            }
        }
    }

    if handles.is_empty() {
        // Nobody is left to drain the queue
        return state.take_result();
    }

    for handle in handles {
        // Task panics are caught inside the loop, so join only fails on bugs
        let _ = handle.join();
    }

    let result = state.take_result();
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        ok = result.is_ok(),
        "Pooled walk finished"
    );
    result
}

fn worker_loop(
    id: usize,
    local: DequeWorker<DirWork>,
    injector: &Injector<DirWork>,
    stealers: &[Stealer<DirWork>],
    state: &WalkState,
) {
    debug!("Worker {} started", id);

    let mut idle_spins = 0;
    let mut processed = 0u64;

    loop {
        let work = local.pop().or_else(|| steal_work(id, injector, stealers));

        let work = match work {
            Some(w) => {
                idle_spins = 0;
                w
            }
            None => {
                // Children are registered before their parent is marked done,
                // so zero pending means the tree is exhausted
                if state.tasks.pending() == 0 {
                    break;
                }

                idle_spins += 1;
                if idle_spins > MAX_IDLE_SPINS {
                    thread::sleep(Duration::from_micros(100));
                    idle_spins = 0;
                } else {
                    thread::yield_now();
                }
                continue;
            }
        };

        // After cancellation the visit returns early, which still drains the queue
        let level = work.level;
        state.run_task(&work.path, level, |child| {
            state.tasks.add(1);
            local.push(DirWork {
                path: child,
                level: level + 1,
            });
        });
        processed += 1;
    }

    debug!("Worker {} finished after {} directories", id, processed);
}

/// Try the global injector first, then the other workers' deques
fn steal_work(
    id: usize,
    injector: &Injector<DirWork>,
    stealers: &[Stealer<DirWork>],
) -> Option<DirWork> {
    loop {
        match injector.steal() {
            Steal::Success(w) => return Some(w),
            Steal::Empty => break,
            Steal::Retry => continue,
        }
    }

    for (i, stealer) in stealers.iter().enumerate() {
        if i == id {
            continue;
        }
        loop {
            match stealer.steal() {
                Steal::Success(w) => return Some(w),
                Steal::Empty => break,
                Steal::Retry => continue,
            }
        }
    }

    None
}
