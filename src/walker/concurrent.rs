//! Concurrent walker - one task per directory
//!
//! Every discovered directory gets its own OS thread. There is no pool and no
//! cap on live tasks: parallelism follows the breadth of the tree.
//!
//! ```text
//! walk(root)
//! │  tasks.add(1), spawn root task, tasks.wait()
//! │
//! ├── task(root, L0): list → file_action / dir_action → spawn per subdir → done
//! │   ├── task(a, L1): list → ... → done
//! │   └── task(b, L1): list → ... → done
//! │       └── task(b/c, L2): ...
//! ```
//!
//! A task finishes as soon as its own directory has been iterated; children
//! are tracked only through the shared [`WaitGroup`](super::sync::WaitGroup),
//! never joined by their parent.

use crate::error::WalkError;
use crate::walker::state::WalkState;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// Walk `root` and block until every task has finished
pub(crate) fn walk(state: Arc<WalkState>, root: PathBuf) -> Result<(), WalkError> {
    let start = Instant::now();
    info!(root = %root.display(), depth = ?state.depth, "Starting concurrent walk");

    spawn_task(&state, root, 0);
    state.tasks.wait();

    let result = state.take_result();
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        ok = result.is_ok(),
        "Concurrent walk finished"
    );
    result
}

/// Register one task with the counter and start it on a new thread
fn spawn_task(state: &Arc<WalkState>, dir: PathBuf, level: usize) {
    state.tasks.add(1);

    let task_state = Arc::clone(state);
    let task_dir = dir.clone();
    let spawned = thread::Builder::new()
        .name(format!("walk-L{}", level))
        .spawn(move || {
            task_state.run_task(&task_dir, level, |child| {
                spawn_task(&task_state, child, level + 1)
            });
        });

    match spawned {
        Ok(_) => debug!(dir = %dir.display(), level, "Spawned walk task"),
        Err(source) => {
            // The task never ran, so release its slot here
            state.fail(WalkError::Spawn { path: dir, source });
            state.tasks.done();
        }
    }
}
