//! dir-walker - Concurrent Recursive Directory Walker
//!
//! Walks a directory tree and hands every file and directory to a pair of
//! caller-supplied actions, skipping paths matched by an ignore file and
//! optionally bounding the recursion depth.
//!
//! # Features
//!
//! - **Unbounded Fan-Out**: One task per discovered directory, coordinated
//!   through a shared completion counter rather than parent/child joins.
//!
//! - **Fail-Fast**: The first error cancels every outstanding task and is the
//!   single error returned to the caller. No partial success.
//!
//! - **Ignore Files**: One pattern per line, mostly-literal substring matching
//!   against the full path.
//!
//! - **Alternative Strategies**: A single-threaded linear walker and a bounded
//!   work-stealing pool behind the same action contract.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Walker                            │
//! │   Arc<IgnoreMatcher>            Arc<AtomicBool> interrupt│
//! └───────────────┬──────────────────────────────────────────┘
//!                 │ walk(root, file_action, dir_action, depth)
//!                 ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                      WalkState                           │
//! │  WaitGroup (outstanding tasks)   first error + cancel    │
//! └───────┬──────────────────┬──────────────────┬────────────┘
//!         │                  │                  │
//!   ┌─────▼─────┐      ┌─────▼─────┐      ┌─────▼─────┐
//!   │ task(L0)  │ ───▶ │ task(L1)  │ ───▶ │ task(L2)  │ ...
//!   │ list dir  │      │ list dir  │      │ list dir  │
//!   │ actions   │      │ actions   │      │ actions   │
//!   └───────────┘      └───────────┘      └───────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dir_walker::Walker;
//!
//! let mut walker = Walker::new();
//! walker.configure_ignore(".walkignore")?;
//! walker.walk(
//!     ".",
//!     |file| println!("{}", file.display()),
//!     |dir| println!("{}/", dir.display()),
//!     None,
//! )?;
//! # Ok::<(), dir_walker::WalkerError>(())
//! ```

pub mod config;
pub mod error;
pub mod ignore;
pub mod progress;
pub mod walker;

pub use config::{CliArgs, Strategy, WalkConfig};
pub use error::{ConfigError, IgnoreError, Result, WalkError, WalkerError};
pub use ignore::IgnoreMatcher;
pub use walker::{Walker, WaitGroup};
