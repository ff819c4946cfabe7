//! PID-file lock engine.
//!
//! A [`Locker`] decides whether this process may take a PID-file lock and
//! clears what obstructions it can on the way:
//!
//! - no lock file: proceed
//! - lock file naming a PID that is not running: delete it, proceed
//! - PID running but some other program (PID reuse): delete it, proceed
//! - PID running this program, lock older than the max age: SIGKILL it, proceed
//! - PID running this program, lock fresh: refuse
//! - PID running but its command line is unreadable: refuse
//!
//! # Lock Files
//!
//! A lock file holds one line: the holder's decimal PID. The default path is
//! `/var/run/<executable>.pid`.
//!
//! # Diagnostics
//!
//! Operations return `bool`. Every step is recorded in the locker's
//! [`TraceLog`](crate::trace::TraceLog) and every fault in its error list.

mod engine;
mod guard;
mod operations;
mod record;
mod types;


// Re-export public API
pub use engine::Locker;
pub use guard::LockGuard;
pub use types::LockState;
