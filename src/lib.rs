//! Pidlocker: single-instance process locking through PID files.
//!
//! A [`Locker`](locker::Locker) prevents two copies of a program from running
//! at once. It inspects the PID file, the process table, and the holder's
//! command line, then removes stale locks, kills stuck instances (when
//! allowed), and writes a fresh lock.
//!
//! ```no_run
//! use pidlocker::config::LockConfig;
//! use pidlocker::locker::Locker;
//!
//! let config = LockConfig {
//!     lock_file: Some("/tmp/nightly.pid".into()),
//!     max_age_secs: 3600,
//!     killable: false,
//!     ..LockConfig::default()
//! };
//! let mut lock = Locker::new(config);
//! if lock.create() {
//!     // do the work, then
//!     lock.delete();
//! } else {
//!     eprint!("{}", lock.trace().render());
//!     for err in lock.errors() {
//!         eprintln!("{}", err);
//!     }
//! }
//! ```
//!
//! This is a best-effort, single-host convenience lock: nothing stops two
//! processes from passing `check` at the same moment and both writing.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod identity;
pub mod locker;
pub mod process;
pub mod trace;

#[cfg(test)]
pub(crate) mod test_support;
