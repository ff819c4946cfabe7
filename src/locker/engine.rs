//! The `Locker` value: configuration, identity, and the logs of one attempt.

use super::types::LockState;
use crate::config::LockConfig;
use crate::error::LockerError;
use crate::identity::ProcessIdentity;
use crate::process::{ProcFs, ProcessTable};
use crate::trace::{TraceEvent, TraceLog};
use std::path::{Path, PathBuf};

/// One lock attempt against one lock file.
///
/// A `Locker` is built once per run, used for a single acquisition sequence,
/// and optionally reused to release the same lock. It is not meant to be
/// shared across threads.
///
/// `check` and the write that follows it in `create` are two separate file
/// system steps. Two processes can both see "no obstruction" and both write,
/// with the later write winning. Set `exclusive_create` to turn the write into
/// a create-new so the loser gets a `FileWrite` fault instead.
#[derive(Debug)]
pub struct Locker<T: ProcessTable = ProcFs> {
    pub(super) config: LockConfig,
    pub(super) identity: ProcessIdentity,
    pub(super) lock_path: PathBuf,
    pub(super) processes: T,
    pub(super) old_pid: Option<String>,
    pub(super) state: Option<LockState>,
    pub(super) trace: TraceLog,
    pub(super) errors: Vec<LockerError>,
}

impl Locker<ProcFs> {
    /// Locker for the current process, probing `/proc`.
    pub fn new(config: LockConfig) -> Self {
        Self::with_parts(config, ProcessIdentity::current(), ProcFs::new())
    }
}

impl<T: ProcessTable> Locker<T> {
    /// Locker with an explicit identity and process table.
    ///
    /// The config's `executable_name`, if set, overrides the identity's name.
    pub fn with_parts(config: LockConfig, identity: ProcessIdentity, processes: T) -> Self {
        let identity = config.apply_identity(identity);
        let lock_path = config.lock_path(&identity);
        let trace = TraceLog::new(&identity);

        Self {
            config,
            identity,
            lock_path,
            processes,
            old_pid: None,
            state: None,
            trace,
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn identity(&self) -> &ProcessIdentity {
        &self.identity
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Advisory switch for callers; the engine does not consult it.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_killable(&self) -> bool {
        self.config.killable
    }

    pub fn max_age(&self) -> u64 {
        self.config.max_age_secs
    }

    /// PID read from an existing lock file by the last `check`.
    ///
    /// `None` until `check` has found and read a lock file.
    pub fn old_pid(&self) -> Option<&str> {
        self.old_pid.as_deref()
    }

    /// Classification made by the last `check`.
    pub fn state(&self) -> Option<LockState> {
        self.state
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    /// Faults captured so far, oldest first.
    pub fn errors(&self) -> &[LockerError] {
        &self.errors
    }

    /// Take the captured faults, leaving the list empty.
    pub fn take_errors(&mut self) -> Vec<LockerError> {
        std::mem::take(&mut self.errors)
    }

    pub(super) fn log(&mut self, event: TraceEvent) {
        self.trace.record(event);
    }

    /// Record a fault in both the error list and the trace.
    pub(super) fn capture(&mut self, err: LockerError) {
        self.trace.record(TraceEvent::Fault {
            kind: err.kind().to_string(),
            message: err.to_string(),
        });
        self.errors.push(err);
    }

    /// Turn an operation result into the boolean contract.
    pub(super) fn settle(&mut self, result: Result<bool, LockerError>) -> bool {
        match result {
            Ok(ok) => ok,
            Err(err) => {
                self.capture(err);
                false
            }
        }
    }
}
