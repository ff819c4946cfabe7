//! Lock state classification.

/// What `check` found at the lock path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No lock file exists.
    NoFile,
    /// The recorded PID is not running (or is not a PID at all).
    StaleFile,
    /// The recorded PID is running but is some other program.
    ForeignProcess,
    /// A matching instance is running but its lock is older than the max age.
    StuckProcess,
    /// A matching instance is running and its lock is fresh.
    LiveProcess,
    /// The recorded PID is running but its command line cannot be read.
    Unverifiable,
    /// The lock file could not be read.
    Unreadable,
    /// The process table could not be queried for the recorded PID.
    Unprobeable,
    /// The locker's configuration or identity is unusable.
    Misconfigured,
}

impl LockState {
    /// Whether this state allows a new lock once its recovery action succeeds.
    ///
    /// | state            | recovery          | outcome |
    /// |------------------|-------------------|---------|
    /// | `NoFile`         | none              | proceed |
    /// | `StaleFile`      | delete            | proceed |
    /// | `ForeignProcess` | delete            | proceed |
    /// | `StuckProcess`   | terminate         | proceed |
    /// | `LiveProcess`    | none              | refuse  |
    /// | `Unverifiable`   | none              | refuse  |
    /// | `Unreadable`     | none              | refuse  |
    /// | `Unprobeable`    | none              | refuse  |
    /// | `Misconfigured`  | none              | refuse  |
    ///
    /// For states with a recovery action, `check` returns the action's result.
    pub fn permits_acquire(&self) -> bool {
        matches!(
            self,
            LockState::NoFile
                | LockState::StaleFile
                | LockState::ForeignProcess
                | LockState::StuckProcess
        )
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            LockState::NoFile => "no lock file",
            LockState::StaleFile => "stale lock file",
            LockState::ForeignProcess => "lock held by an unrelated process",
            LockState::StuckProcess => "previous instance stuck",
            LockState::LiveProcess => "previous instance still running",
            LockState::Unverifiable => "lock holder cannot be identified",
            LockState::Unreadable => "lock could not be inspected",
            LockState::Unprobeable => "lock holder could not be probed",
            LockState::Misconfigured => "locker is misconfigured",
        };
        f.write_str(text)
    }
}
