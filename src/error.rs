//! Error types for pidlocker.
//!
//! The engine never lets one of these escape a boolean operation: faults are
//! captured into the locker's error list and the operation returns `false`.
//! The typed `Locker::acquire` API and the binary surface them directly.

use crate::exit_codes;
use crate::locker::LockState;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pidlocker operations.
#[derive(Error, Debug)]
pub enum LockerError {
    /// The lock file (or its metadata) could not be read.
    #[error("failed to read lock file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lock file could not be written.
    #[error("failed to write lock file '{}': {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lock file could not be deleted.
    #[error("failed to delete lock file '{}': {source}", .path.display())]
    FileDelete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process table could not answer for a PID.
    #[error("failed to probe process {pid}: {source}")]
    ProcessProbe {
        pid: String,
        #[source]
        source: io::Error,
    },

    /// The termination signal could not be delivered.
    #[error("failed to terminate process {pid}: {source}")]
    Termination {
        pid: String,
        #[source]
        source: io::Error,
    },

    /// Acquisition was refused without any underlying fault.
    #[error("lock '{}' refused: {state}", .path.display())]
    Refused { path: PathBuf, state: LockState },

    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// The command run under the lock failed.
    #[error("command failed: {0}")]
    CommandFailed(String),
}

impl LockerError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockerError::UserError(_) => exit_codes::USER_ERROR,
            LockerError::CommandFailed(_) => exit_codes::COMMAND_FAILURE,
            LockerError::FileRead { .. }
            | LockerError::FileWrite { .. }
            | LockerError::FileDelete { .. }
            | LockerError::ProcessProbe { .. }
            | LockerError::Termination { .. }
            | LockerError::Refused { .. } => exit_codes::LOCK_FAILURE,
        }
    }

    /// Short name of the fault class, used in trace entries.
    pub fn kind(&self) -> &'static str {
        match self {
            LockerError::FileRead { .. } => "file_read",
            LockerError::FileWrite { .. } => "file_write",
            LockerError::FileDelete { .. } => "file_delete",
            LockerError::ProcessProbe { .. } => "process_probe",
            LockerError::Termination { .. } => "termination",
            LockerError::Refused { .. } => "refused",
            LockerError::UserError(_) => "user_error",
            LockerError::CommandFailed(_) => "command_failed",
        }
    }
}

/// Result type alias for pidlocker operations.
pub type Result<T> = std::result::Result<T, LockerError>;
