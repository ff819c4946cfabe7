//! Structured trace log for lock attempts.
//!
//! Every step the engine takes is recorded as a timestamped [`TraceEntry`].
//! The log can be rendered as text for humans or written as NDJSON (one JSON
//! object per line) for tooling.
//!
//! # Text Format
//!
//! ```text
//! Tue Aug 14 15:29:53 +02:00 2012 backupd[3253] check
//! Tue Aug 14 15:29:53 +02:00 2012 backupd[3253] PID file /var/run/backupd.pid found
//! Tue Aug 14 15:29:53 +02:00 2012 backupd[3253] PID 3212 in /var/run/backupd.pid not running
//! ```

use crate::error::{LockerError, Result};
use crate::identity::{ProcessIdentity, TIMESTAMP_FORMAT};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Steps the engine can record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// `create` entered.
    Create,
    /// `check` entered.
    Check,
    /// `delete` entered.
    Delete,
    /// `murder` entered.
    Murder { killable: bool },
    /// No lock file at the path.
    NoLockFile { path: PathBuf },
    /// A lock file exists at the path.
    LockFileFound { path: PathBuf },
    /// Reading the recorded PID.
    ReadingPid { path: PathBuf },
    /// The recorded PID is not a usable process identifier.
    InvalidPid { raw: String },
    /// No process with the recorded PID exists.
    PidNotRunning { pid: String, path: PathBuf },
    /// A process with the recorded PID exists.
    PidRunning { pid: String },
    /// The command line of the recorded PID could not be obtained.
    CommandLineUnavailable { pid: String },
    /// The recorded PID belongs to some other program.
    ForeignProcess {
        pid: String,
        path: PathBuf,
        executable: String,
    },
    /// The recorded PID looks like an instance of this program.
    MatchedInstance { pid: String, command_line: String },
    /// The lock is older than the allowed age.
    LockTooOld { age_secs: i64, max_age_secs: u64 },
    /// The lock was modified recently.
    LockRecentlyModified { age_secs: i64, max_age_secs: u64 },
    /// Termination skipped because killing is disabled.
    TerminationSkipped { pid: String },
    /// SIGKILL sent.
    Terminated { pid: String },
    /// A lock file still present after `check` was removed before an exclusive create.
    ClearingForExclusiveCreate { path: PathBuf },
    /// The lock file was written.
    LockWritten { path: PathBuf, pid: u32 },
    /// The lock file was deleted.
    LockDeleted { path: PathBuf },
    /// A fault was captured into the error list.
    Fault { kind: String, message: String },
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEvent::Create => write!(f, "create"),
            TraceEvent::Check => write!(f, "check"),
            TraceEvent::Delete => write!(f, "delete"),
            TraceEvent::Murder { killable } => write!(f, "murder, killable is: {}", killable),
            TraceEvent::NoLockFile { path } => {
                write!(f, "No lock file found at {}", path.display())
            }
            TraceEvent::LockFileFound { path } => write!(f, "PID file {} found", path.display()),
            TraceEvent::ReadingPid { path } => write!(f, "Get old PID from {}", path.display()),
            TraceEvent::InvalidPid { raw } => write!(f, "Recorded PID {:?} is not valid", raw),
            TraceEvent::PidNotRunning { pid, path } => {
                write!(f, "PID {} in {} not running", pid, path.display())
            }
            TraceEvent::PidRunning { pid } => {
                write!(f, "PID {} is running, checking its command line", pid)
            }
            TraceEvent::CommandLineUnavailable { pid } => {
                write!(f, "Command line of PID {} unavailable, refusing", pid)
            }
            TraceEvent::ForeignProcess {
                pid,
                path,
                executable,
            } => write!(
                f,
                "PID {} in {} running but does not match {}",
                pid,
                path.display(),
                executable
            ),
            TraceEvent::MatchedInstance { pid, command_line } => write!(
                f,
                "Process {} looks like an instance of this program: {}",
                pid, command_line
            ),
            TraceEvent::LockTooOld {
                age_secs,
                max_age_secs,
            } => write!(
                f,
                "lock file too old, timeDiff={} (max {})",
                age_secs, max_age_secs
            ),
            TraceEvent::LockRecentlyModified {
                age_secs,
                max_age_secs,
            } => write!(
                f,
                "lock file recently modified, timeDiff={} (max {})",
                age_secs, max_age_secs
            ),
            TraceEvent::TerminationSkipped { pid } => {
                write!(f, "Not killable, leaving PID {} running", pid)
            }
            TraceEvent::Terminated { pid } => write!(f, "Sent SIGKILL to PID {}", pid),
            TraceEvent::ClearingForExclusiveCreate { path } => {
                write!(f, "Removing {} before exclusive create", path.display())
            }
            TraceEvent::LockWritten { path, pid } => {
                write!(f, "Wrote PID {} to {}", pid, path.display())
            }
            TraceEvent::LockDeleted { path } => write!(f, "Deleted {}", path.display()),
            TraceEvent::Fault { kind, message } => write!(f, "fault ({}): {}", kind, message),
        }
    }
}

/// One timestamped trace record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Local time the step happened.
    pub ts: DateTime<Local>,

    /// Process label, e.g. `backupd[3253]`.
    pub process: String,

    /// Host the process runs on. Informational only.
    pub host: String,

    /// What happened.
    #[serde(flatten)]
    pub event: TraceEvent,
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.ts.format(TIMESTAMP_FORMAT),
            self.process,
            self.event
        )
    }
}

/// Append-only trace of one lock attempt.
#[derive(Debug, Clone)]
pub struct TraceLog {
    process: String,
    host: String,
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    /// Create an empty log tagged with the identity's label and host.
    pub fn new(identity: &ProcessIdentity) -> Self {
        Self {
            process: identity.label(),
            host: identity.host().to_string(),
            entries: Vec::new(),
        }
    }

    /// Record an event with the current time.
    pub fn record(&mut self, event: TraceEvent) {
        self.entries.push(TraceEntry {
            ts: Local::now(),
            process: self.process.clone(),
            host: self.host.clone(),
            event,
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Iterate over the recorded events, without timestamps.
    pub fn events(&self) -> impl Iterator<Item = &TraceEvent> {
        self.entries.iter().map(|entry| &entry.event)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render the log as text, one line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    /// Serialize the log as NDJSON.
    pub fn to_ndjson(&self) -> Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            let line = serde_json::to_string(entry).map_err(|e| {
                LockerError::UserError(format!("failed to serialize trace entry: {}", e))
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Append the log to a file as NDJSON.
    ///
    /// The file and its parent directory are created if missing. Existing
    /// content is preserved, so repeated runs accumulate history.
    pub fn append_to(&self, path: &Path) -> Result<()> {
        let ndjson = self.to_ndjson()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                LockerError::UserError(format!(
                    "failed to create trace directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LockerError::UserError(format!(
                    "failed to open trace file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        file.write_all(ndjson.as_bytes()).map_err(|e| {
            LockerError::UserError(format!(
                "failed to write trace to '{}': {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            LockerError::UserError(format!(
                "failed to sync trace file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
