//! Check, create, delete, and murder.
//!
//! Each public operation returns `bool`. Faults are captured into the locker's
//! error list (and mirrored into the trace) at the operation boundary, and no
//! operation retries.

use super::engine::Locker;
use super::guard::LockGuard;
use super::record;
use super::types::LockState;
use crate::error::{LockerError, Result};
use crate::identity::{MAX_NAME_LEN, MIN_NAME_LEN, is_plausible_name};
use crate::process::{ProcessTable, parse_pid};
use crate::trace::TraceEvent;
use std::io;

impl<T: ProcessTable> Locker<T> {
    /// Inspect the lock path and clear any obstruction that can be cleared.
    ///
    /// Returns `true` when a fresh lock may be written. Recovery actions
    /// (deleting a stale file, terminating a stuck instance) have already run
    /// by the time this returns.
    ///
    /// A process counts as "this program" when its command line merely
    /// contains the executable name. Any process whose arguments mention the
    /// name will match.
    pub fn check(&mut self) -> bool {
        self.log(TraceEvent::Check);
        self.old_pid = None;
        self.state = None;

        let result = self.inspect();
        if let Err(err) = &result {
            self.state = Some(match err {
                LockerError::ProcessProbe { .. } => LockState::Unprobeable,
                LockerError::UserError(_) => LockState::Misconfigured,
                _ => LockState::Unreadable,
            });
        }
        self.settle(result)
    }

    /// Record the classification and report whether it lets a lock be written
    /// without any recovery action.
    fn conclude(&mut self, state: LockState) -> bool {
        self.state = Some(state);
        state.permits_acquire()
    }

    /// Refuse to match against a name every command line would contain.
    fn validate_identity(&self) -> Result<()> {
        self.config.validate()?;

        let name = self.identity.executable_name();
        if !is_plausible_name(name) {
            return Err(LockerError::UserError(format!(
                "executable name '{}' must be {}..={} bytes",
                name, MIN_NAME_LEN, MAX_NAME_LEN
            )));
        }
        Ok(())
    }

    fn inspect(&mut self) -> Result<bool> {
        self.validate_identity()?;
        let path = self.lock_path.clone();

        let exists = path.try_exists().map_err(|source| LockerError::FileRead {
            path: path.clone(),
            source,
        })?;
        if !exists {
            self.log(TraceEvent::NoLockFile { path });
            return Ok(self.conclude(LockState::NoFile));
        }

        self.log(TraceEvent::LockFileFound { path: path.clone() });
        self.log(TraceEvent::ReadingPid { path: path.clone() });
        let raw = record::read_pid(&path).map_err(|source| LockerError::FileRead {
            path: path.clone(),
            source,
        })?;
        self.old_pid = Some(raw.clone());

        let Some(pid) = parse_pid(&raw) else {
            self.log(TraceEvent::InvalidPid { raw });
            self.state = Some(LockState::StaleFile);
            return Ok(self.delete());
        };

        let running = self
            .processes
            .is_running(pid)
            .map_err(|source| LockerError::ProcessProbe {
                pid: raw.clone(),
                source,
            })?;
        if !running {
            self.log(TraceEvent::PidNotRunning { pid: raw, path });
            self.state = Some(LockState::StaleFile);
            return Ok(self.delete());
        }
        self.log(TraceEvent::PidRunning { pid: raw.clone() });

        let command_line =
            self.processes
                .command_line(pid)
                .map_err(|source| LockerError::ProcessProbe {
                    pid: raw.clone(),
                    source,
                })?;
        let Some(command_line) = command_line else {
            self.log(TraceEvent::CommandLineUnavailable { pid: raw });
            return Ok(self.conclude(LockState::Unverifiable));
        };

        if !command_line.contains(self.identity.executable_name()) {
            self.log(TraceEvent::ForeignProcess {
                pid: raw,
                path,
                executable: self.identity.executable_name().to_string(),
            });
            self.state = Some(LockState::ForeignProcess);
            return Ok(self.delete());
        }

        self.log(TraceEvent::MatchedInstance {
            pid: raw,
            command_line,
        });
        let age_secs = record::age_secs(&path).map_err(|source| LockerError::FileRead {
            path: path.clone(),
            source,
        })?;
        let max_age_secs = self.config.max_age_secs;

        if age_secs > i64::try_from(max_age_secs).unwrap_or(i64::MAX) {
            self.log(TraceEvent::LockTooOld {
                age_secs,
                max_age_secs,
            });
            self.state = Some(LockState::StuckProcess);
            Ok(self.murder())
        } else {
            self.log(TraceEvent::LockRecentlyModified {
                age_secs,
                max_age_secs,
            });
            Ok(self.conclude(LockState::LiveProcess))
        }
    }

    /// Check, then write this process's PID to the lock file.
    ///
    /// Returns `false` without writing when `check` refuses.
    pub fn create(&mut self) -> bool {
        self.log(TraceEvent::Create);
        if !self.check() {
            return false;
        }

        let result = self.write_record();
        self.settle(result)
    }

    fn write_record(&mut self) -> Result<bool> {
        let path = self.lock_path.clone();
        let exclusive = self.config.exclusive_create;

        // After an orphan or stuck-process decision the old file is still there.
        if exclusive && path.exists() {
            self.log(TraceEvent::ClearingForExclusiveCreate { path: path.clone() });
            if !self.delete() {
                return Ok(false);
            }
        }

        let pid = self.identity.pid();
        record::write_pid(&path, pid, exclusive).map_err(|source| LockerError::FileWrite {
            path: path.clone(),
            source,
        })?;
        self.log(TraceEvent::LockWritten { path, pid });
        Ok(true)
    }

    /// Delete the lock file.
    ///
    /// Deleting a file that is already gone is a fault, not a no-op.
    pub fn delete(&mut self) -> bool {
        self.log(TraceEvent::Delete);
        let path = self.lock_path.clone();

        match record::remove(&path) {
            Ok(()) => {
                self.log(TraceEvent::LockDeleted { path });
                true
            }
            Err(source) => {
                self.capture(LockerError::FileDelete { path, source });
                false
            }
        }
    }

    /// Alias for [`Locker::delete`].
    pub fn remove(&mut self) -> bool {
        self.delete()
    }

    /// SIGKILL the process recorded in the lock file.
    ///
    /// When the locker is not killable this does nothing and reports success,
    /// leaving the old process running. Success only means the signal was
    /// sent; the process may still be exiting when this returns.
    pub fn murder(&mut self) -> bool {
        let killable = self.config.killable;
        self.log(TraceEvent::Murder { killable });

        if !killable {
            let pid = self.old_pid.clone().unwrap_or_default();
            self.log(TraceEvent::TerminationSkipped { pid });
            return true;
        }

        let result = self.terminate_holder();
        self.settle(result)
    }

    fn terminate_holder(&mut self) -> Result<bool> {
        let Some(raw) = self.old_pid.clone() else {
            return Err(LockerError::Termination {
                pid: String::new(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "no lock holder recorded"),
            });
        };

        let pid = parse_pid(&raw).ok_or_else(|| LockerError::Termination {
            pid: raw.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a valid PID"),
        })?;

        if pid == self.identity.pid() {
            return Err(LockerError::Termination {
                pid: raw,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "refusing to terminate the current process",
                ),
            });
        }

        self.processes
            .terminate(pid)
            .map_err(|source| LockerError::Termination {
                pid: raw.clone(),
                source,
            })?;
        self.log(TraceEvent::Terminated { pid: raw });
        Ok(true)
    }

    /// Typed variant of [`Locker::create`].
    ///
    /// On success returns a guard that removes the lock file when dropped.
    /// On failure the newest fault from this attempt is moved out of the error
    /// list and returned; a refusal without any fault becomes
    /// [`LockerError::Refused`].
    pub fn acquire(&mut self) -> Result<LockGuard> {
        let faults_before = self.errors.len();

        if self.create() {
            return Ok(LockGuard::new(
                self.lock_path.clone(),
                self.identity.pid(),
            ));
        }

        if self.errors.len() > faults_before
            && let Some(err) = self.errors.pop()
        {
            return Err(err);
        }

        Err(LockerError::Refused {
            path: self.lock_path.clone(),
            state: self.state.unwrap_or(LockState::Unreadable),
        })
    }
}
