use crate::config::LockConfig;
use crate::identity::ProcessIdentity;
use crate::process::ProcessTable;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Scriptable process table.
///
/// Processes are registered with an optional command line (`None` models a
/// process whose command line the platform will not reveal). Terminated PIDs
/// are recorded and stop counting as running.
#[derive(Debug, Default)]
pub(crate) struct FakeProcesses {
    procs: HashMap<u32, Option<String>>,
    terminated: RefCell<Vec<u32>>,
    probe_error: Option<io::ErrorKind>,
    terminate_error: Option<io::ErrorKind>,
    reaped_by_other: Option<PathBuf>,
}

impl FakeProcesses {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_process(mut self, pid: u32, command_line: &str) -> Self {
        self.procs.insert(pid, Some(command_line.to_string()));
        self
    }

    pub(crate) fn with_hidden_process(mut self, pid: u32) -> Self {
        self.procs.insert(pid, None);
        self
    }

    pub(crate) fn failing_probe(mut self, kind: io::ErrorKind) -> Self {
        self.probe_error = Some(kind);
        self
    }

    pub(crate) fn failing_terminate(mut self, kind: io::ErrorKind) -> Self {
        self.terminate_error = Some(kind);
        self
    }

    /// Delete `path` during the liveness probe, as if a competing instance
    /// reaped the lock between our read and our delete.
    pub(crate) fn racing_reaper(mut self, path: &Path) -> Self {
        self.reaped_by_other = Some(path.to_path_buf());
        self
    }

    pub(crate) fn terminated(&self) -> Vec<u32> {
        self.terminated.borrow().clone()
    }
}

impl ProcessTable for FakeProcesses {
    fn is_running(&self, pid: u32) -> io::Result<bool> {
        if let Some(kind) = self.probe_error {
            return Err(io::Error::from(kind));
        }
        if let Some(path) = &self.reaped_by_other {
            let _ = fs::remove_file(path);
        }
        Ok(self.procs.contains_key(&pid) && !self.terminated.borrow().contains(&pid))
    }

    fn command_line(&self, pid: u32) -> io::Result<Option<String>> {
        Ok(self.procs.get(&pid).cloned().flatten())
    }

    fn terminate(&self, pid: u32) -> io::Result<()> {
        if let Some(kind) = self.terminate_error {
            return Err(io::Error::from(kind));
        }
        if !self.procs.contains_key(&pid) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.terminated.borrow_mut().push(pid);
        Ok(())
    }
}

pub(crate) fn test_identity(name: &str, pid: u32) -> ProcessIdentity {
    ProcessIdentity::from_argv0(Some(OsStr::new(name)), pid)
}

pub(crate) fn test_config(lock_file: &Path, max_age_secs: u64, killable: bool) -> LockConfig {
    LockConfig {
        lock_file: Some(lock_file.to_path_buf()),
        max_age_secs,
        killable,
        ..LockConfig::default()
    }
}

/// Write a lock file with the given contents into `dir`.
pub(crate) fn write_lock(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("app.pid");
    fs::write(&path, contents).unwrap();
    path
}

/// Push a file's modification time `secs` seconds into the past.
pub(crate) fn backdate(path: &Path, secs: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(secs))
        .unwrap();
}
