//! Process-table collaborator.
//!
//! The engine needs three answers about a PID: does it exist, what is its
//! command line, and can it be killed. [`ProcessTable`] is that boundary;
//! [`ProcFs`] answers from a `/proc`-style filesystem.

mod procfs;

pub use procfs::ProcFs;

use std::io;

/// Read and act on the host's process table.
pub trait ProcessTable {
    /// Whether a process with this PID currently exists.
    fn is_running(&self, pid: u32) -> io::Result<bool>;

    /// The process's command line as a single string, or `None` when the
    /// platform cannot provide one.
    fn command_line(&self, pid: u32) -> io::Result<Option<String>>;

    /// Forcefully terminate the process. No graceful variant is offered.
    fn terminate(&self, pid: u32) -> io::Result<()>;
}

impl<T: ProcessTable + ?Sized> ProcessTable for &T {
    fn is_running(&self, pid: u32) -> io::Result<bool> {
        (**self).is_running(pid)
    }

    fn command_line(&self, pid: u32) -> io::Result<Option<String>> {
        (**self).command_line(pid)
    }

    fn terminate(&self, pid: u32) -> io::Result<()> {
        (**self).terminate(pid)
    }
}

/// Parse a recorded PID.
///
/// Only positive values that fit a `pid_t` are accepted, so a corrupt lock
/// file can never direct a signal at a process group.
pub fn parse_pid(raw: &str) -> Option<u32> {
    let pid: u32 = raw.trim().parse().ok()?;
    (pid > 0 && pid <= i32::MAX as u32).then_some(pid)
}
