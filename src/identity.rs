//! Identity of the running process.
//!
//! The executable name is the token matched against other processes' command
//! lines, so it has to be something recognisable: the base name of argv[0],
//! or a synthetic `pidlocker_<pid>` when argv[0] is missing or implausible.

use chrono::{DateTime, Local};
use std::ffi::OsStr;
use std::path::Path;

/// Shortest executable name accepted as an identity token.
pub const MIN_NAME_LEN: usize = 3;

/// Longest executable name accepted as an identity token.
pub const MAX_NAME_LEN: usize = 255;

/// Format used for human-readable timestamps (`Tue Aug 14 15:29:53 +02:00 2012`).
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Who is asking for the lock.
#[derive(Debug, Clone)]
pub struct ProcessIdentity {
    executable_name: String,
    pid: u32,
    host: String,
    created_at: DateTime<Local>,
}

impl ProcessIdentity {
    /// Identity of the current process, derived from argv[0].
    pub fn current() -> Self {
        let argv0 = std::env::args_os().next();
        Self::from_argv0(argv0.as_deref(), std::process::id())
    }

    /// Derive an identity from an argv[0] value and a PID.
    pub fn from_argv0(argv0: Option<&OsStr>, pid: u32) -> Self {
        let executable_name = argv0
            .and_then(|arg| Path::new(arg).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| is_plausible_name(name))
            .unwrap_or_else(|| fallback_name(pid));

        Self {
            executable_name,
            pid,
            host: host_name(),
            created_at: Local::now(),
        }
    }

    /// Replace the derived executable name.
    pub fn with_executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = name.into();
        self
    }

    /// Replace the PID, e.g. to lock on behalf of a parent shell.
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Tag used on every trace line, e.g. `myapp[12345]`.
    pub fn label(&self) -> String {
        format!("{}[{}]", self.executable_name, self.pid)
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Birth time as fractional seconds since the Unix epoch.
    pub fn created_at_epoch(&self) -> f64 {
        self.created_at.timestamp_micros() as f64 / 1_000_000.0
    }

    /// Birth time formatted for humans.
    pub fn created_at_display(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Whether a name is usable as an identity token.
pub fn is_plausible_name(name: &str) -> bool {
    (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name.len())
}

fn fallback_name(pid: u32) -> String {
    format!("pidlocker_{}", pid)
}

/// Local host name, or `unknown` if it cannot be determined.
pub(crate) fn host_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_base_name_of_argv0() {
        let id = ProcessIdentity::from_argv0(Some(OsStr::new("/usr/local/bin/backupd")), 77);
        assert_eq!(id.executable_name(), "backupd");
        assert_eq!(id.pid(), 77);
        assert_eq!(id.label(), "backupd[77]");
    }

    #[test]
    fn short_name_falls_back() {
        let id = ProcessIdentity::from_argv0(Some(OsStr::new("./ab")), 1234);
        assert_eq!(id.executable_name(), "pidlocker_1234");
    }

    #[test]
    fn long_name_falls_back() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let id = ProcessIdentity::from_argv0(Some(OsStr::new(&long)), 9);
        assert_eq!(id.executable_name(), "pidlocker_9");

        let edge = "y".repeat(MAX_NAME_LEN);
        let id = ProcessIdentity::from_argv0(Some(OsStr::new(&edge)), 9);
        assert_eq!(id.executable_name(), edge);
    }

    #[test]
    fn missing_argv0_falls_back() {
        let id = ProcessIdentity::from_argv0(None, 5);
        assert_eq!(id.executable_name(), "pidlocker_5");
    }

    #[test]
    fn override_replaces_name_in_label() {
        let id = ProcessIdentity::from_argv0(None, 5).with_executable_name("indexer");
        assert_eq!(id.label(), "indexer[5]");
    }

    #[test]
    fn pid_override_changes_label() {
        let id = ProcessIdentity::from_argv0(Some(OsStr::new("deploy.sh")), 5).with_pid(4410);
        assert_eq!(id.pid(), 4410);
        assert_eq!(id.label(), "deploy.sh[4410]");
    }

    #[test]
    fn current_identity_is_this_process() {
        let id = ProcessIdentity::current();
        assert_eq!(id.pid(), std::process::id());
        assert!(!id.host().is_empty());
        assert!(is_plausible_name(id.executable_name()));
    }

    #[test]
    fn birth_time_is_recent() {
        let id = ProcessIdentity::from_argv0(None, 5);
        let now = chrono::Local::now().timestamp() as f64;
        assert!((now - id.created_at_epoch()).abs() < 60.0);
        assert!(!id.created_at_display().is_empty());
    }
}
