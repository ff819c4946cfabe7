//! `/proc` backed process table.

use super::ProcessTable;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Default procfs mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Process table read from a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new() -> Self {
        Self::with_root(DEFAULT_PROC_ROOT)
    }

    /// Use a different procfs root (tests point this at a fake tree).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn process_dir(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string())
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for ProcFs {
    fn is_running(&self, pid: u32) -> io::Result<bool> {
        self.process_dir(pid).try_exists()
    }

    fn command_line(&self, pid: u32) -> io::Result<Option<String>> {
        let raw = match fs::read(self.process_dir(pid).join("cmdline")) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        // Arguments are NUL-terminated; kernel threads and zombies have none.
        // Joined verbatim so names are matched as the kernel recorded them.
        let args: Vec<String> = raw
            .split(|&b| b == 0)
            .filter(|arg| !arg.is_empty())
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect();

        Ok(Some(args.join(" ")))
    }

    #[cfg(unix)]
    fn terminate(&self, pid: u32) -> io::Result<()> {
        let pid = libc::pid_t::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PID out of range"))?;
        if pid <= 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to signal a process group",
            ));
        }

        // SAFETY: kill(2) takes plain integers; pid is validated positive above.
        let rc = unsafe { libc::kill(pid, libc::SIGKILL) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn terminate(&self, _pid: u32) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "process termination is only supported on Unix",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_proc() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let p = temp_dir.path();

        fs::create_dir_all(p.join("100")).unwrap();
        fs::write(
            p.join("100").join("cmdline"),
            b"/usr/bin/backupd\0--config\0/etc/backup conf\0",
        )
        .unwrap();

        // Running, but no cmdline exposed.
        fs::create_dir_all(p.join("200")).unwrap();

        // Zombie: empty cmdline.
        fs::create_dir_all(p.join("300")).unwrap();
        fs::write(p.join("300").join("cmdline"), b"").unwrap();

        temp_dir
    }

    #[test]
    fn liveness_follows_pid_directories() {
        let temp_dir = fake_proc();
        let procs = ProcFs::with_root(temp_dir.path());

        assert!(procs.is_running(100).unwrap());
        assert!(procs.is_running(200).unwrap());
        assert!(!procs.is_running(999).unwrap());
    }

    #[test]
    fn command_line_joins_arguments() {
        let temp_dir = fake_proc();
        let procs = ProcFs::with_root(temp_dir.path());

        let cmdline = procs.command_line(100).unwrap().unwrap();
        assert_eq!(cmdline, "/usr/bin/backupd --config /etc/backup conf");
        assert!(cmdline.contains("backupd"));
    }

    #[test]
    fn command_line_keeps_quotes_verbatim() {
        let temp_dir = fake_proc();
        let p = temp_dir.path();
        fs::create_dir_all(p.join("400")).unwrap();
        fs::write(p.join("400").join("cmdline"), b"/opt/bin/bob's-job\0--daemon\0").unwrap();
        let procs = ProcFs::with_root(p);

        let cmdline = procs.command_line(400).unwrap().unwrap();
        assert_eq!(cmdline, "/opt/bin/bob's-job --daemon");
        assert!(cmdline.contains("bob's-job"));
    }

    #[test]
    fn missing_cmdline_is_unavailable() {
        let temp_dir = fake_proc();
        let procs = ProcFs::with_root(temp_dir.path());

        assert_eq!(procs.command_line(200).unwrap(), None);
        assert_eq!(procs.command_line(999).unwrap(), None);
    }

    #[test]
    fn empty_cmdline_is_empty_string() {
        let temp_dir = fake_proc();
        let procs = ProcFs::with_root(temp_dir.path());

        assert_eq!(procs.command_line(300).unwrap(), Some(String::new()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn real_proc_sees_current_process() {
        let procs = ProcFs::new();
        let pid = std::process::id();

        assert!(procs.is_running(pid).unwrap());
        let cmdline = procs.command_line(pid).unwrap().unwrap();
        assert!(!cmdline.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn terminate_missing_process_fails() {
        // PID just below the pid_t ceiling is never allocated in practice.
        let procs = ProcFs::new();
        let err = procs.terminate(i32::MAX as u32 - 1).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ESRCH));
    }

    #[cfg(unix)]
    #[test]
    fn terminate_rejects_out_of_range_pid() {
        let procs = ProcFs::new();
        let err = procs.terminate(u32::MAX).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
