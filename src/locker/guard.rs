//! RAII lock guard implementation.

use crate::error::{LockerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// RAII guard for an acquired lock file.
///
/// When dropped, the lock file is deleted if it still records this guard's
/// PID; a lock that another process has since taken over is left alone.
/// If deletion fails, a warning is printed but no panic occurs.
#[derive(Debug)]
pub struct LockGuard {
    /// Path to the lock file.
    path: PathBuf,

    /// PID written into the lock file.
    pid: u32,

    /// Whether the lock has been released manually.
    released: bool,
}

impl LockGuard {
    pub(super) fn new(path: PathBuf, pid: u32) -> Self {
        Self {
            path,
            pid,
            released: false,
        }
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Whether the lock file still records this guard's PID.
    pub fn is_held(&self) -> bool {
        fs::read_to_string(&self.path)
            .map(|content| content.trim_end() == self.pid.to_string())
            .unwrap_or(false)
    }

    /// Manually release the lock, surfacing any delete fault.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.path).map_err(|source| LockerError::FileDelete {
            path: self.path.clone(),
            source,
        })
    }

    /// Keep the lock file on disk after the guard goes away.
    pub fn leak(mut self) -> PathBuf {
        self.released = true;
        self.path.clone()
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released || !self.is_held() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            eprintln!(
                "Warning: failed to release lock '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}
