//! LockConfig struct definition and default implementation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory holding default lock files.
pub const DEFAULT_RUN_DIR: &str = "/var/run";

/// Seconds after which a lock held by a matching, live process counts as stuck.
pub const DEFAULT_MAX_AGE_SECS: u64 = 1;

/// Configuration for one lock attempt.
///
/// The `Locker` takes this by value and never mutates it, so the lock path
/// and identity stay fixed between `check` and the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Explicit lock file path. When unset the lock lives at
    /// `<run_dir>/<executable_name>.pid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_file: Option<PathBuf>,

    /// Directory for the default lock file path.
    #[serde(default = "default_run_dir")]
    pub run_dir: PathBuf,

    /// Maximum age (seconds) of a lock file held by a live instance of this
    /// program before that instance is considered stuck.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// Whether a stuck prior instance may be sent SIGKILL. When false the
    /// prior instance is left running as an orphan and the lock is taken anyway.
    #[serde(default = "default_true")]
    pub killable: bool,

    /// Caller-level switch. Advisory: the engine itself does not consult it.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Override for the identity token matched against command lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_name: Option<String>,

    /// Write the lock file with create-new semantics instead of overwriting.
    #[serde(default)]
    pub exclusive_create: bool,

    /// Append the trace log to this file (NDJSON) after each command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_file: Option<PathBuf>,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            lock_file: None,
            run_dir: default_run_dir(),
            max_age_secs: default_max_age_secs(),
            killable: default_true(),
            enabled: default_true(),
            executable_name: None,
            exclusive_create: false,
            trace_file: None,
        }
    }
}

fn default_run_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RUN_DIR)
}

fn default_max_age_secs() -> u64 {
    DEFAULT_MAX_AGE_SECS
}

fn default_true() -> bool {
    true
}
