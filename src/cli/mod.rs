//! CLI argument parsing for pidlocker.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Implementations live in the `commands` module.

use clap::{Args, Parser, Subcommand};
use pidlocker::config::LockConfig;
use std::path::PathBuf;

/// Pidlocker: single-instance locking through PID files.
///
/// A lock file holds the PID of its owner. Stale locks left by crashed
/// instances are removed, and an instance that has held its lock longer
/// than the max age is killed unless --no-kill is given.
#[derive(Parser, Debug)]
#[command(name = "pidlocker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML configuration file; flags override its values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for pidlocker.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Take the lock, recording a PID in the lock file.
    ///
    /// Without --pid the PID recorded is pidlocker's own, which exits right
    /// away; shell scripts normally pass `--pid $$ --name <script>`.
    Acquire(LockArgs),

    /// Inspect the lock and clear stale or stuck holders, without writing.
    Check(LockArgs),

    /// Delete the lock file.
    Release(LockArgs),

    /// Take the lock, run a command, then release the lock.
    Run(RunArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct LockArgs {
    /// Lock file path (default: /var/run/<name>.pid).
    #[arg(long)]
    pub lock_file: Option<PathBuf>,

    /// Seconds after which a live instance's lock counts as stuck.
    #[arg(long)]
    pub max_age: Option<u64>,

    /// Never kill a stuck instance; take the lock and leave it running.
    #[arg(long)]
    pub no_kill: bool,

    /// Name matched against the lock holder's command line.
    #[arg(long)]
    pub name: Option<String>,

    /// PID to record instead of this process's own.
    #[arg(long)]
    pub pid: Option<u32>,

    /// Create the lock file with create-new semantics.
    #[arg(long)]
    pub exclusive: bool,

    /// Print the trace log to stderr.
    #[arg(long)]
    pub trace: bool,

    /// Append the trace log to this file as NDJSON.
    #[arg(long)]
    pub trace_file: Option<PathBuf>,
}

impl LockArgs {
    /// Overlay the flags onto a loaded configuration.
    pub fn apply(&self, config: &mut LockConfig) {
        if let Some(lock_file) = &self.lock_file {
            config.lock_file = Some(lock_file.clone());
        }
        if let Some(max_age) = self.max_age {
            config.max_age_secs = max_age;
        }
        if self.no_kill {
            config.killable = false;
        }
        if let Some(name) = &self.name {
            config.executable_name = Some(name.clone());
        }
        if self.exclusive {
            config.exclusive_create = true;
        }
        if let Some(trace_file) = &self.trace_file {
            config.trace_file = Some(trace_file.clone());
        }
    }
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub lock: LockArgs,

    /// Command and arguments to run while holding the lock.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
