//! Command implementations for pidlocker.
//!
//! Each command builds a `LockConfig` from the optional YAML file and the
//! flags, runs one engine operation, and reports the outcome.


use crate::cli::{Cli, Command, LockArgs, RunArgs};
use pidlocker::config::LockConfig;
use pidlocker::error::{LockerError, Result};
use pidlocker::identity::ProcessIdentity;
use pidlocker::locker::{LockState, Locker};
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Acquire(args) => cmd_acquire(config_path, &args),
        Command::Check(args) => cmd_check(config_path, &args),
        Command::Release(args) => cmd_release(config_path, &args),
        Command::Run(args) => cmd_run(config_path, &args),
    }
}

/// Load the config file (if any), overlay flags, and validate.
fn build_config(config_path: Option<&Path>, args: &LockArgs) -> Result<LockConfig> {
    let mut config = match config_path {
        Some(path) => LockConfig::load(path)?,
        None => LockConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn build_locker(config: LockConfig, args: &LockArgs) -> Locker {
    let mut identity = ProcessIdentity::current();
    if let Some(pid) = args.pid {
        identity = identity.with_pid(pid);
    }
    Locker::with_parts(config, identity, Default::default())
}

/// Emit the trace as requested. Trace file failures only warn.
fn report_trace(locker: &Locker, args: &LockArgs) {
    if args.trace {
        eprint!("{}", locker.trace().render());
    }
    if let Some(path) = &locker.config().trace_file
        && let Err(e) = locker.trace().append_to(path)
    {
        eprintln!("Warning: failed to write trace: {}", e);
    }
}

/// Turn a failed operation into the error returned to `main`.
///
/// All but the newest fault are printed; the newest becomes the result.
fn failure(locker: &mut Locker) -> LockerError {
    let path = locker.lock_path().to_path_buf();
    let state = locker.state().unwrap_or(LockState::Unreadable);
    let mut errors = locker.take_errors();
    let last = errors.pop();
    for err in &errors {
        eprintln!("Error: {}", err);
    }
    last.unwrap_or(LockerError::Refused { path, state })
}

fn cmd_acquire(config_path: Option<&Path>, args: &LockArgs) -> Result<()> {
    let config = build_config(config_path, args)?;
    if !config.enabled {
        println!("Locking disabled; nothing to do.");
        return Ok(());
    }

    let mut locker = build_locker(config, args);
    let acquired = locker.create();
    report_trace(&locker, args);

    if !acquired {
        return Err(failure(&mut locker));
    }

    println!(
        "Acquired lock: {} (pid {})",
        locker.lock_path().display(),
        locker.identity().pid()
    );
    Ok(())
}

fn cmd_check(config_path: Option<&Path>, args: &LockArgs) -> Result<()> {
    let config = build_config(config_path, args)?;
    let mut locker = build_locker(config, args);
    let clear = locker.check();
    report_trace(&locker, args);

    if let Some(state) = locker.state() {
        println!("{}: {}", locker.lock_path().display(), state);
    }
    if !clear {
        return Err(failure(&mut locker));
    }
    Ok(())
}

fn cmd_release(config_path: Option<&Path>, args: &LockArgs) -> Result<()> {
    let config = build_config(config_path, args)?;
    let mut locker = build_locker(config, args);
    let released = locker.delete();
    report_trace(&locker, args);

    if !released {
        return Err(failure(&mut locker));
    }

    println!("Released lock: {}", locker.lock_path().display());
    Ok(())
}

fn cmd_run(config_path: Option<&Path>, args: &RunArgs) -> Result<()> {
    let config = build_config(config_path, &args.lock)?;
    let display = shell_words::join(&args.command);

    let guard = if config.enabled {
        let mut locker = build_locker(config, &args.lock);
        let acquired = locker.acquire();
        report_trace(&locker, &args.lock);
        Some(acquired?)
    } else {
        None
    };

    let (program, rest) = args
        .command
        .split_first()
        .ok_or_else(|| LockerError::UserError("no command given".to_string()))?;

    let status = std::process::Command::new(program)
        .args(rest)
        .status()
        .map_err(|e| LockerError::UserError(format!("failed to start '{}': {}", display, e)));

    if let Some(guard) = guard
        && let Err(e) = guard.release()
    {
        eprintln!("Warning: {}", e);
    }

    let status = status?;
    if !status.success() {
        return Err(LockerError::CommandFailed(format!(
            "'{}' exited with {}",
            display, status
        )));
    }
    Ok(())
}
