//! Exit code constants for the pidlocker binary.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: The wrapped command failed (`run`)
//! - 4: Lock refused, or a lock-file / process operation faulted

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an invalid configuration file.
pub const USER_ERROR: i32 = 1;

/// The command executed under the lock exited unsuccessfully.
pub const COMMAND_FAILURE: i32 = 2;

/// The lock could not be acquired, checked, or released.
pub const LOCK_FAILURE: i32 = 4;
