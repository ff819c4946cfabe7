//! Lock configuration for pidlocker.
//!
//! `LockConfig` is the caller-facing configuration of a lock attempt. It can be
//! built in code or loaded from YAML; unknown fields are ignored for forward
//! compatibility and every field has a default.

mod model;
mod operations;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::{DEFAULT_MAX_AGE_SECS, DEFAULT_RUN_DIR, LockConfig};
