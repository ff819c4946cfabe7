//! Config loading, validation, and path resolution.

use super::model::LockConfig;
use crate::error::{LockerError, Result};
use crate::identity::{MAX_NAME_LEN, MIN_NAME_LEN, ProcessIdentity, is_plausible_name};
use std::path::{Path, PathBuf};

impl LockConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockerError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LockConfig = serde_yaml::from_str(yaml)
            .map_err(|e| LockerError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            LockerError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// - an explicit `executable_name` must be 3..=255 bytes with no path separator
    /// - an explicit `lock_file` must be non-empty
    /// - `run_dir` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.executable_name {
            if !is_plausible_name(name) {
                return Err(LockerError::UserError(format!(
                    "config validation failed: executable_name must be {}..={} bytes (got {})",
                    MIN_NAME_LEN,
                    MAX_NAME_LEN,
                    name.len()
                )));
            }
            if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
                return Err(LockerError::UserError(format!(
                    "config validation failed: executable_name '{}' must not contain a path separator",
                    name
                )));
            }
        }

        if let Some(lock_file) = &self.lock_file
            && lock_file.as_os_str().is_empty()
        {
            return Err(LockerError::UserError(
                "config validation failed: lock_file must not be empty".to_string(),
            ));
        }

        if self.run_dir.as_os_str().is_empty() {
            return Err(LockerError::UserError(
                "config validation failed: run_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply the configured name override, if any, to an identity.
    pub fn apply_identity(&self, identity: ProcessIdentity) -> ProcessIdentity {
        match &self.executable_name {
            Some(name) => identity.with_executable_name(name.clone()),
            None => identity,
        }
    }

    /// Lock file path for the given identity.
    pub fn lock_path(&self, identity: &ProcessIdentity) -> PathBuf {
        match &self.lock_file {
            Some(path) => path.clone(),
            None => self
                .run_dir
                .join(format!("{}.pid", identity.executable_name())),
        }
    }
}
