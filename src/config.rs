//! Tracker configuration.
//!
//! Configuration is optional; every field has a default that reproduces the
//! plain tracker behavior. It can be supplied inline or loaded from a TOML file:
//!
//! ```toml
//! # Close instances in the order they were created ("initialization", default)
//! # or dependents first ("reverse")
//! cleanup_order = "reverse"
//!
//! # Reject a registry with unknown requirements or cycles when the tracker is built
//! validate_registry = true
//! ```
//!
//! # File Location
//!
//! [`TrackerConfig::load`] reads the file named by the `HARNESS_TRACKER_CONFIG`
//! environment variable. When the variable is unset, or points at a file that does
//! not exist, the defaults are used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "HARNESS_TRACKER_CONFIG";

/// Direction of the cleanup sweep over initialized instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepOrder {
    /// Same order the instances were initialized in: requirements first.
    #[default]
    Initialization,
    /// Reverse initialization order: dependents first.
    Reverse,
}

/// Settings applied by [`Tracker::with_config`](crate::Tracker::with_config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Direction of [`Tracker::cleanup`](crate::Tracker::cleanup).
    pub cleanup_order: SweepOrder,

    /// Validate the whole registry when the tracker is constructed.
    pub validate_registry: bool,
}

impl TrackerConfig {
    /// Load from the path in `HARNESS_TRACKER_CONFIG`, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_with_optional(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// Load from `path` if given and present, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (permissions, not found, etc.)
    /// - The file contains invalid TOML syntax
    /// - The TOML structure doesn't match the expected schema
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tracker config from {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse tracker config from {}", path.display()))
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid TOML, unknown keys, or unknown sweep orders.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
