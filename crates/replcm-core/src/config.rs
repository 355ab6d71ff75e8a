//! Configuration for the change-recycle manager.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checksum::ChecksumKind;

/// Configuration for the recycle area and its clearer.
///
/// Read once at startup; changing retention or the sweep interval
/// requires a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmConfig {
    /// Whether recycling is enabled. When disabled, recycle calls are
    /// no-ops that report success and the clearer never runs.
    #[serde(default)]
    pub enabled: bool,

    /// Root directory that receives recycled files.
    #[serde(default)]
    pub cmroot: PathBuf,

    /// Age in seconds after which a recycled entry may be purged.
    #[serde(default = "default_retention")]
    pub retention_secs: u64,

    /// Interval between clearer sweeps. Zero means sweep once and exit
    /// (run-once mode of the standalone clearer).
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Content checksum algorithm used to derive entry names.
    #[serde(default)]
    pub checksum: ChecksumKind,
}

fn default_retention() -> u64 {
    24 * 3600
}

fn default_sweep_interval() -> u64 {
    3600
}

impl Default for CmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cmroot: PathBuf::new(),
            retention_secs: default_retention(),
            sweep_interval_secs: default_sweep_interval(),
            checksum: ChecksumKind::default(),
        }
    }
}

/// Error loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Validation(String),
}

impl CmConfig {
    /// The retention age as a `Duration`.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// The sweep interval as a `Duration`, or `None` in run-once mode.
    pub fn interval(&self) -> Option<Duration> {
        if self.sweep_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.sweep_interval_secs))
        }
    }

    /// Check internal consistency. A disabled config is always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled {
            if self.cmroot.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "cmroot must be set when recycling is enabled".into(),
                ));
            }
            if self.retention_secs == 0 {
                return Err(ConfigError::Validation(
                    "retention_secs must be positive".into(),
                ));
            }
        }
        Ok(())
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
