//! Logging bootstrap for replcm processes.
//!
//! A thin layer over `tracing-subscriber`: env-filterable level, console
//! output, and an optional rolling file appender. Call [`init_logging`]
//! once at startup and keep the returned guard alive for the lifetime of
//! the process so buffered file output is flushed on shutdown.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for rolling log files; console-only when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file name prefix.
    #[serde(default = "default_prefix")]
    pub file_prefix: String,

    /// Rotation period: "hourly", "daily" or "never".
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Emit JSON records instead of the human-readable format.
    #[serde(default)]
    pub json_format: bool,

    /// Also log to stdout.
    #[serde(default = "default_true")]
    pub console_output: bool,
}

fn default_level() -> String {
    "info".into()
}

fn default_prefix() -> String {
    "replcm".into()
}

fn default_rotation() -> String {
    "daily".into()
}

fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_level(),
            log_dir: None,
            file_prefix: default_prefix(),
            rotation: default_rotation(),
            json_format: false,
            console_output: true,
        }
    }
}

fn rotation_of(name: &str) -> rolling::Rotation {
    match name {
        "hourly" => rolling::Rotation::HOURLY,
        "never" => rolling::Rotation::NEVER,
        // default to daily
        _ => rolling::Rotation::DAILY,
    }
}

/// Initialize the logging system. Should be called once at program startup.
/// Returns a guard that must be held alive for the duration of the program
/// (for the non-blocking file writer).
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let console_layer: Option<Box<dyn tracing_subscriber::Layer<_> + Send + Sync>> =
        if config.console_output {
            if config.json_format {
                Some(Box::new(fmt::layer().json()))
            } else {
                Some(Box::new(fmt::layer()))
            }
        } else {
            None
        };

    // File layer plus the guard for its background writer.
    let (file_layer, guard): (
        Option<Box<dyn tracing_subscriber::Layer<_> + Send + Sync>>,
        Option<WorkerGuard>,
    ) = if let Some(ref log_dir) = config.log_dir {
        let file_appender = rolling::RollingFileAppender::builder()
            .rotation(rotation_of(&config.rotation))
            .filename_prefix(&config.file_prefix)
            .filename_suffix("log")
            .build(log_dir)
            .expect("failed to create rolling file appender");

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json_format {
            Box::new(fmt::layer().json().with_writer(non_blocking))
        } else {
            Box::new(fmt::layer().with_writer(non_blocking))
        };

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    registry.with(console_layer).with(file_layer).init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.log_dir.is_none());
        assert_eq!(config.file_prefix, "replcm");
        assert_eq!(config.rotation, "daily");
        assert!(!config.json_format);
        assert!(config.console_output);
    }

    #[test]
    fn test_rotation_of_falls_back_to_daily() {
        assert_eq!(
            format!("{:?}", rotation_of("bogus")),
            format!("{:?}", rolling::Rotation::DAILY)
        );
        assert_eq!(
            format!("{:?}", rotation_of("hourly")),
            format!("{:?}", rolling::Rotation::HOURLY)
        );
    }
}
