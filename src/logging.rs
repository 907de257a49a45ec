//! Tracing setup for the `vb-api` binary
//!
//! Logs go to stderr unless a log directory is configured, in which case
//! they are written as JSON lines to a daily rolling file.

use std::path::PathBuf;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::result::{Result, VbError};

pub const LOG_ENV: &str = "VB_API_LOG";
pub const LOG_DIR_ENV: &str = "VB_API_LOG_DIR";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level when `VB_API_LOG` holds no directive for a target
    pub level: LevelFilter,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LevelFilter::WARN, log_dir: None }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Apply a level name such as `debug`; `off` disables logging entirely
    pub fn with_level_name(mut self, name: &str) -> Self {
        if let Ok(level) = name.parse::<LevelFilter>() {
            self.level = level;
        }
        if level_is_off(name) {
            self.log_dir = None;
        }
        self
    }
}

fn level_is_off(name: &str) -> bool {
    name.eq_ignore_ascii_case("off")
}

/// Install the global subscriber
///
/// The returned guard must be held until exit so buffered file output is
/// flushed.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "vb-api.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    let stderr_layer = config.log_dir.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| VbError::GeneralError(format!("Failed to initialize logging: {e}").into()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        let config = LoggingConfig::default().with_level_name("debug");
        assert_eq!(config.level, LevelFilter::DEBUG);

        let config = LoggingConfig::default().with_level_name("nonsense");
        assert_eq!(config.level, LevelFilter::WARN);
    }

    #[test]
    fn off_disables_file_output() {
        let config = LoggingConfig {
            level: LevelFilter::INFO,
            log_dir: Some(PathBuf::from("logs")),
        }
        .with_level_name("Off");

        assert_eq!(config.level, LevelFilter::OFF);
        assert_eq!(config.log_dir, None);
    }
}
