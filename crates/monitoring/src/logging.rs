//! Logging configuration and initialization for DigiWorld services
//!
//! This module provides centralized logging functionality with:
//! - Daily rotating file logging or console logging
//! - Configurable log directories and file prefixes
//! - Environment variable configuration

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    Console,
    File,
}

impl LogDestination {
    /// "console" in any letter case selects stdout, anything else files
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("console") {
            LogDestination::Console
        } else {
            LogDestination::File
        }
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub destination: LogDestination,
    pub log_dir: PathBuf,
    pub file_prefix: String,
}

impl LoggingConfig {
    /// Read the configuration from the environment
    ///
    /// - `LOG_DESTINATION`: "console" or "file" (default: "file")
    /// - `LOG_DIR`: directory for log files (default: "./logs")
    /// - `LOG_FILE_PREFIX`: prefix for log file names (default: "digiworld")
    pub fn from_env() -> Self {
        let destination = env::var("LOG_DESTINATION").unwrap_or_else(|_| "file".to_string());
        Self {
            destination: LogDestination::parse(&destination),
            log_dir: env::var("LOG_DIR")
                .unwrap_or_else(|_| "./logs".to_string())
                .into(),
            file_prefix: env::var("LOG_FILE_PREFIX").unwrap_or_else(|_| "digiworld".to_string()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            log_dir: PathBuf::from("./logs"),
            file_prefix: "digiworld".to_string(),
        }
    }
}

/// Initialize tracing from the environment, see [`LoggingConfig::from_env`]
pub fn init_logging() -> Result<()> {
    init_logging_with(&LoggingConfig::from_env())
}

/// Initialize tracing with an explicit configuration
///
/// The filter comes from `RUST_LOG` and falls back to `info`.
pub fn init_logging_with(config: &LoggingConfig) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,sqlx=warn,tower_http=debug".into());

    match config.destination {
        LogDestination::Console => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stdout)
                        .with_ansi(true)
                        .with_target(false),
                )
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize console tracing subscriber: {}", e))?;

            info!("Logging to console (stdout)");
        }
        LogDestination::File => {
            prepare_log_dir(&config.log_dir)?;

            let file_appender = rolling::daily(&config.log_dir, &config.file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(false),
                )
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize file tracing subscriber: {}", e))?;

            info!("Logging to daily rotating files in: {}/", config.log_dir.display());
            info!(
                "Log file pattern: {}/{}.<YYYY-MM-DD>",
                config.log_dir.display(),
                config.file_prefix
            );

            // The guard owns the background writer thread and must live as long as the process
            std::mem::forget(guard);
        }
    }

    Ok(())
}

fn prepare_log_dir(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create log directory '{}': {}",
            log_dir.display(),
            e
        )
    })
}
