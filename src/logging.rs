//! File logging. The terminal belongs to the UI, so nothing is written to stdout.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;

/// Install a daily-rotated file subscriber.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// whole run.
pub fn setup_logging(config: &LogConfig) -> Result<WorkerGuard> {
  let logs_dir = match &config.dir {
    Some(dir) => dir.clone(),
    None => default_dir()?,
  };
  std::fs::create_dir_all(&logs_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", logs_dir.display(), e))?;

  let file_appender = RollingFileAppender::builder()
    .rotation(Rotation::DAILY)
    .max_log_files(7)
    .filename_prefix("u9s")
    .filename_suffix("log")
    .build(&logs_dir)
    .map_err(|e| eyre!("Failed to open log file in {}: {}", logs_dir.display(), e))?;
  let (writer, guard) = tracing_appender::non_blocking(file_appender);

  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&config.level))
    .map_err(|e| eyre!("Invalid log level {:?}: {}", config.level, e))?;

  tracing_subscriber::registry()
    .with(filter)
    .with(
      fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer),
    )
    .try_init()
    .map_err(|e| eyre!("Failed to install logger: {}", e))?;

  Ok(guard)
}

fn default_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("u9s").join("logs"))
}
