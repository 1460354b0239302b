//! Run log file setup.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{MigrateError, MigrateResult};

/// Log file name for a run started at `timestamp` (`YYYYMMDD_HHMMSS`).
#[must_use]
pub fn log_file_name(timestamp: &str) -> String {
    format!("user_migration_{timestamp}.log")
}

/// Creates `<dir>/user_migration_<timestamp>.log`, creating `dir` if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn create_log_file(dir: &Path) -> MigrateResult<(PathBuf, File)> {
    fs::create_dir_all(dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = dir.join(log_file_name(&timestamp));
    let file = File::create(&path)?;
    Ok((path, file))
}

/// Routes `tracing` output to a fresh log file in `dir`.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a global subscriber
/// is already installed.
pub fn init(dir: &Path) -> MigrateResult<PathBuf> {
    let (path, file) = create_log_file(dir)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| MigrateError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(path)
}
