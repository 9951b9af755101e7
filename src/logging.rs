//! Tracing subscriber setup.
//!
//! Filters come from `RATES_LOG` (e.g. `RATES_LOG=rate_watch=debug`). CLI
//! commands log to stderr; the TUI owns the terminal, so it logs to a file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::error::AppError;

pub const LOG_ENV: &str = "RATES_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr, warnings and up unless `RATES_LOG` says otherwise.
pub fn init_stderr() -> Result<(), AppError> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::new(2, format!("Failed to install logger: {e}")))
}

/// Log to `path` through a background writer.
///
/// The returned guard flushes on drop; hold it until the TUI exits.
pub fn init_file(path: &Path) -> Result<WorkerGuard, AppError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::new(2, format!("Invalid log file: {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter("rate_watch=info"))
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::new(2, format!("Failed to install logger: {e}")))?;

    Ok(guard)
}
