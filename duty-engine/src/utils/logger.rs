//! Logging Infrastructure
//!
//! Structured logging setup for development and production.
//! Features:
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent ledger logs (target `ledger`, never deleted)

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Rotated application logs older than this are removed
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Clean up old application log files (older than 14 days)
///
/// Rolling files are named `app.YYYY-MM-DD`; ledger logs are never touched.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    use chrono::Local;

    let cutoff = Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut removed = 0;

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date_part) = name.strip_prefix("app.")
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Initialize the logging system with optional daily rotating files
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"); `RUST_LOG` wins when set
/// * `json_format` - JSON console output (production) instead of pretty output
/// * `log_dir` - Optional directory for file logging (e.g., Some("./data/logs"))
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let Some(log_dir) = log_dir else {
        subscriber.try_init()?;
        return Ok(());
    };

    let app_log_dir = log_dir.join("app");
    let ledger_log_dir = log_dir.join("ledger");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&ledger_log_dir)?;

    // Standard application logs (rotated daily, subject to 14-day cleanup)
    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
    let app_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(app_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != "ledger"
        }));

    // Permanent ledger mirror
    let ledger_log = RollingFileAppender::new(Rotation::DAILY, ledger_log_dir, "ledger");
    let ledger_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::sync::Mutex::new(ledger_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "ledger"
        }));

    subscriber.with(app_layer).with(ledger_layer).try_init()?;

    match cleanup_old_logs(log_dir) {
        Ok(0) => {}
        Ok(n) => tracing::info!(removed = n, "Old application logs cleaned up"),
        Err(e) => tracing::warn!(error = %e, "Log cleanup failed"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();

        let today = chrono::Local::now().date_naive();
        let old = today - chrono::Duration::days(APP_LOG_RETENTION_DAYS + 3);
        let old_name = format!("app.{}", old.format("%Y-%m-%d"));
        let fresh_name = format!("app.{}", today.format("%Y-%m-%d"));

        fs::write(app.join(&old_name), "old").unwrap();
        fs::write(app.join(&fresh_name), "fresh").unwrap();
        fs::write(app.join("notes.txt"), "keep").unwrap();

        let removed = cleanup_old_logs(dir.path()).unwrap();
        assert_eq!(removed, 1);
        assert!(!app.join(old_name).exists());
        assert!(app.join(fresh_name).exists());
        assert!(app.join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_without_app_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
    }
}
