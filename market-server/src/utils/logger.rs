//! Logging
//!
//! Console output (pretty or JSON) plus, when a log directory is given, two
//! daily-rotated files:
//!
//! ```text
//! logs/
//! ├── app/       app.YYYY-MM-DD.log       deleted after 14 days
//! └── security/  security.YYYY-MM-DD.log  kept
//! ```
//!
//! Events with target `security` (see [`security_log!`](crate::security_log))
//! go to the security file only.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, filter::filter_fn, fmt, prelude::*};

/// Application logs older than this are removed
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

const SECURITY_TARGET: &str = "security";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        layer.json().with_current_span(true).boxed()
    } else {
        layer.boxed()
    }
}

fn daily_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?)
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides `level` when set. Must be called from inside a Tokio
/// runtime when `log_dir` is given: it spawns the hourly cleanup task.
pub fn init_logger(level: &str, json: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(std::io::stdout, json, !json)];

    if let Some(dir) = log_dir {
        let app = daily_appender(&dir.join("app"), "app")?;
        let security = daily_appender(&dir.join(SECURITY_TARGET), SECURITY_TARGET)?;

        layers.push(
            fmt_layer(app, json, false)
                .with_filter(filter_fn(|meta| meta.target() != SECURITY_TARGET))
                .boxed(),
        );
        layers.push(
            fmt_layer(security, json, false)
                .with_filter(filter_fn(|meta| meta.target() == SECURITY_TARGET))
                .boxed(),
        );

        tokio::spawn(periodic_cleanup(dir.to_path_buf()));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;
    Ok(())
}

/// `app.2026-10-01.log` -> 2026-10-01
fn app_log_date(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix("app.")?.strip_suffix(".log")?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Delete application logs past retention; security logs are never touched
///
/// Returns the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let app_dir = log_dir.join("app");
    if !app_dir.exists() {
        return Ok(0);
    }

    let cutoff = Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut removed = 0;
    for entry in fs::read_dir(app_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if app_log_date(name).is_some_and(|date| date < cutoff) {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }
    Ok(removed)
}

async fn periodic_cleanup(log_dir: PathBuf) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
    loop {
        interval.tick().await;
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to clean up old logs");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rotated_names_only() {
        assert_eq!(
            app_log_date("app.2026-10-01.log"),
            NaiveDate::from_ymd_opt(2026, 10, 1)
        );
        assert_eq!(app_log_date("security.2026-10-01.log"), None);
        assert_eq!(app_log_date("app.yesterday.log"), None);
        assert_eq!(app_log_date("app.2026-10-01"), None);
    }

    #[test]
    fn cleanup_removes_only_expired_app_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let app_dir = tmp.path().join("app");
        let security_dir = tmp.path().join("security");
        fs::create_dir_all(&app_dir).unwrap();
        fs::create_dir_all(&security_dir).unwrap();

        let today = Local::now().date_naive();
        let old = today - chrono::Duration::days(APP_LOG_RETENTION_DAYS + 1);
        let old_name = format!("app.{}.log", old.format("%Y-%m-%d"));
        let fresh_name = format!("app.{}.log", today.format("%Y-%m-%d"));
        let old_security = format!("security.{}.log", old.format("%Y-%m-%d"));

        fs::write(app_dir.join(&old_name), "x").unwrap();
        fs::write(app_dir.join(&fresh_name), "x").unwrap();
        fs::write(security_dir.join(&old_security), "x").unwrap();

        assert_eq!(cleanup_old_logs(tmp.path()).unwrap(), 1);
        assert!(!app_dir.join(old_name).exists());
        assert!(app_dir.join(fresh_name).exists());
        assert!(security_dir.join(old_security).exists());
    }

    #[test]
    fn cleanup_without_app_dir_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(tmp.path()).unwrap(), 0);
    }
}
