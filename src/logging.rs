//! Tracing setup. The interactive session owns the terminal, so logs go to
//! `<data_dir>/git-user.log`; `--init` also mirrors warnings to stderr.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub const LOG_FILE_NAME: &str = "git-user.log";

/// Keeps the non-blocking writer flushing until dropped.
pub struct LogGuard {
    path: PathBuf,
    _file: WorkerGuard,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `RUST_LOG` wins; otherwise `fallback` (config `log_level`, which already
/// folds in `GIT_USER_LOG`).
pub fn build_filter(fallback: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).with_context(|| format!("invalid log level `{fallback}`"))
}

pub fn init(log_dir: &Path, level: &str, mirror_stderr: bool) -> Result<LogGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log dir {}", log_dir.display()))?;
    let filter = build_filter(level)?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = mirror_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(LevelFilter::WARN)
    });

    Registry::default()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("installing log subscriber")?;

    Ok(LogGuard {
        path: log_dir.join(LOG_FILE_NAME),
        _file: guard,
    })
}
