//! Tracing setup for the `fiat` binary.
//!
//! Everything goes to a daily-rolling file under the data directory. Stderr
//! only shows errors unless `--verbose` is given, since sync warnings are
//! already reported to the user in plain words.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use fiat_infrastructure::config::ENV_LOG;

const LOG_FILE_PREFIX: &str = "fiat.log";

/// Installs the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init(log_dir: &Path, level: &str, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(env_filter(level));

    let stderr_filter = if verbose {
        env_filter(level)
    } else {
        EnvFilter::default().add_directive(LevelFilter::ERROR.into())
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// `FIAT_LOG` wins over the configured level; an invalid directive falls back to `info`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
