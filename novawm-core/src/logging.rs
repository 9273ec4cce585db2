//! Logging initialization for NovaWM, built on `tracing`.
//!
//! [`init_logging`] installs a console layer plus an optional daily-rolling
//! file layer, both honouring [`LoggingConfig`]. [`init_minimal_logging`] is the
//! fallback used before configuration is available and in tests.
//!
//! The geometry engine logs each constraint pass at `trace`, state transitions
//! at `debug`, and protocol anomalies (stale acks, sync timeouts) at `debug` or
//! `warn`, so `level = "trace"` gives a full account of why a window ended up
//! where it did.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

use once_cell::sync::Lazy;
use std::io::stderr;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the non-blocking file writer alive so buffered lines get flushed.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Initializes a minimal `stderr` logger filtered by `RUST_LOG` (default `info`).
///
/// Errors (e.g. a subscriber is already installed) are ignored.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn level_filter(level: &str) -> Result<Level, LoggingError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(LoggingError::FilterError(format!("Invalid log level in config: {}", other))),
    }
}

/// Builds the rolling file layer for `log_path` and returns its worker guard.
fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    utils::fs::ensure_parent_dir_exists(log_path)?;

    let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("novawm.log"));
    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer: BoxedLayer = if format.eq_ignore_ascii_case("json") {
        fmt::layer().json().with_writer(writer).with_ansi(false).boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    };
    Ok((layer, guard))
}

/// Installs the global subscriber described by `config`.
///
/// With `is_reload` set, a failure to replace an existing subscriber is
/// reported on stderr and otherwise ignored; on first initialization it is an error.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = level_filter(&config.level)?;

    let console_filter = EnvFilter::new(level.to_string());
    let console_layer: BoxedLayer = if config.format.eq_ignore_ascii_case("json") {
        fmt::layer()
            .json()
            .with_writer(stderr)
            .with_ansi(false)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_filter(console_filter)
            .boxed()
    };

    let mut layers: Vec<BoxedLayer> = vec![console_layer];
    let mut new_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &config.format)?;
        layers.push(file_layer.with_filter(EnvFilter::new(level.to_string())).boxed());
        new_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    match LOG_WORKER_GUARD.lock() {
        Ok(mut slot) => *slot = new_guard,
        Err(e) => eprintln!("[ERROR] Failed to lock LOG_WORKER_GUARD: {}. Log flushing may be affected.", e),
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            eprintln!("[INFO] Logging re-initialization attempted; previous subscriber persists: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationError(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}
