//! Logging setup
//!
//! All diagnostics go to stderr, or to a log file when one is configured.
//! Stdout belongs to the menu and the `IFACE=`/`IPADDR=` output, so nothing
//! here may ever write to it.

use anyhow::{Context, Result};
use std::{fs, io, path::Path};
use tracing::{info, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::{config::LoggingConfig, error::PickerError};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging with specific configuration.
///
/// When a log file is configured the returned guard must be held until the
/// program exits, otherwise buffered events are lost.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = create_env_filter(&config.level)?;

    let (layer, guard) = match &config.file_path {
        Some(path) => {
            let (writer, guard) = non_blocking(open_log_file(path)?);
            (build_layer(&config.format, writer, false), Some(guard))
        }
        None => (build_layer(&config.format, io::stderr, true), None),
    };

    Registry::default()
        .with(layer.with_filter(env_filter))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(level = %config.level, format = %config.format, "Logging system initialized");
    Ok(guard)
}

fn build_layer<W>(format: &str, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match format.to_lowercase().as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .boxed(),
        "compact" => fmt::layer()
            .compact()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false)
            .boxed(),
        _ => fmt::layer()
            .pretty()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false)
            .boxed(),
    }
}

/// Append to a single, never-rotated log file
fn open_log_file(path: &Path) -> Result<rolling::RollingFileAppender> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;

    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    rolling::RollingFileAppender::builder()
        .rotation(rolling::Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Create environment filter from log level string
fn create_env_filter(level: &str) -> Result<EnvFilter> {
    let base_level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => return Err(PickerError::config(format!("Invalid log level: {}", level)).into()),
    };

    let filter = EnvFilter::builder()
        .with_default_directive(base_level.into())
        .from_env()
        .context("Failed to create environment filter")?;

    Ok(filter)
}

/// Logs how long a named operation took when dropped
pub struct TimingLogger {
    name: String,
    start_time: std::time::Instant,
}

impl TimingLogger {
    pub fn start<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        tracing::trace!(operation = %name, event = "timing_start", "Starting {}", name);

        Self {
            name,
            start_time: std::time::Instant::now(),
        }
    }
}

impl Drop for TimingLogger {
    fn drop(&mut self) {
        let elapsed = self.start_time.elapsed();
        tracing::debug!(
            operation = %self.name,
            duration_ms = elapsed.as_millis() as u64,
            event = "timing_complete",
            "Completed '{}' in {}ms",
            self.name,
            elapsed.as_millis()
        );
    }
}
