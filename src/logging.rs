//! # Logging
//!
//! Two `tracing` outputs:
//! - console: filtered by `RUST_LOG` (default `info,wah=debug,tower_http=info`)
//! - `config.log_file`: plain text, `wah` at DEBUG and everything else at
//!   INFO, rotated daily with one previous file kept

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::Targets, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Config;

/// Current file plus one rotated backup
const KEPT_LOG_FILES: usize = 2;

/// Install the global subscriber
///
/// The returned guard flushes the file writer when dropped, so `main` has
/// to hold it until shutdown.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    let console = tracing_subscriber::fmt::layer().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,wah=debug,tower_http=info".into()),
    );

    let (file, guard) = match &config.log_file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(name)
                .max_log_files(KEPT_LOG_FILES)
                .build(dir)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(
                    Targets::new()
                        .with_default(Level::INFO)
                        .with_target("wah", Level::DEBUG),
                );
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).try_init()?;

    Ok(guard)
}

/// Directory and file name of a log path; a bare name lives in the
/// working directory
fn split_log_path(path: &Path) -> Result<(&Path, &str)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("LOG_FILE has no usable file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Ok((dir, name))
}
