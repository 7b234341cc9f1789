// Logging module - tracing subscriber setup
//
// Logs go to stderr so stdout stays clean for event output (`demo --format jsonl`
// is meant to be piped). File logging optionally adds a JSON layer written through
// a non-blocking rolling appender.
//
// Precedence: RUST_LOG env var > config file level > "info"

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogRotation, LoggingConfig};

/// Filter directive used when RUST_LOG is unset
pub fn default_directive(config: &LoggingConfig) -> String {
    format!("gridspy={}", config.level)
}

fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(&config.file_dir)
        .with_context(|| format!("creating log directory {}", config.file_dir.display()))?;

    let dir = &config.file_dir;
    let prefix = &config.file_prefix;
    Ok(match config.file_rotation {
        LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
        LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
        LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
    })
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the program. `None` when file logging is off or its directory
/// could not be created (stderr logging still works in that case).
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let (file_layer, guard) = if config.file_enabled {
        match file_appender(config) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Warning: file logging disabled: {:#}", e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}
