use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter; `RUST_LOG` takes precedence when set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "reflex=debug,reflex_host=debug,reflex_core=debug,warn"
    } else {
        "reflex=info,reflex_host=info,warn"
    }
}

/// Initialize the logging system with tracing.
///
/// The game owns the terminal, so logs only ever go to `log_file`. Without
/// one no subscriber is installed. The returned guard flushes the file on
/// drop and must be held until exit.
pub fn init_logging(log_file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(Some(guard))
}
