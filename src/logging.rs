use crate::config::UiConfig;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding `tracing` filter directives.
pub const LOG_ENV: &str = "TERMWIN_LOG";
const DEFAULT_FILTER: &str = "termwin=info";

/// Keeps the background log writer alive. Dropping it flushes pending lines.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn log_dir(config: &UiConfig) -> std::io::Result<PathBuf> {
    let dir = config
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("termwin").join("logs"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn env_filter(config: &UiConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let directives = config.log_filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}

/// Installs a global subscriber writing to a daily rolling file; stdout
/// belongs to the terminal. Returns `None` when the log directory cannot be
/// created or a subscriber is already installed.
pub fn init(config: &UiConfig) -> Option<LoggingGuard> {
    let log_dir = log_dir(config).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "termwin.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(env_filter(config)).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
