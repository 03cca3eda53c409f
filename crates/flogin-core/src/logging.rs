//! Tracing setup.
//!
//! Logs go to stderr so stdout stays clean for command output. The filter
//! comes from `FLOGIN_LOG` when set, else from `[log].level`.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogConfig, paths};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "FLOGIN_LOG";

const LOG_FILE_PREFIX: &str = "flogin.log";

/// Picks the filter directive: env first, then config.
fn resolve_filter(env_value: Option<&str>, config_level: &str) -> Result<EnvFilter> {
    let directive = env_value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(config_level);
    EnvFilter::try_new(directive).with_context(|| format!("Invalid log filter '{directive}'"))
}

/// Installs the global subscriber.
///
/// Returns the file writer guard when file logging is enabled; keep it alive
/// until exit so buffered lines are flushed.
///
/// # Errors
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = resolve_filter(env_value.as_deref(), &config.level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.file {
        let appender = tracing_appender::rolling::daily(paths::logs_dir(), LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
        Ok(None)
    }
}
