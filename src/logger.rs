use std::path::Path;
use std::result::Result;

use snafu::ResultExt;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{registry, EnvFilter, Layer};

use crate::config::Config;
use crate::error::{ApplicationError, InitializeLoggerSnafu};

/// Rolled daily under the configured log directory.
pub const LOG_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".log");

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = concat!("info,", env!("CARGO_CRATE_NAME"), "=debug");

pub fn init(config: &Config) -> Result<WorkerGuard, ApplicationError> {
    let (writer, guard) = file_writer(&config.log_dir);

    let subscriber = registry()
        .with(env_filter())
        .with(layer().pretty().with_writer(std::io::stdout))
        .with(json_layer(writer));
    tracing::subscriber::set_global_default(subscriber).context(InitializeLoggerSnafu)?;

    tracing::debug!(log_dir = %config.log_dir.display(), file = LOG_FILE, "logger ready");
    Ok(guard)
}

fn file_writer(log_dir: &Path) -> (NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE))
}

/// Structured records for the log file; colour codes only belong on the console.
fn json_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    layer().with_ansi(false).json().with_writer(writer)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}
