//! Installs the global `tracing` subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::{Log, LogFormat};

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid log filtering directive")]
    InvalidDirective(#[from] tracing_subscriber::filter::ParseError),
    #[error("A global subscriber is already installed")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Sets up console logging from the `[log]` settings.
///
/// Without a filtering directive the console level applies to every crate.
pub fn setup(config: &Log) -> Result<(), LoggerError> {
    let console = &config.console;
    if !console.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(
        console
            .filtering_directive
            .as_deref()
            .unwrap_or(console.level.into_level().as_str()),
    )?;
    let registry = tracing_subscriber::registry().with(filter);

    match console.log_format {
        LogFormat::Default => registry.with(fmt::layer().with_target(true)).try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).flatten_event(true))
            .try_init()?,
    }
    Ok(())
}
