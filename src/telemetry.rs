//! Structured logging setup.

use crate::config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors returned while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Directive string that failed to parse.
        directive: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Installs the global tracing subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over the configured filter.
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place and return `Ok(false)`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the configured directive
/// does not parse.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, TelemetryError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .is_ok()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init().is_ok()
    };
    if installed {
        tracing::debug!(json = config.json, "tracing subscriber installed");
    }
    Ok(installed)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }
    EnvFilter::try_new(&config.filter).map_err(|err| TelemetryError::InvalidFilter {
        directive: config.filter.clone(),
        message: err.to_string(),
    })
}
