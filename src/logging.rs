//! Tracing subscriber setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Environment variable whose directive overrides the configured filter.
pub const LOG_ENV_VAR: &str = "TASKBOARD_LOG";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoggingError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to initialize tracing subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Resolves the active filter: [`LOG_ENV_VAR`] when set and valid,
/// otherwise the configured directive.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when the configured directive
/// is used and does not parse.
pub fn resolve_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|err| LoggingError::InvalidFilter {
        directive: config.filter.clone(),
        reason: err.to_string(),
    })
}

/// Installs a compact stderr subscriber as the global default.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] for an unusable directive and
/// [`LoggingError::AlreadyInitialized`] when called a second time.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = resolve_filter(config)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}
