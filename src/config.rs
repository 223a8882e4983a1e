//! Layered configuration loading for the task board.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`TASKBOARD_*` prefix, `__` separating sections)
//! 2. An optional TOML file
//! 3. Built-in defaults
//!
//! `TASKBOARD_STORAGE__BLOB_KEY` maps to `storage.blob_key`,
//! `TASKBOARD_SUGGESTIONS__CONTEXT` to `suggestions.context`, and so on.

use std::time::Duration;

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{adapters::mock::MockLatency, domain::BlobKey};

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A configuration field has an invalid value.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Where the task collection is stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the blob files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Name of the blob holding the task collection.
    #[serde(default = "default_blob_key")]
    pub blob_key: String,
}

fn default_data_dir() -> String {
    ".taskboard".to_owned()
}

fn default_blob_key() -> String {
    BlobKey::DEFAULT.to_owned()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            blob_key: default_blob_key(),
        }
    }
}

/// Suggestion provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuggestionConfig {
    /// Simulated latency of a suggestion fetch, in milliseconds.
    #[serde(default = "default_generate_latency_ms")]
    pub generate_latency_ms: u64,
    /// Simulated latency of a description improvement, in milliseconds.
    #[serde(default = "default_improve_latency_ms")]
    pub improve_latency_ms: u64,
    /// Simulated latency of a next-action lookup, in milliseconds.
    #[serde(default = "default_next_actions_latency_ms")]
    pub next_actions_latency_ms: u64,
    /// Context string sent with suggestion requests.
    #[serde(default = "default_context")]
    pub context: String,
}

const fn default_generate_latency_ms() -> u64 {
    1500
}

const fn default_improve_latency_ms() -> u64 {
    1000
}

const fn default_next_actions_latency_ms() -> u64 {
    800
}

fn default_context() -> String {
    "productivity workflow".to_owned()
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            generate_latency_ms: default_generate_latency_ms(),
            improve_latency_ms: default_improve_latency_ms(),
            next_actions_latency_ms: default_next_actions_latency_ms(),
            context: default_context(),
        }
    }
}

impl SuggestionConfig {
    /// Returns the latency profile for the mock gateway.
    #[must_use]
    pub const fn latency(&self) -> MockLatency {
        MockLatency {
            generate: Duration::from_millis(self.generate_latency_ms),
            improve: Duration::from_millis(self.improve_latency_ms),
            next_actions: Duration::from_millis(self.next_actions_latency_ms),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, such as `info` or `taskboard=debug`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Complete task board configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Suggestion provider settings.
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BoardConfig {
    /// Builds the provider chain, layering `path` when given.
    ///
    /// A missing file contributes nothing.
    #[must_use]
    pub fn figment(path: Option<&Utf8Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = path {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from defaults, `path`, and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed or a
    /// value has the wrong type.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    /// Checks values that deserialization alone cannot, returning the
    /// validated blob key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the data directory is
    /// empty or the blob key is not a valid key.
    pub fn validate(&self) -> Result<BlobKey, ConfigError> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.data_dir".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }
        BlobKey::new(&self.storage.blob_key).map_err(|err| ConfigError::InvalidValue {
            field: "storage.blob_key".to_owned(),
            reason: err.to_string(),
        })
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn data_dir(&self) -> &Utf8Path {
        Utf8Path::new(&self.storage.data_dir)
    }
}
