//! Error types for configuration loading and metadata-provider creation.
//!
//! # Error Handling Strategy
//!
//! - [`ConfigError`]: problems reading or interpreting configuration sources
//!   (site files, `-D` overrides). These happen before a factory exists.
//!
//! - [`FactoryError`]: the single failure type of [`crate::MetaFactory::create`].
//!   Collaborator failures (URL resolution, driver loading, connecting) are
//!   wrapped in [`FactoryError::Connection`] with the original error kept as
//!   the [`std::error::Error::source`]. None of these are retried.

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by collaborators at the factory boundary.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors that can occur while building a [`crate::Configuration`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The site file exists but could not be read.
    #[error("failed to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The site file is not valid TOML.
    #[error("failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value type that cannot be flattened into a string entry.
    #[error("unsupported value for configuration key '{key}': {kind} values are not allowed")]
    UnsupportedValue { key: String, kind: &'static str },

    /// A `KEY=VALUE` override that has no `=` or an empty key.
    #[error("invalid configuration override '{0}': expected KEY=VALUE")]
    InvalidOverride(String),
}

/// Errors returned by metadata-provider factories.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The factory was constructed without a configuration.
    #[error("Configuration must not be null.")]
    MissingConfiguration,

    /// More than one connection argument was supplied.
    #[error("0 or 1 argument expected. Received {0:?}")]
    InvalidArgumentCount(Vec<String>),

    /// URL resolution or provider construction failed.
    #[error("failed to create metadata provider: {0}")]
    Connection(#[source] BoxError),

    /// No factory is registered under the requested name.
    #[error("unknown meta factory '{0}'")]
    UnknownFactory(String),

    /// The platform default configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
