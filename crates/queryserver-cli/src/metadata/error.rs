//! Error types for the SQLx-backed providers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid {key}: '{value}'")]
    InvalidProperty { key: &'static str, value: String },

    #[error("missing metrics property '{0}'")]
    MissingProperty(&'static str),

    #[error("unsupported metrics sink type '{0}'")]
    UnsupportedSink(String),

    #[error("failed to open metrics sink {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode metrics record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
