//! Connection URL resolution for `create` calls without a URL argument.

use crate::config::{keys, Configuration};
use crate::error::BoxError;
use crate::properties::PropertyBag;

/// Derives a connection URL from configuration.
pub trait UrlResolver: Send + Sync {
    fn resolve_url(&self, properties: &PropertyBag, conf: &Configuration)
        -> Result<String, BoxError>;
}

/// Reads the URL from [`keys::CONNECTION_URL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigUrlResolver;

impl UrlResolver for ConfigUrlResolver {
    fn resolve_url(
        &self,
        _properties: &PropertyBag,
        conf: &Configuration,
    ) -> Result<String, BoxError> {
        match conf.get(keys::CONNECTION_URL).map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(format!(
                "no connection URL configured (set '{}' or pass a URL argument)",
                keys::CONNECTION_URL
            )
            .into()),
        }
    }
}
