//! Server bootstrap: configuration, factory selection, provider creation.

use std::path::Path;

use anyhow::{Context, Result};
use queryserver_core::{keys, Configuration, FactoryRegistry, Meta};
use tracing::{debug, info};

use crate::cli::DEFAULT_FACTORY;

/// Loads the configuration and applies `-D` overrides on top of it.
///
/// Overrides are merged before any factory sees the configuration, so they
/// take part in connection-property passthrough and the metrics switch.
pub fn load_configuration(path: Option<&Path>, defines: &[String]) -> Result<Configuration> {
    let mut conf = match path {
        Some(path) => Configuration::from_toml_file(path)?,
        None => Configuration::create().context("Failed to load default configuration")?,
    };

    conf.merge_overrides(defines)?;
    debug!(
        entries = conf.len(),
        overrides = defines.len(),
        "configuration ready"
    );

    Ok(conf)
}

/// Registry of the factories this binary can instantiate.
pub fn default_registry() -> FactoryRegistry {
    #[allow(unused_mut)]
    let mut registry = FactoryRegistry::new();

    #[cfg(feature = "metadata-provider")]
    registry.register(DEFAULT_FACTORY, connection::constructor());

    registry
}

/// Picks the factory name: explicit flag, then configuration, then default.
pub fn factory_name<'a>(flag: Option<&'a str>, conf: &'a Configuration) -> &'a str {
    flag.or_else(|| conf.get(keys::META_FACTORY))
        .unwrap_or(DEFAULT_FACTORY)
}

/// Instantiates the selected factory and creates the provider once.
pub fn create_meta(
    registry: &FactoryRegistry,
    name: &str,
    conf: Configuration,
    urls: &[String],
) -> Result<Box<dyn Meta>> {
    let factory = registry.instantiate_with(name, Some(conf))?;
    info!(factory = name, "creating metadata provider");
    let meta = factory.create(urls)?;
    Ok(meta)
}

#[cfg(feature = "metadata-provider")]
mod connection {
    use std::sync::Arc;

    use queryserver_core::{
        Configuration, ConnectionMetaFactory, FactoryConstructor, FactoryError, MetaFactory,
    };

    use crate::metadata::SqlxProviders;

    pub fn constructor() -> FactoryConstructor {
        FactoryConstructor {
            default: default_factory,
            with_configuration,
        }
    }

    fn default_factory() -> Result<Box<dyn MetaFactory>, FactoryError> {
        Ok(Box::new(ConnectionMetaFactory::new(Arc::new(SqlxProviders))?))
    }

    fn with_configuration(conf: Option<Configuration>) -> Box<dyn MetaFactory> {
        Box::new(ConnectionMetaFactory::with_configuration(
            conf,
            Arc::new(SqlxProviders),
        ))
    }
}
