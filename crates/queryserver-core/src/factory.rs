//! Metadata-provider factory.
//!
//! The host calls [`MetaFactory::create`] once at startup. The factory picks
//! the connection URL, decides whether request-level metrics are on, and
//! returns either the plain or the instrumented provider.

use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::config::{keys, Configuration};
use crate::error::FactoryError;
use crate::meta::{Meta, MetaProviders};
use crate::metrics::{
    ConfigMetricsSystem, MetricsSystem, PQS_FILENAME, PQS_REPORTING_INTERVAL, PQS_SINKTYPE,
};
use crate::properties::PropertyBag;
use crate::resolver::{ConfigUrlResolver, UrlResolver};

/// Default for [`keys::QUERY_SERVER_METRICS`] when the key is unset.
pub const DEFAULT_QUERY_SERVER_METRICS: bool = true;

/// Produces the [`Meta`] a query server runs against.
pub trait MetaFactory: Send + Sync {
    /// Builds a provider for zero or one connection arguments.
    ///
    /// With no arguments the URL is derived from configuration; with one it is
    /// used verbatim. Any other count fails with
    /// [`FactoryError::InvalidArgumentCount`].
    fn create(&self, args: &[String]) -> Result<Box<dyn Meta>, FactoryError>;
}

/// Factory backed by configuration and pluggable provider constructors.
pub struct ConnectionMetaFactory {
    conf: Option<Arc<Configuration>>,
    url_resolver: Arc<dyn UrlResolver>,
    metrics: Arc<dyn MetricsSystem>,
    providers: Arc<dyn MetaProviders>,
}

impl ConnectionMetaFactory {
    /// Creates a factory using the platform default configuration.
    pub fn new(providers: Arc<dyn MetaProviders>) -> Result<Self, FactoryError> {
        let conf = Configuration::create()?;
        Ok(Self::with_configuration(Some(conf), providers))
    }

    /// Creates a factory with an explicit configuration.
    ///
    /// `None` is accepted here; `create` then fails with
    /// [`FactoryError::MissingConfiguration`].
    pub fn with_configuration(
        conf: Option<Configuration>,
        providers: Arc<dyn MetaProviders>,
    ) -> Self {
        Self {
            conf: conf.map(Arc::new),
            url_resolver: Arc::new(ConfigUrlResolver),
            metrics: Arc::new(ConfigMetricsSystem),
            providers,
        }
    }

    pub fn with_url_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.url_resolver = resolver;
        self
    }

    pub fn with_metrics_system(mut self, metrics: Arc<dyn MetricsSystem>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The configuration captured at construction.
    pub fn configuration(&self) -> Option<&Configuration> {
        self.conf.as_deref()
    }

    fn resolve_url(
        &self,
        args: &[String],
        properties: &PropertyBag,
        conf: &Configuration,
    ) -> Result<String, FactoryError> {
        match args {
            [] => self
                .url_resolver
                .resolve_url(properties, conf)
                .map_err(FactoryError::Connection),
            [url] => Ok(url.clone()),
            _ => Err(FactoryError::InvalidArgumentCount(args.to_vec())),
        }
    }

    fn add_metrics_properties(&self, properties: &mut PropertyBag, conf: &Configuration) {
        properties.insert(PQS_REPORTING_INTERVAL, self.metrics.reporting_interval(conf));
        properties.insert(PQS_FILENAME, self.metrics.sink_file_name(conf));
        properties.insert(PQS_SINKTYPE, self.metrics.sink_type(conf));
        properties.insert(keys::COLLECT_REQUEST_LEVEL_METRICS, "true");
    }
}

impl MetaFactory for ConnectionMetaFactory {
    fn create(&self, args: &[String]) -> Result<Box<dyn Meta>, FactoryError> {
        let conf = self
            .conf
            .as_deref()
            .ok_or(FactoryError::MissingConfiguration)?;

        let mut properties = PropertyBag::from_configuration(conf);
        let url = self.resolve_url(args, &properties, conf)?;

        #[cfg(feature = "tracing")]
        debug!(
            from_args = !args.is_empty(),
            properties = properties.len(),
            "resolved connection url"
        );

        let metrics_on = conf.get_bool(keys::QUERY_SERVER_METRICS, DEFAULT_QUERY_SERVER_METRICS);

        let meta = if metrics_on {
            self.add_metrics_properties(&mut properties, conf);
            self.providers.instrumented(&url, properties)
        } else {
            self.providers.plain(&url, properties)
        }
        .map_err(FactoryError::Connection)?;

        #[cfg(feature = "tracing")]
        info!(variant = %meta.variant(), "created metadata provider");

        Ok(meta)
    }
}
