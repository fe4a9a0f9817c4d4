//! Live database metadata providers.
//!
//! These are the concrete [`Meta`] implementations the `connection` factory
//! builds: a plain pool-backed provider and a variant that also records
//! request-level metrics.

mod error;
mod metrics_provider;
mod sqlx_provider;

pub use error::ProviderError;
pub use metrics_provider::MetricsMeta;
pub use sqlx_provider::SqlxMeta;

use queryserver_core::{BoxError, Meta, MetaProviders, PropertyBag};

/// Provider constructors backed by SQLx.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlxProviders;

impl MetaProviders for SqlxProviders {
    fn plain(&self, url: &str, properties: PropertyBag) -> Result<Box<dyn Meta>, BoxError> {
        Ok(Box::new(SqlxMeta::connect(url, properties)?))
    }

    fn instrumented(&self, url: &str, properties: PropertyBag) -> Result<Box<dyn Meta>, BoxError> {
        Ok(Box::new(MetricsMeta::connect(url, properties)?))
    }
}
