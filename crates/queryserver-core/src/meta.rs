//! The metadata capability handed to the RPC front end, and the
//! constructors the factory uses to build it.

use std::fmt;

use serde::Serialize;

use crate::error::BoxError;
use crate::properties::PropertyBag;

/// Which provider implementation backs a [`Meta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaVariant {
    /// Plain connection-backed provider.
    Plain,
    /// Provider that also collects request-level metrics.
    Instrumented,
}

impl fmt::Display for MetaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaVariant::Plain => f.write_str("plain"),
            MetaVariant::Instrumented => f.write_str("instrumented"),
        }
    }
}

/// Database metadata and query-execution capability.
///
/// Table listing, statement preparation and result paging belong to the
/// implementations; the factory only needs to know how an instance was
/// configured.
pub trait Meta: fmt::Debug + Send + Sync {
    /// The provider implementation behind this handle.
    fn variant(&self) -> MetaVariant;

    /// The connection URL the provider was built with.
    fn url(&self) -> &str;

    /// The connection properties the provider was built with.
    fn properties(&self) -> &PropertyBag;
}

/// Constructors for the two provider variants.
///
/// Both receive the resolved URL and an owned property bag. Failures
/// (missing driver, refused connection) are returned as-is; the factory
/// wraps them.
pub trait MetaProviders: Send + Sync {
    fn plain(&self, url: &str, properties: PropertyBag) -> Result<Box<dyn Meta>, BoxError>;

    fn instrumented(&self, url: &str, properties: PropertyBag) -> Result<Box<dyn Meta>, BoxError>;
}
