pub mod config;
pub mod error;
pub mod factory;
pub mod meta;
pub mod metrics;
pub mod properties;
pub mod registry;
pub mod resolver;

// Re-export main types
pub use config::{keys, Configuration};
pub use error::{BoxError, ConfigError, FactoryError};
pub use factory::{ConnectionMetaFactory, MetaFactory, DEFAULT_QUERY_SERVER_METRICS};
pub use meta::{Meta, MetaProviders, MetaVariant};
pub use metrics::{
    ConfigMetricsSystem, MetricsSystem, PQS_FILENAME, PQS_REPORTING_INTERVAL, PQS_SINKTYPE,
};
pub use properties::{PropertyBag, CONNECTION_PROPERTY_PATTERN};
pub use registry::{FactoryConstructor, FactoryRegistry};
pub use resolver::{ConfigUrlResolver, UrlResolver};
