//! SQLx-backed plain metadata provider.
//!
//! Supports PostgreSQL, MySQL, and SQLite databases.

use queryserver_core::{Meta, MetaVariant, PropertyBag};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tokio::runtime::Runtime;
use tracing::debug;

use super::ProviderError;

/// Property overriding the pool's maximum number of connections.
pub const MAX_CONNECTIONS_PROPERTY: &str = "avatica.pool.max_connections";

/// Database type inferred from connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Postgres,
    Mysql,
    Sqlite,
}

impl DatabaseType {
    /// Infer database type from a connection URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::Mysql)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }
}

/// Strips the `jdbc:` prefix clients commonly send.
pub fn driver_url(url: &str) -> &str {
    url.strip_prefix("jdbc:").unwrap_or(url)
}

/// A plain metadata provider holding a live connection pool.
///
/// The pool is created eagerly so an unreachable database fails at
/// construction time rather than on the first client request.
pub struct SqlxMeta {
    url: String,
    properties: PropertyBag,
    db_type: DatabaseType,
    pool: AnyPool,
    // Must follow `pool`; fields drop in declaration order.
    runtime: Runtime,
}

impl SqlxMeta {
    /// Connect to the database at `url`.
    ///
    /// # Errors
    /// Returns an error if the URL scheme is not supported, the runtime cannot
    /// be started, or the connection fails.
    pub fn connect(url: &str, properties: PropertyBag) -> Result<Self, ProviderError> {
        let target = driver_url(url);
        let db_type = DatabaseType::from_url(target)
            .ok_or_else(|| ProviderError::UnsupportedScheme(url.to_string()))?;

        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new();
        if let Some(raw) = properties.get(MAX_CONNECTIONS_PROPERTY) {
            let max: u32 = raw
                .trim()
                .parse()
                .map_err(|_| ProviderError::InvalidProperty {
                    key: MAX_CONNECTIONS_PROPERTY,
                    value: raw.to_string(),
                })?;
            options = options.max_connections(max);
        }

        let runtime = Runtime::new()?;
        let pool = runtime.block_on(options.connect(target))?;

        debug!(?db_type, "connected metadata pool");

        Ok(Self {
            url: url.to_string(),
            properties,
            db_type,
            pool,
            runtime,
        })
    }

    /// Runs a trivial query to confirm the pool can serve requests.
    pub(crate) fn validate(&self) -> Result<(), ProviderError> {
        self.runtime
            .block_on(sqlx::query("SELECT 1").execute(&self.pool))?;
        Ok(())
    }
}

impl std::fmt::Debug for SqlxMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlxMeta")
            .field("url", &self.url)
            .field("db_type", &self.db_type)
            .finish_non_exhaustive()
    }
}

impl Meta for SqlxMeta {
    fn variant(&self) -> MetaVariant {
        MetaVariant::Plain
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }
}
